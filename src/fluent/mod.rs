//! A fluent, value-bound entry point with user extensions.
//!
//! [`scope`] binds a value once; every lens built from the resulting
//! [`Scope`] is pre-bound to it, so `get_bound`, `set_bound` and `map_bound`
//! need no source argument. User-defined operations are registered in an
//! [`ExtensionRegistry`] and can be applied to a scope or to any lens.
//!
//! # Example
//!
//! ```
//! use focal::fluent::{scope, ExtensionRegistry};
//! use serde_json::{json, Value};
//!
//! let data = scope(json!({"a": {"b": 100}}));
//! assert_eq!(data.path("a.b").unwrap().set_bound(json!(0)).unwrap(), json!({"a": {"b": 0}}));
//!
//! let registry = ExtensionRegistry::new();
//! registry.register("positive", |lens, _args| {
//!     Ok(lens.filter_by(|value: &Value| value.as_f64().is_some_and(|n| n > 0.0)))
//! });
//! let numbers = scope(json!([-1, 2, 3])).with_registry(registry);
//! assert_eq!(numbers.call("positive", &[]).unwrap().get_bound().unwrap(), json!([2, 3]));
//! ```

mod registry;
mod scope;

pub use registry::{Extension, ExtensionRegistry};
pub use scope::{Scope, scope};
