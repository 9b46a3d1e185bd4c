//! # focal
//!
//! Composable functional lenses over JSON-like values.
//!
//! ## Overview
//!
//! A lens focuses on part of a [`serde_json::Value`] and lets you read,
//! transform or replace that part without mutating the original value. This
//! crate provides:
//!
//! - **Primitive lenses**: array index, slice, object path, filter and pluck
//! - **Combinators**: composition, multi-focus, disjunction, conjunction and
//!   optional error recovery
//! - **Restricted views**: read-only getters and write-only setters
//! - **Introspection**: every lens carries [`Flags`](optics::Flags)
//!   describing how it was built
//! - **Fluent entry point**: a value-bound scope with an extension registry
//!
//! ## Feature Flags
//!
//! - `fluent`: the [`fluent`] module (enabled by default)
//! - `serde`: `Serialize`/`Deserialize` for lens flags
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use focal::prelude::*;
//! use serde_json::json;
//!
//! let data = json!({"a": {"b": [1, 2, 3]}});
//! let last_b = path("a.b").unwrap().index(-1);
//!
//! assert_eq!(last_b.get(&data).unwrap(), json!(3));
//! assert_eq!(
//!     last_b.set(data, json!(30)).unwrap(),
//!     json!({"a": {"b": [1, 2, 30]}})
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and functions.
///
/// # Usage
///
/// ```rust
/// use focal::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::LensError;
    pub use crate::optics::*;

    #[cfg(feature = "fluent")]
    pub use crate::fluent::*;
}

pub mod error;
pub mod optics;

#[cfg(feature = "fluent")]
pub mod fluent;

pub use error::{LensError, Result};
