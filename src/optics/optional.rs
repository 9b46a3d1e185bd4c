//! Optional lenses converting errors into fallback values.
//!
//! Wrapping a lens with [`Optional`] intercepts the errors its `get` and
//! `map` report and substitutes a [`Fallback`] instead. The restriction
//! errors of a [`Getter`](super::Getter) or [`Setter`](super::Setter) are
//! never intercepted: a wrapped setter still refuses `get`, and a wrapped
//! getter still refuses `map`.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{unsafe_index, Fallback};
//! use serde_json::json;
//!
//! let first = unsafe_index(0).optional(Fallback::Default);
//! assert_eq!(first.get(&json!([])).unwrap(), json!(null));
//! assert_eq!(first.set(json!("text"), json!(1)).unwrap(), json!("text"));
//!
//! let labelled = unsafe_index(0).optional(Fallback::Value(json!("none")));
//! assert_eq!(labelled.get(&json!([])).unwrap(), json!("none"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::flags::{Flags, LensKind};
use super::lens::{Focus, Lens};
use crate::error::{LensError, Result};

/// What an [`Optional`] lens returns in place of an error.
#[derive(Clone, Default)]
pub enum Fallback {
    /// `null` for `get`; the unchanged source for `map`.
    #[default]
    Default,
    /// This value, for both `get` and `map`.
    Value(Value),
    /// The value computed from the error, for both `get` and `map`.
    Handler(Arc<dyn Fn(&LensError) -> Value + Send + Sync>),
}

impl Fallback {
    /// A fallback computed from the intercepted error.
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&LensError) -> Value + Send + Sync + 'static,
    {
        Self::Handler(Arc::new(handler))
    }

    fn resolve(&self, error: &LensError, unchanged: Value) -> Value {
        match self {
            Self::Default => unchanged,
            Self::Value(value) => value.clone(),
            Self::Handler(handler) => handler(error),
        }
    }
}

impl From<Value> for Fallback {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => formatter.write_str("Default"),
            Self::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Self::Handler(_) => formatter.write_str("Handler(..)"),
        }
    }
}

/// Intercepts the errors of a wrapped lens.
#[derive(Debug, Clone)]
pub struct Optional {
    inner: Lens,
    fallback: Fallback,
    guards_get: bool,
    guards_map: bool,
}

impl Optional {
    /// Wraps `inner` so that its errors become `fallback`.
    #[must_use]
    pub fn build(inner: Lens, fallback: Fallback) -> Lens {
        let kind = LensKind::Optional {
            inner: Box::new(inner.kind().clone()),
        };
        let flags = Flags::wrapping(kind, inner.flags());
        let view = inner.bound_view().cloned();
        let optional = Self {
            guards_get: !inner.kind().is_setter(),
            guards_map: !inner.kind().is_getter(),
            inner,
            fallback,
        };
        Lens::from_parts(Arc::new(optional), flags, view)
    }
}

impl Focus for Optional {
    fn get(&self, source: &Value) -> Result<Value> {
        match self.inner.get(source) {
            Err(error) if self.guards_get => {
                log::debug!("optional lens intercepted a read error: {error}");
                Ok(self.fallback.resolve(&error, Value::Null))
            }
            result => result,
        }
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        if !self.guards_map {
            return self.inner.map(source, function);
        }
        // The source moves into the inner lens, so the default fallback needs
        // its own copy.
        let unchanged = matches!(self.fallback, Fallback::Default).then(|| source.clone());
        match self.inner.map(source, function) {
            Err(error) => {
                log::debug!("optional lens intercepted a write error: {error}");
                Ok(self
                    .fallback
                    .resolve(&error, unchanged.unwrap_or(Value::Null)))
            }
            result => result,
        }
    }
}

/// Wraps `lens` so that its errors become `fallback`.
#[must_use]
pub fn optional(lens: &Lens, fallback: Fallback) -> Lens {
    Optional::build(lens.clone(), fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{index, path, unsafe_index, unsafe_path};
    use serde_json::json;

    #[test]
    fn test_default_fallback() {
        let lens = unsafe_index(3).optional(Fallback::Default);
        assert_eq!(lens.get(&json!([1])).unwrap(), Value::Null);
        assert_eq!(lens.set(json!([1]), json!(0)).unwrap(), json!([1]));
    }

    #[test]
    fn test_value_fallback() {
        let lens = unsafe_path("a.b").unwrap().optional(json!("missing").into());
        assert_eq!(lens.get(&json!({})).unwrap(), json!("missing"));
        assert_eq!(lens.set(json!({}), json!(1)).unwrap(), json!("missing"));
    }

    #[test]
    fn test_handler_receives_error() {
        let lens = unsafe_index(3).optional(Fallback::handler(|error| json!(error.to_string())));
        assert_eq!(
            lens.get(&json!([1])).unwrap(),
            json!("index 3 out of range for array of length 1")
        );
    }

    #[test]
    fn test_success_passes_through() {
        let lens = unsafe_index(0).optional(Fallback::Value(json!(-1)));
        assert_eq!(lens.get(&json!([5])).unwrap(), json!(5));
        assert_eq!(lens.set(json!([5]), json!(6)).unwrap(), json!([6]));
    }

    #[test]
    fn test_restriction_errors_surface() {
        let read_only = unsafe_index(0).getter().optional(Fallback::Default);
        assert_eq!(read_only.set(json!([1]), json!(2)), Err(LensError::MapNotPermitted));

        let write_only = unsafe_index(0).setter().optional(Fallback::Default);
        assert_eq!(write_only.get(&json!([1])), Err(LensError::GetNotPermitted));
    }

    #[test]
    fn test_restriction_errors_surface_through_composition() {
        let read_only = path("a").unwrap().compose(index(0).getter());
        assert_eq!(read_only.flag("getter"), Some(json!(true)));
        assert_eq!(
            read_only.optional(Fallback::Default).set(json!({"a": [1]}), json!(2)),
            Err(LensError::MapNotPermitted)
        );

        let write_only = index(0).setter().compose(path("a").unwrap());
        assert_eq!(write_only.flag("setter"), Some(json!(true)));
        assert_eq!(
            write_only.optional(Fallback::Default).get(&json!([{"a": 1}])),
            Err(LensError::GetNotPermitted)
        );
    }

    #[test]
    fn test_flags() {
        let lens = unsafe_index(0).optional(Fallback::Default);
        assert_eq!(lens.flag("optional"), Some(json!(true)));
        assert_eq!(lens.flag("index"), Some(json!(0)));
    }
}
