//! Read-only and write-only lenses.
//!
//! A [`Getter`] refuses `map`/`set` with [`LensError::MapNotPermitted`]; a
//! [`Setter`] refuses `get` with [`LensError::GetNotPermitted`]. Both
//! compose like any other lens, so restricting a lens that is already
//! restricted the other way yields a lens that fails on every operation.
//!
//! # Examples
//!
//! ```
//! use focal::optics::index;
//! use focal::LensError;
//! use serde_json::json;
//!
//! let read_only = index(0).getter();
//! assert_eq!(read_only.get(&json!([1, 2])).unwrap(), json!(1));
//! assert_eq!(read_only.set(json!([1, 2]), json!(0)), Err(LensError::MapNotPermitted));
//!
//! let write_only = index(0).setter();
//! assert_eq!(write_only.set(json!([1, 2]), json!(0)).unwrap(), json!([0, 2]));
//! assert_eq!(write_only.get(&json!([1, 2])), Err(LensError::GetNotPermitted));
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::flags::{Flags, LensKind, LensOptions};
use super::lens::{Focus, Lens};
use crate::error::{LensError, Result};

/// A lens that can only be read.
#[derive(Debug, Clone)]
pub struct Getter {
    inner: Lens,
}

impl Getter {
    /// A getter from a get function.
    pub fn new<G>(getter: G) -> Lens
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_options(getter, LensOptions::new())
    }

    /// A getter from a get function and options.
    pub fn with_options<G>(getter: G, options: LensOptions) -> Lens
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let inner = Lens::new(getter, |_: Value, _: &dyn Fn(Value) -> Value| {
            Err(LensError::MapNotPermitted)
        });
        Self::from_lens(&inner).with_view(options.view)
    }

    /// Restricts `lens` to reading. Flags and bound view are kept.
    #[must_use]
    pub fn from_lens(lens: &Lens) -> Lens {
        let kind = LensKind::Getter {
            inner: Box::new(lens.kind().clone()),
        };
        Lens::from_parts(
            Arc::new(Self { inner: lens.clone() }),
            Flags::wrapping(kind, lens.flags()),
            lens.bound_view().cloned(),
        )
    }
}

impl Focus for Getter {
    fn get(&self, source: &Value) -> Result<Value> {
        self.inner.get(source)
    }

    fn map(&self, _source: Value, _function: &dyn Fn(Value) -> Value) -> Result<Value> {
        Err(LensError::MapNotPermitted)
    }
}

/// A lens that can only be written.
#[derive(Debug, Clone)]
pub struct Setter {
    inner: Lens,
}

impl Setter {
    /// A setter from a map function.
    pub fn new<M>(mapper: M) -> Lens
    where
        M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_options(mapper, LensOptions::new())
    }

    /// A setter from a map function and options.
    pub fn with_options<M>(mapper: M, options: LensOptions) -> Lens
    where
        M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync + 'static,
    {
        let inner = Lens::new(|_: &Value| Err(LensError::GetNotPermitted), mapper);
        Self::from_lens(&inner).with_view(options.view)
    }

    /// Restricts `lens` to writing. Flags and bound view are kept.
    #[must_use]
    pub fn from_lens(lens: &Lens) -> Lens {
        let kind = LensKind::Setter {
            inner: Box::new(lens.kind().clone()),
        };
        Lens::from_parts(
            Arc::new(Self { inner: lens.clone() }),
            Flags::wrapping(kind, lens.flags()),
            lens.bound_view().cloned(),
        )
    }
}

impl Focus for Setter {
    fn get(&self, _source: &Value) -> Result<Value> {
        Err(LensError::GetNotPermitted)
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        self.inner.map(source, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{index, path};
    use serde_json::json;

    #[test]
    fn test_getter_from_function() {
        let length = Getter::new(|source: &Value| {
            Ok(json!(source.as_array().map_or(0, Vec::len)))
        });
        assert_eq!(length.get(&json!([1, 2, 3])).unwrap(), json!(3));
        assert_eq!(length.set(json!([]), json!(1)), Err(LensError::MapNotPermitted));
        assert_eq!(length.flag("getter"), Some(json!(true)));
    }

    #[test]
    fn test_setter_from_function() {
        let push = Setter::new(|source: Value, function: &dyn Fn(Value) -> Value| {
            let mut items = source.as_array().cloned().unwrap_or_default();
            items.push(function(Value::Null));
            Ok(Value::Array(items))
        });
        assert_eq!(push.set(json!([1]), json!(2)).unwrap(), json!([1, 2]));
        assert_eq!(push.get(&json!([1])), Err(LensError::GetNotPermitted));
    }

    #[test]
    fn test_from_lens_keeps_flags() {
        let lens = path("a.b").unwrap().getter();
        assert_eq!(lens.flag("path"), Some(json!("a.b")));
        assert_eq!(lens.flag("getter"), Some(json!(true)));
        assert!(lens.kind().is_getter());
    }

    #[test]
    fn test_getter_of_setter_fails_everywhere() {
        let lens = Getter::from_lens(&index(0).setter());
        assert_eq!(lens.get(&json!([1])), Err(LensError::GetNotPermitted));
        assert_eq!(lens.set(json!([1]), json!(0)), Err(LensError::MapNotPermitted));
    }

    #[test]
    fn test_restricted_lenses_compose() {
        let lens = path("items").unwrap().compose(index(0).getter());
        assert_eq!(lens.get(&json!({"items": [4]})).unwrap(), json!(4));
        assert_eq!(
            lens.set(json!({"items": [4]}), json!(0)),
            Err(LensError::MapNotPermitted)
        );
    }
}
