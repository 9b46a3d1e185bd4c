//! Sequential composition of two lenses.
//!
//! `first.compose(second)` focuses with `second` inside the focus of
//! `first`. Mapping runs `second` inside the function handed to `first`, so
//! the inner lens only runs when the outer lens actually writes.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{index, path};
//! use serde_json::json;
//!
//! let cell = index(1).compose(index(0));
//! let grid = json!([[1, 2], [3, 4]]);
//! assert_eq!(cell.get(&grid).unwrap(), json!(3));
//! assert_eq!(cell.set(grid, json!(0)).unwrap(), json!([[1, 2], [0, 4]]));
//!
//! let name = path("user").unwrap().compose(path("name").unwrap());
//! assert_eq!(name.flag("kind"), Some(json!("compose")));
//! ```

use std::cell::RefCell;
use std::sync::Arc;

use serde_json::Value;

use super::flags::{Flags, LensKind};
use super::lens::{Focus, Lens};
use crate::error::Result;

/// Focuses with `second` inside the focus of `first`.
#[derive(Debug, Clone)]
pub struct Compose {
    first: Lens,
    second: Lens,
}

impl Compose {
    /// Composes two lenses. Metadata of `second` overrides that of `first`.
    #[must_use]
    pub fn build(first: Lens, second: Lens) -> Lens {
        let kind = LensKind::Compose {
            first: Box::new(first.kind().clone()),
            second: Box::new(second.kind().clone()),
        };
        let flags = Flags::merged(kind, first.flags(), second.flags());
        let view = first.inherited_view(&second);
        Lens::from_parts(Arc::new(Self { first, second }), flags, view)
    }

    /// The outer lens.
    #[must_use]
    pub const fn first(&self) -> &Lens {
        &self.first
    }

    /// The inner lens.
    #[must_use]
    pub const fn second(&self) -> &Lens {
        &self.second
    }
}

impl Focus for Compose {
    fn get(&self, source: &Value) -> Result<Value> {
        self.second.get(&self.first.get(source)?)
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        let failure = RefCell::new(None);
        let rebuilt = self.first.map(source, |focus| {
            self.second.map(focus, function).unwrap_or_else(|error| {
                failure.borrow_mut().get_or_insert(error);
                Value::Null
            })
        })?;
        failure.into_inner().map_or(Ok(rebuilt), Err)
    }
}
