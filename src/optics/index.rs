//! Index lenses focusing on a single array element.
//!
//! Negative indices count from the end of the array. Reads are valid in
//! `[0, len - 1]`; writes are valid in `[0, len]`, so a write one past the
//! end appends an element.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{index, unsafe_index};
//! use serde_json::json;
//!
//! assert_eq!(index(0).get(&json!([1, 2, 3])).unwrap(), json!(1));
//! assert_eq!(index(-1).get(&json!([1, 2, 3])).unwrap(), json!(3));
//! assert_eq!(index(3).set(json!([1, 2, 3]), json!(4)).unwrap(), json!([1, 2, 3, 4]));
//!
//! // Safe lenses degrade, unsafe ones report the problem.
//! assert_eq!(index(10).get(&json!([1])).unwrap(), json!(null));
//! assert!(unsafe_index(10).get(&json!([1])).is_err());
//! ```

use serde_json::Value;

use super::flags::{Flags, LensKind, LensOptions, Safety};
use super::lens::{Focus, Lens};
use crate::error::{LensError, Result};

/// Converts an array length or position to a signed index.
pub(crate) fn as_index(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}

/// Resolves a negative index against `length`.
pub(crate) fn normalize_index(index: i64, length: usize) -> i64 {
    if index < 0 {
        as_index(length).saturating_add(index)
    } else {
        index
    }
}

/// Focuses on the element at a fixed position of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedLens {
    index: i64,
    safety: Safety,
}

impl IndexedLens {
    /// Builds an index lens from options.
    #[must_use]
    pub fn with_options(index: i64, options: LensOptions) -> Lens {
        let focus = Self {
            index,
            safety: options.safety,
        };
        Lens::from_parts(
            std::sync::Arc::new(focus),
            Flags::new(LensKind::Index {
                index,
                safety: options.safety,
            }),
            options.view,
        )
    }

    /// One safe index lens per element of `array` (none for a non-array).
    #[must_use]
    pub fn derive_all(array: &Value) -> Vec<Lens> {
        array
            .as_array()
            .map_or_else(Vec::new, |items| Self::derive_range(items.len()))
    }

    /// Safe index lenses for positions `0..length`.
    pub(crate) fn derive_range(length: usize) -> Vec<Lens> {
        (0..length).map(|position| index(as_index(position))).collect()
    }

    fn out_of_range(&self, index: i64, items: &[Value]) -> LensError {
        log::trace!(
            "index {} (normalised {index}) outside array of length {}",
            self.index,
            items.len()
        );
        LensError::IndexOutOfRange {
            index,
            length: items.len(),
        }
    }
}

impl Focus for IndexedLens {
    fn get(&self, source: &Value) -> Result<Value> {
        let Value::Array(items) = source else {
            if self.safety.is_unsafe() {
                return Err(LensError::type_mismatch("index", "array", source));
            }
            log::trace!("index lens read a non-array; focus is null");
            return Ok(Value::Null);
        };

        let position = normalize_index(self.index, items.len());
        match usize::try_from(position).ok().and_then(|at| items.get(at)) {
            Some(item) => Ok(item.clone()),
            None => {
                let error = self.out_of_range(position, items);
                if self.safety.is_unsafe() {
                    Err(error)
                } else {
                    Ok(Value::Null)
                }
            }
        }
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        let Value::Array(mut items) = source else {
            if self.safety.is_unsafe() {
                return Err(LensError::type_mismatch("index", "array", &source));
            }
            log::trace!("index lens mapped over a non-array; source unchanged");
            return Ok(source);
        };

        let position = normalize_index(self.index, items.len());
        match usize::try_from(position) {
            Ok(at) if at < items.len() => {
                let current = items[at].take();
                items[at] = function(current);
            }
            Ok(at) if at == items.len() => items.push(function(Value::Null)),
            _ => {
                let error = self.out_of_range(position, &items);
                if self.safety.is_unsafe() {
                    return Err(error);
                }
            }
        }
        Ok(Value::Array(items))
    }
}

/// A safe lens on the element at `index`.
#[must_use]
pub fn index(index: i64) -> Lens {
    IndexedLens::with_options(index, LensOptions::new())
}

/// An unsafe lens on the element at `index`.
#[must_use]
pub fn unsafe_index(index: i64) -> Lens {
    IndexedLens::with_options(index, LensOptions::new().unsafe_access())
}

impl Lens {
    /// Composes this lens with a safe index lens.
    #[must_use]
    pub fn index(&self, position: i64) -> Self {
        self.compose(index(position))
    }

    /// Composes this lens with an unsafe index lens.
    #[must_use]
    pub fn unsafe_index(&self, position: i64) -> Self {
        self.compose(unsafe_index(position))
    }

    /// Alias for [`Lens::index`].
    #[must_use]
    pub fn indexing(&self, position: i64) -> Self {
        self.index(position)
    }

    /// Alias for [`Lens::unsafe_index`].
    #[must_use]
    pub fn unsafely_indexing(&self, position: i64) -> Self {
        self.unsafe_index(position)
    }
}
