//! Slice lenses focusing on a contiguous sub-array.
//!
//! Bounds follow the usual slicing conventions: negative bounds count from
//! the end, a missing start means `0` and a missing end means the array
//! length. A slice can also be written as a `"start:end"` string where either
//! side may be omitted.
//!
//! Mapping replaces the whole region: an array result is spliced in (so the
//! array may grow or shrink), any other result collapses the region to a
//! single element.
//!
//! # Examples
//!
//! ```
//! use focal::optics::slice_spec;
//! use serde_json::json;
//!
//! let tail = slice_spec("1:").unwrap();
//! assert_eq!(tail.get(&json!([1, 2, 3])).unwrap(), json!([2, 3]));
//!
//! let middle = slice_spec("1:2").unwrap();
//! assert_eq!(middle.set(json!([1, 2, 3]), json!([100])).unwrap(), json!([1, 100, 3]));
//!
//! let drop_last = slice_spec("-1:").unwrap();
//! assert_eq!(drop_last.set(json!([1, 2, 3]), json!([])).unwrap(), json!([1, 2]));
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::flags::{Flags, LensKind, LensOptions, Safety};
use super::index::{as_index, normalize_index};
use super::lens::{Focus, Lens};
use crate::error::{LensError, Result};

/// Focuses on the elements between two bounds of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLens {
    start: i64,
    end: Option<i64>,
    safety: Safety,
}

impl SliceLens {
    /// Builds a slice lens from bounds and options.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] when neither bound is given.
    pub fn with_options(start: Option<i64>, end: Option<i64>, options: LensOptions) -> Result<Lens> {
        if start.is_none() && end.is_none() {
            return Err(LensError::invalid("no slice indices defined"));
        }
        Ok(Self::build(start.unwrap_or(0), end, options))
    }

    /// Builds a slice lens from a `"start:end"` specification and options.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty or unparsable
    /// specification.
    pub fn parse_with_options(spec: &str, options: LensOptions) -> Result<Lens> {
        let (start, end) = Self::parse(spec)?;
        Ok(Self::build(start, end, options))
    }

    /// Parses a `"start:end"` specification into bounds.
    ///
    /// `":"` selects the whole array; a specification without a colon is a
    /// start bound only.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification
    /// or a bound that is not an integer.
    pub fn parse(spec: &str) -> Result<(i64, Option<i64>)> {
        let (start, end) = match spec.split_once(':') {
            Some((start, end)) => (start.trim(), Some(end.trim())),
            None if spec.trim().is_empty() => {
                return Err(LensError::invalid("no slice indices defined"));
            }
            None => (spec.trim(), None),
        };

        let bound = |text: &str| -> Result<Option<i64>> {
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(Some)
                .map_err(|_| LensError::invalid(format!("slice bound `{text}` is not an integer")))
        };

        let start = bound(start)?.unwrap_or(0);
        let end = match end {
            Some(end) => bound(end)?,
            None => None,
        };
        Ok((start, end))
    }

    fn build(start: i64, end: Option<i64>, options: LensOptions) -> Lens {
        let safety = options.safety;
        Lens::from_parts(
            Arc::new(Self { start, end, safety }),
            Flags::new(LensKind::Slice { start, end, safety }),
            options.view,
        )
    }

    /// Resolves the bounds against an array of `length` elements.
    fn bounds(&self, length: usize) -> Result<(usize, usize)> {
        let resolve = |bound: i64| -> Result<usize> {
            let normalized = normalize_index(bound, length);
            if self.safety.is_unsafe() && !(0..=as_index(length)).contains(&normalized) {
                return Err(LensError::IndexOutOfRange {
                    index: normalized,
                    length,
                });
            }
            Ok(usize::try_from(normalized.max(0)).unwrap_or(usize::MAX).min(length))
        };

        let start = resolve(self.start)?;
        let end = match self.end {
            Some(end) => resolve(end)?,
            None => length,
        };
        Ok((start, end.max(start)))
    }
}

impl Focus for SliceLens {
    fn get(&self, source: &Value) -> Result<Value> {
        let Value::Array(items) = source else {
            if self.safety.is_unsafe() {
                return Err(LensError::type_mismatch("slice", "array", source));
            }
            return Ok(Value::Array(Vec::new()));
        };
        let (start, end) = self.bounds(items.len())?;
        Ok(Value::Array(items[start..end].to_vec()))
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        let Value::Array(mut items) = source else {
            if self.safety.is_unsafe() {
                return Err(LensError::type_mismatch("slice", "array", &source));
            }
            log::trace!("slice lens mapped over a non-array; source unchanged");
            return Ok(source);
        };

        let (start, end) = self.bounds(items.len())?;
        let region: Vec<Value> = items.drain(start..end).collect();
        match function(Value::Array(region)) {
            Value::Array(replacement) => {
                items.splice(start..start, replacement);
            }
            single => items.insert(start, single),
        }
        Ok(Value::Array(items))
    }
}

/// A safe slice lens between `start` and `end`.
///
/// # Errors
///
/// Returns [`LensError::InvalidLensArgument`] when neither bound is given.
pub fn slice(start: Option<i64>, end: Option<i64>) -> Result<Lens> {
    SliceLens::with_options(start, end, LensOptions::new())
}

/// A safe slice lens from a `"start:end"` specification.
///
/// # Errors
///
/// Returns [`LensError::InvalidLensArgument`] for an empty or unparsable
/// specification.
pub fn slice_spec(spec: &str) -> Result<Lens> {
    SliceLens::parse_with_options(spec, LensOptions::new())
}

impl Lens {
    /// Composes this lens with a slice lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] when neither bound is given.
    pub fn slice(&self, start: Option<i64>, end: Option<i64>) -> Result<Self> {
        Ok(self.compose(slice(start, end)?))
    }

    /// Composes this lens with a slice lens given as `"start:end"`.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an invalid specification.
    pub fn slice_spec(&self, spec: &str) -> Result<Self> {
        Ok(self.compose(slice_spec(spec)?))
    }

    /// Alias for [`Lens::slice`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] when neither bound is given.
    pub fn slicing(&self, start: Option<i64>, end: Option<i64>) -> Result<Self> {
        self.slice(start, end)
    }
}
