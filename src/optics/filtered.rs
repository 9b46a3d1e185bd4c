//! Filter lenses focusing on the array elements that satisfy a criterion.
//!
//! The focus of a filter lens is the subsequence of matching elements, in
//! order. Mapping transforms each matching element individually and leaves
//! the others where they were, so the array keeps its length.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{filter, filter_pattern};
//! use regex::Regex;
//! use serde_json::{json, Value};
//!
//! let even = filter(|value: &Value| value.as_i64().is_some_and(|n| n % 2 == 0));
//! assert_eq!(even.get(&json!([1, 2, 3, 4])).unwrap(), json!([2, 4]));
//!
//! let letters = filter_pattern(Regex::new("^[a-zA-Z]*$").unwrap());
//! let shouted = letters
//!     .map(json!(["abc", "a8b"]), |text| json!(text.as_str().unwrap().to_uppercase()))
//!     .unwrap();
//! assert_eq!(shouted, json!(["ABC", "a8b"]));
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::flags::{Flags, LensKind, LensOptions};
use super::lens::{Focus, Lens};
use crate::error::Result;

/// Selects array elements.
#[derive(Clone)]
pub enum FilterCriterion {
    /// Elements for which the function returns `true`.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    /// String elements the pattern matches. Other elements never match.
    Pattern(Regex),
}

impl FilterCriterion {
    /// A criterion from a predicate function.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Whether `element` is selected.
    #[must_use]
    pub fn matches(&self, element: &Value) -> bool {
        match self {
            Self::Predicate(predicate) => predicate(element),
            Self::Pattern(pattern) => element.as_str().is_some_and(|text| pattern.is_match(text)),
        }
    }
}

impl From<Regex> for FilterCriterion {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl fmt::Debug for FilterCriterion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => formatter.write_str("Predicate(..)"),
            Self::Pattern(pattern) => formatter.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
        }
    }
}

/// Focuses on the elements of an array selected by a [`FilterCriterion`].
#[derive(Debug, Clone)]
pub struct FilterLens {
    criterion: FilterCriterion,
}

impl FilterLens {
    /// Builds a filter lens from a criterion and options.
    #[must_use]
    pub fn with_options(criterion: FilterCriterion, options: LensOptions) -> Lens {
        Lens::from_parts(
            Arc::new(Self { criterion }),
            Flags::new(LensKind::Filter),
            options.view,
        )
    }
}

impl Focus for FilterLens {
    fn get(&self, source: &Value) -> Result<Value> {
        let selected = source.as_array().map_or_else(Vec::new, |items| {
            items
                .iter()
                .filter(|element| self.criterion.matches(element))
                .cloned()
                .collect()
        });
        Ok(Value::Array(selected))
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        let Value::Array(items) = source else {
            log::trace!("filter lens mapped over a non-array; source unchanged");
            return Ok(source);
        };
        Ok(Value::Array(
            items
                .into_iter()
                .map(|element| {
                    if self.criterion.matches(&element) {
                        function(element)
                    } else {
                        element
                    }
                })
                .collect(),
        ))
    }
}

/// A filter lens selecting the elements for which `predicate` holds.
pub fn filter<F>(predicate: F) -> Lens
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    FilterLens::with_options(FilterCriterion::predicate(predicate), LensOptions::new())
}

/// A filter lens selecting the string elements `pattern` matches.
#[must_use]
pub fn filter_pattern(pattern: Regex) -> Lens {
    FilterLens::with_options(pattern.into(), LensOptions::new())
}

impl Lens {
    /// Composes this lens with a filter lens.
    #[must_use]
    pub fn filter(&self, criterion: impl Into<FilterCriterion>) -> Self {
        self.compose(FilterLens::with_options(criterion.into(), LensOptions::new()))
    }

    /// Composes this lens with a predicate filter.
    #[must_use]
    pub fn filter_by<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.compose(filter(predicate))
    }

    /// Alias for [`Lens::filter`].
    #[must_use]
    pub fn filtering(&self, criterion: impl Into<FilterCriterion>) -> Self {
        self.filter(criterion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn positive() -> Lens {
        filter(|value: &Value| value.as_f64().is_some_and(|n| n > 0.0))
    }

    #[test]
    fn test_get_keeps_order() {
        assert_eq!(
            positive().get(&json!([3, -1, 2, -5, 1])).unwrap(),
            json!([3, 2, 1])
        );
    }

    #[test]
    fn test_map_preserves_length() {
        let negated = positive()
            .map(json!([3, -1, 2]), |value| json!(-value.as_i64().unwrap()))
            .unwrap();
        assert_eq!(negated, json!([-3, -1, -2]));
    }

    #[test]
    fn test_pattern_skips_non_strings() {
        let lens = filter_pattern(Regex::new("^a").unwrap());
        assert_eq!(
            lens.get(&json!(["ab", 1, "ba", {"a": 1}, "a"])).unwrap(),
            json!(["ab", "a"])
        );
    }

    #[test]
    fn test_non_array() {
        assert_eq!(positive().get(&json!(null)).unwrap(), json!([]));
        assert_eq!(positive().set(json!({"a": 1}), json!(0)).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_set_every_match() {
        assert_eq!(
            positive().set(json!([1, -1, 1]), json!(0)).unwrap(),
            json!([0, -1, 0])
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(positive().kind(), &LensKind::Filter);
    }
}
