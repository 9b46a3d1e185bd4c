//! Pluck lenses focusing on the entries of an object selected by key.
//!
//! Keys are selected by an explicit list, a regular expression, or a
//! predicate over `(key, value)`. The focus is a new object holding only the
//! selected entries. Recursive plucks apply the same selection inside nested
//! objects.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{pluck, recursive_pluck};
//! use regex::Regex;
//! use serde_json::json;
//!
//! let abc = pluck(["abc"]);
//! assert_eq!(abc.get(&json!({"abc": 1, "def": 2})).unwrap(), json!({"abc": 1}));
//! assert_eq!(
//!     abc.set(json!({"abc": 1, "def": 2}), json!(0)).unwrap(),
//!     json!({"abc": 0, "def": 2})
//! );
//!
//! let lower = recursive_pluck(Regex::new("[a-z]").unwrap());
//! let data = json!({"a": {"b": 0, "C": 2}, "d": 1, "E": []});
//! assert_eq!(lower.get(&data).unwrap(), json!({"a": {"b": 0}, "d": 1}));
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use super::flags::{Flags, LensKind, LensOptions};
use super::lens::{Focus, Lens};
use crate::error::Result;

/// Selects object entries.
#[derive(Clone)]
pub enum PluckCriterion {
    /// Entries whose key is listed.
    Keys(Vec<String>),
    /// Entries whose key the pattern matches.
    Pattern(Regex),
    /// Entries for which the function returns `true`.
    Predicate(Arc<dyn Fn(&str, &Value) -> bool + Send + Sync>),
}

impl PluckCriterion {
    /// A criterion selecting the listed keys.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// A criterion from a predicate over `(key, value)`.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Whether the entry `key: value` is selected.
    #[must_use]
    pub fn selects(&self, key: &str, value: &Value) -> bool {
        match self {
            Self::Keys(keys) => keys.iter().any(|candidate| candidate == key),
            Self::Pattern(pattern) => pattern.is_match(key),
            Self::Predicate(predicate) => predicate(key, value),
        }
    }
}

impl From<Regex> for PluckCriterion {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Vec<String>> for PluckCriterion {
    fn from(keys: Vec<String>) -> Self {
        Self::Keys(keys)
    }
}

impl From<Vec<&str>> for PluckCriterion {
    fn from(keys: Vec<&str>) -> Self {
        Self::keys(keys)
    }
}

impl<const N: usize> From<[&str; N]> for PluckCriterion {
    fn from(keys: [&str; N]) -> Self {
        Self::keys(keys)
    }
}

impl fmt::Debug for PluckCriterion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keys(keys) => formatter.debug_tuple("Keys").field(keys).finish(),
            Self::Pattern(pattern) => formatter.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            Self::Predicate(_) => formatter.write_str("Predicate(..)"),
        }
    }
}

/// Focuses on the entries of an object selected by a [`PluckCriterion`].
#[derive(Debug, Clone)]
pub struct PluckLens {
    criterion: PluckCriterion,
    recursive: bool,
}

impl PluckLens {
    /// Builds a pluck lens from a criterion and options.
    #[must_use]
    pub fn with_options(criterion: PluckCriterion, recursive: bool, options: LensOptions) -> Lens {
        Lens::from_parts(
            Arc::new(Self {
                criterion,
                recursive,
            }),
            Flags::new(LensKind::Pluck { recursive }),
            options.view,
        )
    }

    fn prune(&self, entries: &Map<String, Value>) -> Map<String, Value> {
        entries
            .iter()
            .filter(|(key, value)| self.criterion.selects(key, value))
            .map(|(key, value)| {
                let kept = match value {
                    Value::Object(nested) if self.recursive => Value::Object(self.prune(nested)),
                    other => other.clone(),
                };
                (key.clone(), kept)
            })
            .collect()
    }

    /// Applies `function` to the selected entries. Recursive plucks descend
    /// into every nested object instead of transforming it whole.
    fn rewrite(&self, entries: Map<String, Value>, function: &dyn Fn(Value) -> Value) -> Map<String, Value> {
        entries
            .into_iter()
            .map(|(key, value)| {
                let selected = self.criterion.selects(&key, &value);
                let value = match value {
                    Value::Object(nested) if self.recursive => Value::Object(self.rewrite(nested, function)),
                    other if selected => function(other),
                    other => other,
                };
                (key, value)
            })
            .collect()
    }
}

impl Focus for PluckLens {
    fn get(&self, source: &Value) -> Result<Value> {
        Ok(Value::Object(
            source
                .as_object()
                .map_or_else(Map::new, |entries| self.prune(entries)),
        ))
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        match source {
            Value::Object(entries) => Ok(Value::Object(self.rewrite(entries, function))),
            other => {
                log::trace!("pluck lens mapped over a non-object; source unchanged");
                Ok(other)
            }
        }
    }
}

/// A pluck lens on the top-level entries selected by `criterion`.
pub fn pluck(criterion: impl Into<PluckCriterion>) -> Lens {
    PluckLens::with_options(criterion.into(), false, LensOptions::new())
}

/// A pluck lens applying `criterion` at every level of nesting.
pub fn recursive_pluck(criterion: impl Into<PluckCriterion>) -> Lens {
    PluckLens::with_options(criterion.into(), true, LensOptions::new())
}

impl Lens {
    /// Composes this lens with a pluck lens.
    #[must_use]
    pub fn pluck(&self, criterion: impl Into<PluckCriterion>) -> Self {
        self.compose(pluck(criterion))
    }

    /// Composes this lens with a recursive pluck lens.
    #[must_use]
    pub fn recursive_pluck(&self, criterion: impl Into<PluckCriterion>) -> Self {
        self.compose(recursive_pluck(criterion))
    }

    /// Alias for [`Lens::pluck`].
    #[must_use]
    pub fn plucking(&self, criterion: impl Into<PluckCriterion>) -> Self {
        self.pluck(criterion)
    }

    /// Alias for [`Lens::recursive_pluck`].
    #[must_use]
    pub fn recursively_plucking(&self, criterion: impl Into<PluckCriterion>) -> Self {
        self.recursive_pluck(criterion)
    }

    /// Adds a pluck lens as a parallel focus, recursive if this lens is a
    /// recursive pluck.
    #[must_use]
    pub fn add_pluck(&self, criterion: impl Into<PluckCriterion>) -> Self {
        let recursive = matches!(self.kind(), LensKind::Pluck { recursive: true });
        self.add(PluckLens::with_options(
            criterion.into(),
            recursive,
            LensOptions::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested() -> Value {
        json!({"_a": {"_b": {"c": 2}}, "d": 3})
    }

    fn double(value: Value) -> Value {
        json!(value.as_i64().unwrap_or_default() * 2)
    }

    #[test]
    fn test_get_with_keys() {
        let data = json!({"a": {"b": 0, "C": 2}, "d": 1, "E": []});
        assert_eq!(pluck(["d", "E"]).get(&data).unwrap(), json!({"d": 1, "E": []}));
    }

    #[test]
    fn test_get_with_pattern() {
        let data = json!({"a": {"b": 0, "C": 2}, "d": 1, "E": []});
        let lens = pluck(Regex::new("[a-z]").unwrap());
        assert_eq!(lens.get(&data).unwrap(), json!({"a": {"b": 0, "C": 2}, "d": 1}));
    }

    #[test]
    fn test_get_with_predicate() {
        let lens = pluck(PluckCriterion::predicate(|_, value| value.is_number()));
        assert_eq!(
            lens.get(&json!({"a": 1, "b": "x", "c": 2.5})).unwrap(),
            json!({"a": 1, "c": 2.5})
        );
    }

    #[test]
    fn test_map_selected_only() {
        let lens = pluck(["d"]);
        assert_eq!(
            lens.map(nested(), double).unwrap(),
            json!({"_a": {"_b": {"c": 2}}, "d": 6})
        );
    }

    #[test]
    fn test_map_recursive() {
        let lens = recursive_pluck(Regex::new("^[a-z]$").unwrap());
        assert_eq!(
            lens.map(nested(), double).unwrap(),
            json!({"_a": {"_b": {"c": 4}}, "d": 6})
        );
    }

    #[test]
    fn test_recursive_get_does_not_enter_arrays() {
        let lens = recursive_pluck(["a", "b"]);
        assert_eq!(
            lens.get(&json!({"a": [{"b": 1, "c": 2}], "b": {"a": 1, "z": 0}})).unwrap(),
            json!({"a": [{"b": 1, "c": 2}], "b": {"a": 1}})
        );
    }

    #[test]
    fn test_non_object() {
        assert_eq!(pluck(["a"]).get(&json!([1])).unwrap(), json!({}));
        assert_eq!(pluck(["a"]).set(json!(5), json!(1)).unwrap(), json!(5));
    }

    #[test]
    fn test_flags() {
        assert_eq!(recursive_pluck(["a"]).flag("recursive"), Some(json!(true)));
        assert_eq!(pluck(["a"]).flag("recursive"), Some(json!(false)));
    }
}
