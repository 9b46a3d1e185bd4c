//! Multi-focus lenses joining several lenses in parallel.
//!
//! A [`MultiLens`] holds either an ordered list of lenses or a keyed
//! collection of them. `get` reads every member and returns an array (or an
//! object for keyed members). `map` folds the members over the source in
//! order, so when foci overlap the later members see the earlier updates.
//! Keyed members fold in key insertion order.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{index, multi, multi_keyed, path};
//! use serde_json::json;
//!
//! let ends = multi([index(0), index(-1)]);
//! assert_eq!(ends.get(&json!([1, 2, 3])).unwrap(), json!([1, 3]));
//! assert_eq!(ends.set(json!([1, 2, 3]), json!(0)).unwrap(), json!([0, 2, 0]));
//!
//! let point = multi_keyed([("x", path("a").unwrap()), ("y", path("b").unwrap())]);
//! assert_eq!(point.get(&json!({"a": 1, "b": 2})).unwrap(), json!({"x": 1, "y": 2}));
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use super::flags::{Flags, LensKind, LensOptions};
use super::lens::{Focus, Lens};
use crate::error::Result;

/// The members of a [`MultiLens`].
#[derive(Debug, Clone)]
pub enum Members {
    /// Ordered members; the focus is an array.
    List(Vec<Lens>),
    /// Named members in insertion order; the focus is an object.
    Keyed(Vec<(String, Lens)>),
}

impl Members {
    /// The number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(lenses) => lenses.len(),
            Self::Keyed(entries) => entries.len(),
        }
    }

    /// Returns `true` when there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for keyed members.
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        matches!(self, Self::Keyed(_))
    }

    /// The member lenses in fold order.
    pub fn lenses(&self) -> Box<dyn Iterator<Item = &Lens> + '_> {
        match self {
            Self::List(lenses) => Box::new(lenses.iter()),
            Self::Keyed(entries) => Box::new(entries.iter().map(|(_, lens)| lens)),
        }
    }
}

/// Focuses on the foci of all its members at once.
#[derive(Debug, Clone)]
pub struct MultiLens {
    members: Members,
}

impl MultiLens {
    /// Builds a multi-lens from members and options.
    #[must_use]
    pub fn with_options(members: Members, options: LensOptions) -> Lens {
        Self::from_members(members, &Flags::new(LensKind::Custom), None)
            .with_view(options.view)
    }

    /// Builds a multi-lens carrying the metadata of `base` and, if given, of
    /// the lens being added (which wins on collision).
    pub(crate) fn from_members(members: Members, base: &Flags, added: Option<&Lens>) -> Lens {
        let kind = LensKind::Multi {
            keyed: members.is_keyed(),
            arity: members.len(),
        };
        let flags = match added {
            Some(lens) => Flags::merged(kind, base, lens.flags()),
            None => Flags::wrapping(kind, base),
        };
        Lens::from_parts(Arc::new(Self { members }), flags, None)
    }
}

impl Focus for MultiLens {
    fn get(&self, source: &Value) -> Result<Value> {
        match &self.members {
            Members::List(lenses) => lenses
                .iter()
                .map(|lens| lens.get(source))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Members::Keyed(entries) => entries
                .iter()
                .map(|(key, lens)| Ok((key.clone(), lens.get(source)?)))
                .collect::<Result<Map<_, _>>>()
                .map(Value::Object),
        }
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        self.members
            .lenses()
            .try_fold(source, |current, lens| lens.map(current, function))
    }

    fn members(&self) -> Option<&Members> {
        Some(&self.members)
    }
}

/// A multi-lens over `lenses`, focused as an array.
pub fn multi<I>(lenses: I) -> Lens
where
    I: IntoIterator<Item = Lens>,
{
    MultiLens::with_options(
        Members::List(lenses.into_iter().collect()),
        LensOptions::new(),
    )
}

/// A multi-lens over named lenses, focused as an object.
///
/// A repeated key replaces the earlier lens and moves to the end of the
/// fold order.
pub fn multi_keyed<I, K>(entries: I) -> Lens
where
    I: IntoIterator<Item = (K, Lens)>,
    K: Into<String>,
{
    let mut members: Vec<(String, Lens)> = Vec::new();
    for (key, lens) in entries {
        let key = key.into();
        members.retain(|(existing, _)| *existing != key);
        members.push((key, lens));
    }
    MultiLens::with_options(Members::Keyed(members), LensOptions::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{index, path, unsafe_index};
    use crate::LensError;
    use serde_json::json;

    fn increment(value: Value) -> Value {
        json!(value.as_i64().unwrap_or_default() + 1)
    }

    #[test]
    fn test_get_list() {
        let lens = multi([index(0), index(2)]);
        assert_eq!(lens.get(&json!([1, 2, 3])).unwrap(), json!([1, 3]));
    }

    #[test]
    fn test_map_folds_overlapping_foci() {
        let lens = multi([index(0), index(0), index(1)]);
        assert_eq!(
            lens.map(json!([0, 0]), increment).unwrap(),
            json!([2, 1])
        );
    }

    #[test]
    fn test_keyed_fold_order_is_insertion_order() {
        let lens = multi_keyed([
            ("second", path("a").unwrap()),
            ("first", path("a").unwrap()),
        ]);
        let trace = lens
            .map(json!({"a": ""}), |value| {
                json!(format!("{}x", value.as_str().unwrap_or_default()))
            })
            .unwrap();
        assert_eq!(trace, json!({"a": "xx"}));
        let keys: Vec<String> = lens
            .get(&json!({"a": 1}))
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["second", "first"]);
    }

    #[test]
    fn test_repeated_key_replaces() {
        let lens = multi_keyed([("k", index(0)), ("k", index(1))]);
        assert_eq!(lens.get(&json!([1, 2])).unwrap(), json!({"k": 2}));
        assert_eq!(lens.flag("arity"), Some(json!(1)));
    }

    #[test]
    fn test_member_errors_propagate() {
        let lens = multi([index(0), unsafe_index(9)]);
        assert!(matches!(
            lens.get(&json!([1])),
            Err(LensError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_add_appends_to_list() {
        let lens = multi([index(0)]).add(index(1)).add(index(2));
        assert_eq!(lens.flag("arity"), Some(json!(3)));
        assert_eq!(lens.get(&json!([4, 5, 6])).unwrap(), json!([4, 5, 6]));
    }

    #[test]
    fn test_empty() {
        let lens = multi(Vec::new());
        assert_eq!(lens.get(&json!([1])).unwrap(), json!([]));
        assert_eq!(lens.set(json!([1]), json!(0)).unwrap(), json!([1]));
    }
}
