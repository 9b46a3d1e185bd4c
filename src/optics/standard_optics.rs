//! Standard lenses that are commonly used.

use serde_json::Value;

use super::flags::LensOptions;
use super::index::index;
use super::lens::{Lens, identity};
use super::path::PathLens;

/// The first element of an array.
///
/// # Example
///
/// ```
/// use focal::optics::head;
/// use serde_json::json;
///
/// assert_eq!(head().get(&json!([1, 2, 3])).unwrap(), json!(1));
/// ```
#[must_use]
pub fn head() -> Lens {
    index(0)
}

/// The last element of an array.
#[must_use]
pub fn last() -> Lens {
    index(-1)
}

/// Focuses on the deepest paths of `value` at once.
///
/// Collects the paths of [`PathLens::derive_paths`] with the greatest
/// number of segments. Several leaves are joined with [`Lens::add_many`]; a
/// single leaf is returned as a plain path lens. A value without paths gives
/// the identity lens.
///
/// # Example
///
/// ```
/// use focal::optics::leaves;
/// use serde_json::json;
///
/// let data = json!({"a": {"b": 1, "c": {"d": 2, "e": 3}}});
/// let deepest = leaves(&data);
/// assert_eq!(deepest.get(&data).unwrap(), json!([2, 3]));
/// assert_eq!(
///     deepest.set(data, json!(0)).unwrap(),
///     json!({"a": {"b": 1, "c": {"d": 0, "e": 0}}})
/// );
/// ```
#[must_use]
pub fn leaves(value: &Value) -> Lens {
    let paths = PathLens::derive_paths(value);
    let depth = paths.iter().map(|segments| segments.len()).max().unwrap_or(0);
    let mut deepest = paths
        .into_iter()
        .filter(|segments| segments.len() == depth)
        .map(|segments| PathLens::build(segments, LensOptions::new()));

    match deepest.next() {
        Some(first) => first.add_many(deepest),
        None => identity(),
    }
}
