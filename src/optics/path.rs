//! Path lenses following a sequence of keys through nested objects.
//!
//! A path is written as a dot-separated string (`"a.b.c"`) or given as
//! explicit segments. Numeric segments index into arrays.
//!
//! Safe path lenses never fail. Reading through a missing key yields `null`.
//! Writing through a missing key creates the intermediate objects, unless
//! the written value is `null`, in which case the source is returned as it
//! was rather than being padded with empty scaffolding.
//!
//! Unsafe path lenses fail with [`LensError::PathTraversal`] when they have
//! to read through a missing value.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{path, unsafe_path};
//! use serde_json::json;
//!
//! let lens = path("a.b.c").unwrap();
//! assert_eq!(lens.get(&json!({})).unwrap(), json!(null));
//! assert_eq!(lens.set(json!({}), json!(5)).unwrap(), json!({"a": {"b": {"c": 5}}}));
//! assert_eq!(lens.set(json!({}), json!(null)).unwrap(), json!({}));
//!
//! assert!(unsafe_path("a.b.c").unwrap().get(&json!({})).is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::flags::{Flags, LensKind, LensOptions, PathSegments, Safety};
use super::lens::{Focus, Lens};
use crate::error::{LensError, Result};

/// How a safe write reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Every parent exists.
    Direct,
    /// At least one parent has to be created.
    Scaffold,
    /// An array parent cannot be addressed by the next segment.
    Blocked,
}

const fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn array_position(items: &[Value], segment: &str) -> Option<usize> {
    segment
        .parse::<usize>()
        .ok()
        .filter(|position| *position < items.len())
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(entries) => entries.get(segment),
        Value::Array(items) => array_position(items, segment).map(|position| &items[position]),
        _ => None,
    }
}

/// The slot for `segment` inside `container`, creating a `null` entry in
/// objects.
fn slot<'a>(container: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match container {
        Value::Object(entries) => Some(entries.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let position = array_position(items, segment)?;
            items.get_mut(position)
        }
        _ => None,
    }
}

/// The slot at the end of `parents` + `last`, when every parent exists.
fn descend<'a>(root: &'a mut Value, parents: &[String], last: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in parents {
        current = slot(current, segment)?;
    }
    slot(current, last)
}

/// Like [`descend`], replacing missing or primitive parents with empty
/// objects on the way down.
fn scaffold<'a>(root: &'a mut Value, parents: &[String], last: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in parents {
        if !is_container(current) {
            *current = Value::Object(Map::new());
        }
        let next = slot(current, segment)?;
        if !is_container(next) {
            *next = Value::Object(Map::new());
        }
        current = next;
    }
    if !is_container(current) {
        *current = Value::Object(Map::new());
    }
    slot(current, last)
}

/// Focuses on the value at the end of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLens {
    segments: PathSegments,
    safety: Safety,
}

impl PathLens {
    /// Builds a path lens from a dot-separated specification and options.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn with_options(spec: &str, options: LensOptions) -> Result<Lens> {
        Self::from_segments(Self::parse(spec)?, options)
    }

    /// Builds a path lens from explicit segments and options.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] when `segments` is empty.
    pub fn from_segments<I, S>(segments: I, options: LensOptions) -> Result<Lens>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: PathSegments = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(LensError::invalid("path must have at least one segment"));
        }
        Ok(Self::build(segments, options))
    }

    /// Splits a dot-separated specification into segments.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn parse(spec: &str) -> Result<PathSegments> {
        if spec.is_empty() {
            return Err(LensError::invalid("path must not be empty"));
        }
        Ok(spec.split('.').map(str::to_string).collect())
    }

    /// A safe lens on a single object key.
    pub(crate) fn key(key: String) -> Lens {
        let mut segments = PathSegments::new();
        segments.push(key);
        Self::build(segments, LensOptions::new())
    }

    pub(crate) fn build(segments: PathSegments, options: LensOptions) -> Lens {
        let safety = options.safety;
        let kind = LensKind::Path {
            segments: segments.clone(),
            safety,
        };
        Lens::from_parts(
            Arc::new(Self { segments, safety }),
            Flags::new(kind),
            options.view,
        )
    }

    /// Every path reachable in `value`, parents before children.
    ///
    /// Arrays are not descended into.
    #[must_use]
    pub fn derive_paths(value: &Value) -> Vec<PathSegments> {
        fn collect(prefix: &PathSegments, entries: &Map<String, Value>, paths: &mut Vec<PathSegments>) {
            for (key, child) in entries {
                let mut path = prefix.clone();
                path.push(key.clone());
                paths.push(path.clone());
                if let Value::Object(nested) = child {
                    collect(&path, nested, paths);
                }
            }
        }

        let mut paths = Vec::new();
        if let Value::Object(entries) = value {
            collect(&PathSegments::new(), entries, &mut paths);
        }
        paths
    }

    /// A safe path lens for every path reachable in `value`, keyed by the
    /// dot-separated path.
    ///
    /// # Example
    ///
    /// ```
    /// use focal::optics::PathLens;
    /// use serde_json::json;
    ///
    /// let data = json!({"a": {"b": {"c": 8, "d": 9}}});
    /// let lenses = PathLens::derive_all(&data);
    /// let keys: Vec<&str> = lenses.keys().map(String::as_str).collect();
    /// assert_eq!(keys, vec!["a", "a.b", "a.b.c", "a.b.d"]);
    /// assert_eq!(lenses["a.b.d"].get(&data).unwrap(), json!(9));
    /// ```
    #[must_use]
    pub fn derive_all(value: &Value) -> BTreeMap<String, Lens> {
        Self::derive_paths(value)
            .into_iter()
            .map(|segments| (segments.join("."), Self::build(segments, LensOptions::new())))
            .collect()
    }

    fn dotted(&self) -> String {
        self.segments.join(".")
    }

    fn traversal_error(&self, segment: &str) -> LensError {
        LensError::PathTraversal {
            path: self.dotted(),
            segment: segment.to_string(),
        }
    }

    fn route(&self, source: &Value) -> Route {
        let mut current = source;
        if !is_container(current) {
            return Route::Scaffold;
        }
        let last = self.segments.len() - 1;
        for (position, segment) in self.segments.iter().enumerate() {
            if let Value::Array(items) = current {
                if array_position(items, segment).is_none() {
                    return Route::Blocked;
                }
            }
            if position == last {
                break;
            }
            match child(current, segment) {
                Some(next) if is_container(next) => current = next,
                _ => return Route::Scaffold,
            }
        }
        Route::Direct
    }

    fn map_safe(&self, mut source: Value, function: &dyn Fn(Value) -> Value) -> Value {
        let Some((last, parents)) = self.segments.split_last() else {
            return source;
        };

        match self.route(&source) {
            Route::Blocked => {
                log::trace!("path `{}` does not index into an array; source unchanged", self.dotted());
            }
            Route::Direct => {
                if let Some(target) = descend(&mut source, parents, last) {
                    *target = function(target.take());
                }
            }
            Route::Scaffold => {
                let leaf = function(Value::Null);
                if leaf.is_null() {
                    log::trace!(
                        "path `{}` would only add empty objects; source unchanged",
                        self.dotted()
                    );
                } else if let Some(target) = scaffold(&mut source, parents, last) {
                    *target = leaf;
                }
            }
        }
        source
    }

    fn map_unsafe(&self, mut source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Ok(source);
        };
        if !is_container(&source) {
            return Err(self.traversal_error(&self.segments[0]));
        }

        let mut current = &mut source;
        for (position, segment) in parents.iter().enumerate() {
            let next_segment = &self.segments[position + 1];
            current = match slot(current, segment) {
                Some(next) if is_container(next) => next,
                _ => return Err(self.traversal_error(next_segment)),
            };
        }

        match slot(current, last) {
            Some(target) => {
                *target = function(target.take());
                Ok(source)
            }
            None => Err(self.traversal_error(last)),
        }
    }
}

impl Focus for PathLens {
    fn get(&self, source: &Value) -> Result<Value> {
        let mut current = source;
        for segment in &self.segments {
            if self.safety.is_unsafe() && !is_container(current) {
                return Err(self.traversal_error(segment));
            }
            match child(current, segment) {
                Some(next) => current = next,
                None if self.safety.is_unsafe() => current = &Value::Null,
                None => return Ok(Value::Null),
            }
        }
        Ok(current.clone())
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        if self.safety.is_unsafe() {
            self.map_unsafe(source, function)
        } else {
            Ok(self.map_safe(source, function))
        }
    }
}

/// A safe path lens from a dot-separated specification.
///
/// # Errors
///
/// Returns [`LensError::InvalidLensArgument`] for an empty specification.
pub fn path(spec: &str) -> Result<Lens> {
    PathLens::with_options(spec, LensOptions::new())
}

/// An unsafe path lens from a dot-separated specification.
///
/// # Errors
///
/// Returns [`LensError::InvalidLensArgument`] for an empty specification.
pub fn unsafe_path(spec: &str) -> Result<Lens> {
    PathLens::with_options(spec, LensOptions::new().unsafe_access())
}

/// A safe path lens from explicit segments.
///
/// # Errors
///
/// Returns [`LensError::InvalidLensArgument`] when `segments` is empty.
pub fn path_of<I, S>(segments: I) -> Result<Lens>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    PathLens::from_segments(segments, LensOptions::new())
}

impl Lens {
    fn follow(&self, spec: &str, safety: Safety) -> Result<Self> {
        let extra = PathLens::parse(spec)?;
        if let LensKind::Path {
            segments,
            safety: own_safety,
        } = self.kind()
        {
            let mut joined = segments.clone();
            joined.extend(extra);
            let options = LensOptions::new().safety(own_safety.combine(safety));
            let mut lens = PathLens::build(joined, options).with_view(self.bound_view().cloned());
            lens.add_flags(self.flags().metadata().clone());
            return Ok(lens);
        }
        Ok(self.compose(PathLens::build(extra, LensOptions::new().safety(safety))))
    }

    /// The safety of this lens if it is a path lens.
    fn path_safety(&self) -> Safety {
        match self.kind() {
            LensKind::Path { safety, .. } => *safety,
            _ => Safety::Safe,
        }
    }

    /// Follows `spec` from this lens' focus.
    ///
    /// On a path lens the segments are concatenated (keeping its safety);
    /// on any other lens a path lens is composed after it.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn path(&self, spec: &str) -> Result<Self> {
        self.follow(spec, Safety::Safe)
    }

    /// Like [`Lens::path`], but the resulting path is unsafe.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn unsafe_path(&self, spec: &str) -> Result<Self> {
        self.follow(spec, Safety::Unsafe)
    }

    /// Alias for [`Lens::path`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn following(&self, spec: &str) -> Result<Self> {
        self.path(spec)
    }

    /// Alias for [`Lens::unsafe_path`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn unsafely_following(&self, spec: &str) -> Result<Self> {
        self.unsafe_path(spec)
    }

    /// Adds a path lens (with this lens' path safety) as a parallel focus.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an empty specification.
    pub fn add_path(&self, spec: &str) -> Result<Self> {
        let options = LensOptions::new().safety(self.path_safety());
        Ok(self.add(PathLens::with_options(spec, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_existing() {
        let lens = path("a.b").unwrap();
        assert_eq!(lens.get(&json!({"a": {"b": "c"}})).unwrap(), json!("c"));
    }

    #[test]
    fn test_get_keeps_falsy_values() {
        let lens = path("a").unwrap();
        assert_eq!(lens.get(&json!({"a": 0})).unwrap(), json!(0));
        assert_eq!(lens.get(&json!({"a": false})).unwrap(), json!(false));
    }

    #[test]
    fn test_get_through_array() {
        let lens = path("a.1.b").unwrap();
        assert_eq!(lens.get(&json!({"a": [{}, {"b": 2}]})).unwrap(), json!(2));
    }

    #[test]
    fn test_set_existing() {
        let lens = path("a.b").unwrap();
        assert_eq!(
            lens.set(json!({"a": {"b": "c"}}), json!(9)).unwrap(),
            json!({"a": {"b": 9}})
        );
    }

    #[test]
    fn test_set_creates_scaffold() {
        let lens = path("a.b.c").unwrap();
        assert_eq!(
            lens.set(json!({"x": 1}), json!(5)).unwrap(),
            json!({"x": 1, "a": {"b": {"c": 5}}})
        );
    }

    #[test]
    fn test_set_null_root() {
        let lens = path("a").unwrap();
        assert_eq!(lens.set(json!(null), json!(1)).unwrap(), json!({"a": 1}));
        assert_eq!(lens.set(json!(null), json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn test_rollback_only_when_scaffolding() {
        let lens = path("a.b").unwrap();
        assert_eq!(lens.set(json!({}), json!(null)).unwrap(), json!({}));
        assert_eq!(
            lens.set(json!({"a": {}}), json!(null)).unwrap(),
            json!({"a": {"b": null}})
        );
    }

    #[test]
    fn test_set_replaces_primitive_intermediate() {
        let lens = path("a.b").unwrap();
        assert_eq!(
            lens.set(json!({"a": 3}), json!(1)).unwrap(),
            json!({"a": {"b": 1}})
        );
    }

    #[test]
    fn test_set_array_bad_index_is_blocked() {
        let lens = path("a.x").unwrap();
        assert_eq!(
            lens.set(json!({"a": [1, 2]}), json!(0)).unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn test_set_through_array() {
        let lens = path("a.0").unwrap();
        assert_eq!(
            lens.set(json!({"a": [1, 2]}), json!(0)).unwrap(),
            json!({"a": [0, 2]})
        );
    }

    #[test]
    fn test_unsafe_get_missing_intermediate() {
        let lens = unsafe_path("a.b.c").unwrap();
        assert_eq!(
            lens.get(&json!({})),
            Err(LensError::PathTraversal {
                path: "a.b.c".to_string(),
                segment: "b".to_string()
            })
        );
    }

    #[test]
    fn test_unsafe_get_missing_leaf_is_null() {
        let lens = unsafe_path("a.b").unwrap();
        assert_eq!(lens.get(&json!({"a": {}})).unwrap(), Value::Null);
    }

    #[test]
    fn test_unsafe_set() {
        let lens = unsafe_path("a.b").unwrap();
        assert_eq!(
            lens.set(json!({"a": {"b": 1}}), json!(2)).unwrap(),
            json!({"a": {"b": 2}})
        );
        assert!(matches!(
            lens.set(json!({}), json!(2)),
            Err(LensError::PathTraversal { .. })
        ));
    }

    #[test]
    fn test_empty_path_is_invalid() {
        assert!(matches!(path(""), Err(LensError::InvalidLensArgument(_))));
        assert!(matches!(
            path_of(Vec::<String>::new()),
            Err(LensError::InvalidLensArgument(_))
        ));
    }

    #[test]
    fn test_path_of_keeps_dots() {
        let lens = path_of(["a.b"]).unwrap();
        assert_eq!(lens.get(&json!({"a.b": 1})).unwrap(), json!(1));
    }

    #[test]
    fn test_chain_concatenates() {
        let lens = path("a").unwrap().path("b.c").unwrap();
        assert_eq!(lens.flag("path"), Some(json!("a.b.c")));
        assert_eq!(lens.flag("kind"), Some(json!("path")));
    }

    #[test]
    fn test_chain_keeps_metadata() {
        let mut lens = path("a").unwrap();
        lens.add_flags(serde_json::from_value(json!({"label": "root"})).unwrap());
        let longer = lens.path("b").unwrap();
        assert_eq!(longer.flag("label"), Some(json!("root")));
        assert_eq!(longer.flag("path"), Some(json!("a.b")));
    }

    #[test]
    fn test_chain_keeps_unsafety() {
        let lens = unsafe_path("a").unwrap().path("b").unwrap();
        assert_eq!(lens.flag("unsafe"), Some(json!(true)));
    }

    #[test]
    fn test_derive_paths_skips_arrays() {
        let data = json!({"a": {"b": 1}, "c": [{"d": 1}]});
        let paths: Vec<String> = PathLens::derive_paths(&data)
            .iter()
            .map(|segments| segments.join("."))
            .collect();
        assert_eq!(paths, vec!["a", "a.b", "c"]);
    }
}
