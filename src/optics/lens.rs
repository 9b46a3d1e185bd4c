//! The base lens: a get/map pair over JSON-like values.
//!
//! A [`Lens`] focuses on a part of a [`Value`]. `get` reads the focus,
//! `map` rewrites it with a function and returns the new whole, and `set`
//! is `map` with a constant function.
//!
//! # Laws
//!
//! Every settable lens must satisfy three laws (when the focus exists):
//!
//! 1. **GetPut Law**: Getting and setting back yields the original.
//!    ```text
//!    lens.set(source.clone(), lens.get(&source)?)? == source
//!    ```
//!
//! 2. **PutGet Law**: Setting then getting yields the set value.
//!    ```text
//!    lens.get(&lens.set(source, value.clone())?)? == value
//!    ```
//!
//! 3. **PutPut Law**: Two consecutive sets is equivalent to the last set.
//!    ```text
//!    lens.set(lens.set(source.clone(), v1)?, v2.clone())? == lens.set(source, v2)?
//!    ```
//!
//! # Immutability
//!
//! `map` and `set` consume the source and return a new value. Only the nodes
//! along the focused path are rebuilt; untouched branches are moved into the
//! result. Callers that still need the original keep a clone.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{Lens, index, path};
//! use serde_json::json;
//!
//! let first_name = path("people").unwrap().index(0).path("name").unwrap();
//!
//! let data = json!({"people": [{"name": "ada"}, {"name": "alan"}]});
//! assert_eq!(first_name.get(&data).unwrap(), json!("ada"));
//!
//! let updated = first_name.set(data, json!("grace")).unwrap();
//! assert_eq!(updated, json!({"people": [{"name": "grace"}, {"name": "alan"}]}));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::choice::{Conjunctive, Disjunctive};
use super::compose::Compose;
use super::flags::{Flags, LensKind};
use super::index::IndexedLens;
use super::multi::{Members, MultiLens};
use super::optional::{Fallback, Optional};
use super::path::PathLens;
use super::restricted::{Getter, Setter};
use crate::error::Result;

/// The capability shared by every lens variant.
///
/// Implementors read a focus out of a source and rebuild a source with the
/// focus transformed. [`Lens`] wraps an implementor together with its
/// [`Flags`] and an optional bound view.
pub trait Focus: Send + Sync {
    /// Extracts the focus from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error when the lens is unsafe and the focus does not exist,
    /// or when reading is not permitted.
    fn get(&self, source: &Value) -> Result<Value>;

    /// Applies `function` to the focus and returns the rebuilt source.
    ///
    /// # Errors
    ///
    /// Returns an error when the lens is unsafe and the focus cannot be
    /// written, or when writing is not permitted.
    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value>;

    /// The members of a multi-focus lens, if this is one.
    fn members(&self) -> Option<&Members> {
        None
    }
}

/// A lens implemented using get and map functions.
///
/// # Example
///
/// ```
/// use focal::optics::{FunctionLens, Lens};
/// use serde_json::{json, Value};
///
/// let double_focus = Lens::from_focus(
///     FunctionLens::new(
///         |source: &Value| Ok(source.clone()),
///         |source: Value, function: &dyn Fn(Value) -> Value| Ok(function(source)),
///     ),
///     focal::optics::LensKind::Custom,
/// );
/// assert_eq!(double_focus.get(&json!(1)).unwrap(), json!(1));
/// ```
pub struct FunctionLens<G, M> {
    getter: G,
    mapper: M,
}

impl<G, M> FunctionLens<G, M>
where
    G: Fn(&Value) -> Result<Value> + Send + Sync,
    M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync,
{
    /// Creates a new `FunctionLens` from a get and a map function.
    #[must_use]
    pub const fn new(getter: G, mapper: M) -> Self {
        Self { getter, mapper }
    }
}

impl<G, M> Focus for FunctionLens<G, M>
where
    G: Fn(&Value) -> Result<Value> + Send + Sync,
    M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync,
{
    fn get(&self, source: &Value) -> Result<Value> {
        (self.getter)(source)
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        (self.mapper)(source, function)
    }
}

impl<G, M> fmt::Debug for FunctionLens<G, M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionLens")
            .finish_non_exhaustive()
    }
}

/// Focuses on the whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLens;

impl Focus for IdentityLens {
    fn get(&self, source: &Value) -> Result<Value> {
        Ok(source.clone())
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        Ok(function(source))
    }
}

/// A composable, introspectable lens over [`Value`]s.
///
/// Cloning a `Lens` is cheap: the focus strategy is shared, so the same
/// constituent can appear in any number of composites.
#[derive(Clone)]
pub struct Lens {
    focus: Arc<dyn Focus>,
    flags: Flags,
    view: Option<Value>,
}

impl Lens {
    /// Creates a custom lens from a get and a map function.
    ///
    /// The map function must return a new structure and leave everything
    /// outside the focus as it was.
    ///
    /// # Example
    ///
    /// ```
    /// use focal::optics::Lens;
    /// use serde_json::{json, Value};
    ///
    /// let head = Lens::new(
    ///     |source: &Value| Ok(source.get(0).cloned().unwrap_or(Value::Null)),
    ///     |mut source: Value, function: &dyn Fn(Value) -> Value| {
    ///         if let Some(first) = source.get_mut(0) {
    ///             *first = function(first.take());
    ///         }
    ///         Ok(source)
    ///     },
    /// );
    ///
    /// assert_eq!(head.get(&json!([1, 2])).unwrap(), json!(1));
    /// assert_eq!(head.set(json!([1, 2]), json!(9)).unwrap(), json!([9, 2]));
    /// ```
    pub fn new<G, M>(getter: G, mapper: M) -> Self
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_focus(FunctionLens::new(getter, mapper), LensKind::Custom)
    }

    /// Creates a custom lens carrying user metadata.
    pub fn with_flags<G, M>(getter: G, mapper: M, metadata: Map<String, Value>) -> Self
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        M: Fn(Value, &dyn Fn(Value) -> Value) -> Result<Value> + Send + Sync + 'static,
    {
        let mut lens = Self::new(getter, mapper);
        lens.add_flags(metadata);
        lens
    }

    /// Wraps a focus strategy.
    pub fn from_focus<F>(focus: F, kind: LensKind) -> Self
    where
        F: Focus + 'static,
    {
        Self::from_parts(Arc::new(focus), Flags::new(kind), None)
    }

    pub(crate) fn from_parts(focus: Arc<dyn Focus>, flags: Flags, view: Option<Value>) -> Self {
        Self { focus, flags, view }
    }

    pub(crate) fn focus(&self) -> &Arc<dyn Focus> {
        &self.focus
    }

    pub(crate) fn with_view(mut self, view: Option<Value>) -> Self {
        self.view = view;
        self
    }

    /// The view a combinator of `self` and `other` inherits.
    pub(crate) fn inherited_view(&self, other: &Self) -> Option<Value> {
        self.view.clone().or_else(|| other.view.clone())
    }

    // =========================================================================
    // get / map / set
    // =========================================================================

    /// Gets the focus of this lens in `source`.
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn get(&self, source: &Value) -> Result<Value> {
        self.focus.get(source)
    }

    /// Applies `function` to the focus and returns the new source.
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn map<F>(&self, source: Value, function: F) -> Result<Value>
    where
        F: Fn(Value) -> Value,
    {
        self.focus.map(source, &function)
    }

    /// Replaces the focus with `value` and returns the new source.
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn set(&self, source: Value, value: Value) -> Result<Value> {
        self.map(source, move |_| value.clone())
    }

    /// Gets the focus in the bound view (`null` when unbound).
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn get_bound(&self) -> Result<Value> {
        match &self.view {
            Some(view) => self.get(view),
            None => self.get(&Value::Null),
        }
    }

    /// Maps `function` over the focus of the bound view.
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn map_bound<F>(&self, function: F) -> Result<Value>
    where
        F: Fn(Value) -> Value,
    {
        self.map(self.view.clone().unwrap_or(Value::Null), function)
    }

    /// Sets the focus of the bound view to `value`.
    ///
    /// # Errors
    ///
    /// Propagates the error of an unsafe or restricted lens.
    pub fn set_bound(&self, value: Value) -> Result<Value> {
        self.set(self.view.clone().unwrap_or(Value::Null), value)
    }

    // =========================================================================
    // Bound view
    // =========================================================================

    /// Returns a copy of this lens bound to `view`.
    #[must_use]
    pub fn view(&self, view: Value) -> Self {
        self.clone().with_view(Some(view))
    }

    /// Alias for [`Lens::view`].
    #[must_use]
    pub fn viewing(&self, view: Value) -> Self {
        self.view(view)
    }

    /// Returns a copy of this lens with no bound view.
    #[must_use]
    pub fn blur(&self) -> Self {
        self.clone().with_view(None)
    }

    /// The bound view, if any.
    #[must_use]
    pub const fn bound_view(&self) -> Option<&Value> {
        self.view.as_ref()
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// The flags of this lens.
    #[must_use]
    pub const fn flags(&self) -> &Flags {
        &self.flags
    }

    /// The kind of this lens.
    #[must_use]
    pub const fn kind(&self) -> &LensKind {
        self.flags.kind()
    }

    /// Looks up a single flag by name.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<Value> {
        self.flags.get(name)
    }

    /// Adds user metadata to this lens.
    pub fn add_flags(&mut self, metadata: Map<String, Value>) {
        self.flags.extend(metadata);
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Composes this lens with `other`: `other` focuses inside this lens'
    /// focus.
    #[must_use]
    pub fn compose(&self, other: Self) -> Self {
        Compose::build(self.clone(), other)
    }

    /// Left-folds [`Lens::compose`] over `others`.
    #[must_use]
    pub fn compose_many<I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        others
            .into_iter()
            .fold(self.clone(), |lens, other| lens.compose(other))
    }

    /// Focuses on this lens and `other` at once.
    ///
    /// When this lens is already a list [`MultiLens`] the new focus is
    /// appended to it.
    #[must_use]
    pub fn add(&self, other: Self) -> Self {
        let lenses = match self.focus.members() {
            Some(Members::List(lenses)) => {
                let mut lenses = lenses.clone();
                lenses.push(other.clone());
                lenses
            }
            _ => vec![self.clone(), other.clone()],
        };
        MultiLens::from_members(Members::List(lenses), &self.flags, Some(&other))
            .with_view(self.inherited_view(&other))
    }

    /// Left-folds [`Lens::add`] over `others`.
    #[must_use]
    pub fn add_many<I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        others
            .into_iter()
            .fold(self.clone(), |lens, other| lens.add(other))
    }

    /// Adds `other` under `key` to a keyed [`MultiLens`].
    ///
    /// Any other lens becomes the first member of a new keyed multi-lens
    /// under the key `"0"`.
    #[must_use]
    pub fn add_keyed(&self, key: impl Into<String>, other: Self) -> Self {
        let key = key.into();
        let entries = match self.focus.members() {
            Some(Members::Keyed(entries)) => {
                let mut entries = entries.clone();
                entries.retain(|(existing, _)| *existing != key);
                entries.push((key, other.clone()));
                entries
            }
            _ => vec![("0".to_string(), self.clone()), (key, other.clone())],
        };
        MultiLens::from_members(Members::Keyed(entries), &self.flags, Some(&other))
            .with_view(self.inherited_view(&other))
    }

    /// Focuses with this lens when its focus exists, otherwise with `other`.
    #[must_use]
    pub fn or(&self, other: Self) -> Self {
        Disjunctive::build(self.clone(), other)
    }

    /// Focuses on both this lens and `other`, only when both foci exist.
    #[must_use]
    pub fn and(&self, other: Self) -> Self {
        Conjunctive::build(self.clone(), other)
    }

    /// Converts errors raised by this lens into `fallback`.
    #[must_use]
    pub fn optional(&self, fallback: Fallback) -> Self {
        Optional::build(self.clone(), fallback)
    }

    /// A read-only view of this lens.
    #[must_use]
    pub fn getter(&self) -> Self {
        Getter::from_lens(self)
    }

    /// A write-only view of this lens.
    #[must_use]
    pub fn setter(&self) -> Self {
        Setter::from_lens(self)
    }

    /// Focuses on every element of the array in the bound view at once.
    ///
    /// `function` receives an index lens for each element, bound to this
    /// lens' focus so that its bound read is the element, and returns the
    /// lens to use for it; the results are joined into a [`MultiLens`] and
    /// composed after this lens. A focus that is not an array yields an
    /// empty multi-lens.
    ///
    /// # Errors
    ///
    /// Propagates errors from reading the focus or from `function`.
    ///
    /// # Example
    ///
    /// ```
    /// use focal::optics::identity;
    /// use serde_json::json;
    ///
    /// let points = json!([{"x": 1, "y": 2}, {"x": 3, "y": 4}]);
    /// let xs = identity().view(points).each(|point| point.path("x")).unwrap();
    /// assert_eq!(xs.get_bound().unwrap(), json!([1, 3]));
    /// ```
    pub fn each<F>(&self, function: F) -> Result<Self>
    where
        F: Fn(Self) -> Result<Self>,
    {
        let focus = self.get_bound()?;
        let members = match &focus {
            Value::Array(items) => IndexedLens::derive_range(items.len())
                .into_iter()
                .map(|element| function(element.view(focus.clone())))
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };
        Ok(self.compose(MultiLens::from_members(
            Members::List(members),
            &self.flags,
            None,
        )))
    }

    /// Focuses on every entry of the object in the bound view at once.
    ///
    /// Like [`Lens::each`], but `function` receives a path lens for each key,
    /// bound to this lens' focus.
    ///
    /// # Errors
    ///
    /// Propagates errors from reading the focus or from `function`.
    pub fn own<F>(&self, function: F) -> Result<Self>
    where
        F: Fn(Self) -> Result<Self>,
    {
        let focus = self.get_bound()?;
        let members = match &focus {
            Value::Object(entries) => entries
                .keys()
                .map(|key| function(PathLens::key(key.clone()).view(focus.clone())))
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };
        Ok(self.compose(MultiLens::from_members(
            Members::List(members),
            &self.flags,
            None,
        )))
    }
}

impl fmt::Debug for Lens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Lens")
            .field("flags", &self.flags)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// The lens focusing on the whole value.
#[must_use]
pub fn identity() -> Lens {
    Lens::from_focus(IdentityLens, LensKind::Identity)
}

static_assertions::assert_impl_all!(Lens: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn head() -> Lens {
        Lens::new(
            |source: &Value| Ok(source.get(0).cloned().unwrap_or(Value::Null)),
            |mut source: Value, function: &dyn Fn(Value) -> Value| {
                if let Some(first) = source.get_mut(0) {
                    *first = function(first.take());
                }
                Ok(source)
            },
        )
    }

    #[test]
    fn test_function_lens_get() {
        assert_eq!(head().get(&json!([1, 2, 3])).unwrap(), json!(1));
    }

    #[test]
    fn test_function_lens_map() {
        let doubled = head()
            .map(json!([1, 2, 3]), |value| json!(value.as_i64().unwrap() * 2))
            .unwrap();
        assert_eq!(doubled, json!([2, 2, 3]));
    }

    #[test]
    fn test_set_is_constant_map() {
        let lens = head();
        let by_set = lens.set(json!([1, 2]), json!("x")).unwrap();
        let by_map = lens.map(json!([1, 2]), |_| json!("x")).unwrap();
        assert_eq!(by_set, by_map);
    }

    #[test]
    fn test_view_returns_new_lens() {
        let lens = head();
        let bound = lens.view(json!([7, 8]));
        assert!(lens.bound_view().is_none());
        assert_eq!(bound.get_bound().unwrap(), json!(7));
        assert_eq!(bound.set_bound(json!(0)).unwrap(), json!([0, 8]));
        assert_eq!(
            bound.map_bound(|value| json!(value.as_i64().unwrap() + 1)).unwrap(),
            json!([8, 8])
        );
    }

    #[test]
    fn test_blur_clears_view() {
        let bound = head().view(json!([7, 8]));
        let blurred = bound.blur();
        assert!(blurred.bound_view().is_none());
        assert_eq!(blurred.get_bound().unwrap(), Value::Null);
    }

    #[test]
    fn test_identity() {
        let lens = identity();
        assert_eq!(lens.get(&json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert_eq!(lens.set(json!({"a": 1}), json!(5)).unwrap(), json!(5));
        assert_eq!(lens.kind(), &LensKind::Identity);
    }

    #[test]
    fn test_add_flags_mutates_receiver() {
        let mut lens = head();
        lens.add_flags(serde_json::from_value(json!({"label": "head"})).unwrap());
        assert_eq!(lens.flag("label"), Some(json!("head")));
        assert_eq!(lens.flag("kind"), Some(json!("custom")));
    }

    #[test]
    fn test_with_flags() {
        let lens = Lens::with_flags(
            |source: &Value| Ok(source.clone()),
            |source: Value, function: &dyn Fn(Value) -> Value| Ok(function(source)),
            serde_json::from_value(json!({"origin": "test"})).unwrap(),
        );
        assert_eq!(lens.flag("origin"), Some(json!("test")));
    }

    #[test]
    fn test_each_on_non_array_is_empty() {
        let lens = identity().view(json!({"a": 1}));
        let each = lens.each(Ok).unwrap();
        assert_eq!(each.get_bound().unwrap(), json!([]));
    }

    #[test]
    fn test_each_and_own_bind_element_lenses() {
        let rows = identity().view(json!([[1, 2], [3]]));
        let elements = rows
            .each(|row| {
                assert!(row.get_bound()?.is_array());
                Ok(row)
            })
            .unwrap();
        assert_eq!(elements.get_bound().unwrap(), json!([[1, 2], [3]]));

        let record = identity().view(json!({"a": "x"}));
        let entries = record
            .own(|entry| {
                assert_eq!(entry.get_bound()?, json!("x"));
                Ok(entry)
            })
            .unwrap();
        assert_eq!(entries.get_bound().unwrap(), json!(["x"]));
    }
}
