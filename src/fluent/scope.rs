//! A value paired with lens constructors pre-bound to it.

use regex::Regex;
use serde_json::Value;

use super::registry::ExtensionRegistry;
use crate::error::Result;
use crate::optics::{
    FilterCriterion, FilterLens, IndexedLens, Lens, LensOptions, PathLens, PluckCriterion,
    PluckLens, SliceLens, identity,
};

/// Builds lenses bound to a value.
///
/// A scope behaves like the identity lens on its value: [`Scope::get`]
/// returns the value, [`Scope::set`] returns the replacement and
/// [`Scope::map`] applies the function to the value.
///
/// # Example
///
/// ```
/// use focal::fluent::scope;
/// use serde_json::json;
///
/// let numbers = scope(json!([1, 2, 3]));
/// assert_eq!(numbers.index(0).set_bound(json!(100)).unwrap(), json!([100, 2, 3]));
/// assert_eq!(numbers.slice(Some(0), Some(2)).unwrap().set_bound(json!([])).unwrap(), json!([3]));
/// assert!(numbers.unsafe_index(100).set_bound(json!(99)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Scope {
    value: Value,
    registry: ExtensionRegistry,
}

/// A scope over `value` using the global extension registry.
#[must_use]
pub fn scope(value: Value) -> Scope {
    Scope::new(value)
}

impl Scope {
    /// A scope over `value` using [`ExtensionRegistry::global`].
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            value,
            registry: ExtensionRegistry::global().clone(),
        }
    }

    /// Uses `registry` for [`Scope::call`].
    #[must_use]
    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The bound value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the scope, returning the bound value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The registry consulted by [`Scope::call`].
    #[must_use]
    pub const fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// The identity lens bound to the value.
    #[must_use]
    pub fn root(&self) -> Lens {
        identity().view(self.value.clone())
    }

    fn options(&self) -> LensOptions {
        LensOptions::new().viewing(self.value.clone())
    }

    // =========================================================================
    // Identity semantics
    // =========================================================================

    /// A copy of the bound value.
    #[must_use]
    pub fn get(&self) -> Value {
        self.value.clone()
    }

    /// Replaces the whole value: returns `value`.
    #[must_use]
    pub fn set(&self, value: Value) -> Value {
        value
    }

    /// Applies `function` to a copy of the bound value.
    pub fn map<F>(&self, function: F) -> Value
    where
        F: FnOnce(Value) -> Value,
    {
        function(self.value.clone())
    }

    // =========================================================================
    // Bound constructors
    // =========================================================================

    /// A bound safe index lens.
    #[must_use]
    pub fn index(&self, index: i64) -> Lens {
        IndexedLens::with_options(index, self.options())
    }

    /// A bound unsafe index lens.
    #[must_use]
    pub fn unsafe_index(&self, index: i64) -> Lens {
        IndexedLens::with_options(index, self.options().unsafe_access())
    }

    /// A bound slice lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// when neither bound is given.
    pub fn slice(&self, start: Option<i64>, end: Option<i64>) -> Result<Lens> {
        SliceLens::with_options(start, end, self.options())
    }

    /// A bound slice lens from a `"start:end"` specification.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an invalid specification.
    pub fn slice_spec(&self, spec: &str) -> Result<Lens> {
        SliceLens::parse_with_options(spec, self.options())
    }

    /// A bound safe path lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an empty path.
    pub fn path(&self, spec: &str) -> Result<Lens> {
        PathLens::with_options(spec, self.options())
    }

    /// A bound unsafe path lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an empty path.
    pub fn unsafe_path(&self, spec: &str) -> Result<Lens> {
        PathLens::with_options(spec, self.options().unsafe_access())
    }

    /// A bound pluck lens.
    #[must_use]
    pub fn pluck(&self, criterion: impl Into<PluckCriterion>) -> Lens {
        PluckLens::with_options(criterion.into(), false, self.options())
    }

    /// A bound recursive pluck lens.
    #[must_use]
    pub fn recursive_pluck(&self, criterion: impl Into<PluckCriterion>) -> Lens {
        PluckLens::with_options(criterion.into(), true, self.options())
    }

    /// A bound filter lens.
    #[must_use]
    pub fn filter(&self, criterion: impl Into<FilterCriterion>) -> Lens {
        FilterLens::with_options(criterion.into(), self.options())
    }

    /// A bound filter lens from a predicate.
    #[must_use]
    pub fn filter_by<F>(&self, predicate: F) -> Lens
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.filter(FilterCriterion::predicate(predicate))
    }

    /// A bound filter lens from a pattern.
    #[must_use]
    pub fn filter_pattern(&self, pattern: Regex) -> Lens {
        self.filter(pattern)
    }

    /// Focuses on every element of the bound array; see [`Lens::each`].
    ///
    /// # Errors
    ///
    /// Propagates errors from `function`.
    pub fn each<F>(&self, function: F) -> Result<Lens>
    where
        F: Fn(Lens) -> Result<Lens>,
    {
        self.root().each(function)
    }

    /// Focuses on every entry of the bound object; see [`Lens::own`].
    ///
    /// # Errors
    ///
    /// Propagates errors from `function`.
    pub fn own<F>(&self, function: F) -> Result<Lens>
    where
        F: Fn(Lens) -> Result<Lens>,
    {
        self.root().own(function)
    }

    /// Applies the registered extension `name` to the bound identity lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an unknown name, and propagates the extension's own errors.
    pub fn call(&self, name: &str, arguments: &[Value]) -> Result<Lens> {
        self.registry.apply(&self.root(), name, arguments)
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// Alias for [`Scope::index`].
    #[must_use]
    pub fn indexing(&self, index: i64) -> Lens {
        self.index(index)
    }

    /// Alias for [`Scope::unsafe_index`].
    #[must_use]
    pub fn unsafely_indexing(&self, index: i64) -> Lens {
        self.unsafe_index(index)
    }

    /// Alias for [`Scope::slice`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// when neither bound is given.
    pub fn slicing(&self, start: Option<i64>, end: Option<i64>) -> Result<Lens> {
        self.slice(start, end)
    }

    /// Alias for [`Scope::path`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an empty path.
    pub fn following(&self, spec: &str) -> Result<Lens> {
        self.path(spec)
    }

    /// Alias for [`Scope::unsafe_path`].
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`](crate::LensError::InvalidLensArgument)
    /// for an empty path.
    pub fn unsafely_following(&self, spec: &str) -> Result<Lens> {
        self.unsafe_path(spec)
    }

    /// Alias for [`Scope::pluck`].
    #[must_use]
    pub fn plucking(&self, criterion: impl Into<PluckCriterion>) -> Lens {
        self.pluck(criterion)
    }

    /// Alias for [`Scope::recursive_pluck`].
    #[must_use]
    pub fn recursively_plucking(&self, criterion: impl Into<PluckCriterion>) -> Lens {
        self.recursive_pluck(criterion)
    }

    /// Alias for [`Scope::filter`].
    #[must_use]
    pub fn filtering(&self, criterion: impl Into<FilterCriterion>) -> Lens {
        self.filter(criterion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_semantics() {
        let data = scope(json!({"a": 1}));
        assert_eq!(data.get(), json!({"a": 1}));
        assert_eq!(data.set(json!(2)), json!(2));
        assert_eq!(data.map(|value| json!([value])), json!([{"a": 1}]));
        assert_eq!(data.value(), &json!({"a": 1}));
    }

    #[test]
    fn test_constructors_are_bound() {
        let data = scope(json!({"a": [1, 2]}));
        let lens = data.path("a").unwrap();
        assert_eq!(lens.bound_view(), Some(&json!({"a": [1, 2]})));
        assert_eq!(lens.index(1).get_bound().unwrap(), json!(2));
    }

    #[test]
    fn test_each_and_own() {
        let data = scope(json!([{"x": 1}, {"x": 2}]));
        let xs = data.each(|item| item.path("x")).unwrap();
        assert_eq!(xs.get_bound().unwrap(), json!([1, 2]));

        let entries = scope(json!({"a": 1, "b": 2}));
        let all = entries.own(Ok).unwrap();
        assert_eq!(
            all.map_bound(|value| json!(value.as_i64().unwrap() * 3)).unwrap(),
            json!({"a": 3, "b": 6})
        );
    }

    #[test]
    fn test_call_uses_scope_registry() {
        let registry = ExtensionRegistry::new();
        registry.register("tail", |lens, _| lens.slice_spec("1:"));
        let data = scope(json!([1, 2, 3])).with_registry(registry);
        assert_eq!(data.call("tail", &[]).unwrap().get_bound().unwrap(), json!([2, 3]));
    }
}
