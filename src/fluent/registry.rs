//! Named lens operations registered at runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{LensError, Result};
use crate::optics::Lens;

/// A user-defined lens operation: receives the lens it extends and the
/// call arguments, and returns the extended lens.
pub type Extension = Arc<dyn Fn(&Lens, &[Value]) -> Result<Lens> + Send + Sync>;

static GLOBAL_REGISTRY: LazyLock<ExtensionRegistry> = LazyLock::new(ExtensionRegistry::new);

/// A shared table of named [`Extension`]s.
///
/// Cloning the registry clones the handle, not the table: every clone sees
/// the same registrations.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    extensions: Arc<RwLock<HashMap<String, Extension>>>,
}

impl ExtensionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`Scope::new`](super::Scope::new).
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Registers `extension` under `name`, returning the extension it
    /// replaced, if any.
    pub fn register<F>(&self, name: impl Into<String>, extension: F) -> Option<Extension>
    where
        F: Fn(&Lens, &[Value]) -> Result<Lens> + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self
            .extensions
            .write()
            .insert(name.clone(), Arc::new(extension));
        if replaced.is_some() {
            log::debug!("replaced lens extension `{name}`");
        } else {
            log::debug!("registered lens extension `{name}`");
        }
        replaced
    }

    /// Removes the extension registered under `name`. Returns `true` if
    /// there was one.
    pub fn unregister(&self, name: &str) -> bool {
        self.extensions.write().remove(name).is_some()
    }

    /// Returns `true` if an extension is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.read().contains_key(name)
    }

    /// The registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.extensions.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The extension registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Extension> {
        self.extensions.read().get(name).cloned()
    }

    /// Applies the extension `name` to `lens`.
    ///
    /// The table is not locked while the extension runs, so an extension may
    /// itself use the registry.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an unknown name, and
    /// propagates the extension's own errors.
    pub fn apply(&self, lens: &Lens, name: &str, arguments: &[Value]) -> Result<Lens> {
        let extension = self
            .get(name)
            .ok_or_else(|| LensError::invalid(format!("no lens extension named `{name}`")))?;
        extension(lens, arguments)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ExtensionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl Lens {
    /// Applies the extension `name` from `registry` to this lens.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidLensArgument`] for an unknown name, and
    /// propagates the extension's own errors.
    ///
    /// # Example
    ///
    /// ```
    /// use focal::fluent::ExtensionRegistry;
    /// use focal::optics::path;
    /// use serde_json::json;
    ///
    /// let registry = ExtensionRegistry::new();
    /// registry.register("second", |lens, _| Ok(lens.index(1)));
    ///
    /// let lens = path("items").unwrap().extend(&registry, "second", &[]).unwrap();
    /// assert_eq!(lens.get(&json!({"items": [1, 2]})).unwrap(), json!(2));
    /// ```
    pub fn extend(&self, registry: &ExtensionRegistry, name: &str, arguments: &[Value]) -> Result<Self> {
        registry.apply(self, name, arguments)
    }
}

static_assertions::assert_impl_all!(ExtensionRegistry: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{identity, index};
    use serde_json::json;

    #[test]
    fn test_register_and_apply() {
        let registry = ExtensionRegistry::new();
        assert!(registry.register("first", |lens, _| Ok(lens.index(0))).is_none());
        assert!(registry.contains("first"));

        let lens = identity().extend(&registry, "first", &[]).unwrap();
        assert_eq!(lens.get(&json!([4, 5])).unwrap(), json!(4));
    }

    #[test]
    fn test_arguments_are_passed() {
        let registry = ExtensionRegistry::new();
        registry.register("nth", |lens, arguments| {
            let position = arguments
                .first()
                .and_then(Value::as_i64)
                .ok_or_else(|| LensError::invalid("nth expects an integer"))?;
            Ok(lens.index(position))
        });

        let lens = identity().extend(&registry, "nth", &[json!(-1)]).unwrap();
        assert_eq!(lens.get(&json!([4, 5])).unwrap(), json!(5));
        assert!(matches!(
            identity().extend(&registry, "nth", &[json!("x")]),
            Err(LensError::InvalidLensArgument(_))
        ));
    }

    #[test]
    fn test_register_replaces() {
        let registry = ExtensionRegistry::new();
        registry.register("pick", |_, _| Ok(index(0)));
        assert!(registry.register("pick", |_, _| Ok(index(1))).is_some());
        let lens = identity().extend(&registry, "pick", &[]).unwrap();
        assert_eq!(lens.get(&json!([4, 5])).unwrap(), json!(5));
    }

    #[test]
    fn test_unknown_name() {
        let registry = ExtensionRegistry::new();
        assert!(matches!(
            identity().extend(&registry, "missing", &[]),
            Err(LensError::InvalidLensArgument(_))
        ));
    }

    #[test]
    fn test_unregister_and_names() {
        let registry = ExtensionRegistry::new();
        registry.register("b", |lens, _| Ok(lens.clone()));
        registry.register("a", |lens, _| Ok(lens.clone()));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert_eq!(registry.names(), vec!["b"]);
    }

    #[test]
    fn test_clones_share_the_table() {
        let registry = ExtensionRegistry::new();
        let handle = registry.clone();
        handle.register("shared", |lens, _| Ok(lens.clone()));
        assert!(registry.contains("shared"));
    }
}
