use std::collections::HashMap;

use crate::adapter::{AdapterConfig, DatabaseAdapter};
use crate::error::DbError;
use crate::sqlite::SqliteAdapter;

type AdapterFactory = Box<dyn Fn(&AdapterConfig) -> Result<Box<dyn DatabaseAdapter>, DbError>>;

/// Explicit name-to-factory registry for adapter backends.
///
/// Passed by reference to whatever needs to construct adapters; there is no
/// process-wide registry. Phases are explicit: build (or take
/// [`with_builtin`](Self::with_builtin)), `register` factories, then
/// `create` instances.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in SQLite backend registered as `sqlite`.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("sqlite", |config| {
            Ok(Box::new(SqliteAdapter::open(config)?))
        });
        registry
    }

    /// Register a factory under a backend name, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&AdapterConfig) -> Result<Box<dyn DatabaseAdapter>, DbError> + 'static,
    ) {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Construct an adapter by backend name.
    ///
    /// # Errors
    /// Returns `DbError::UnknownAdapter` for an unregistered name, or
    /// whatever the factory itself fails with.
    pub fn create(
        &self,
        name: &str,
        config: &AdapterConfig,
    ) -> Result<Box<dyn DatabaseAdapter>, DbError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DbError::UnknownAdapter(name.to_string()))?;
        factory(config)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_is_rejected() {
        let registry = AdapterRegistry::new();
        assert!(matches!(
            registry.create("sqlite", &AdapterConfig::default()),
            Err(DbError::UnknownAdapter(_))
        ));
    }

    #[test]
    fn builtin_sqlite_is_registered() {
        let registry = AdapterRegistry::with_builtin();
        assert!(registry.contains("sqlite"));
        let adapter = registry
            .create("sqlite", &AdapterConfig::new(":memory:"))
            .unwrap();
        // A fresh database has no tables; the adapter still answers.
        let err = adapter
            .count(&crate::options::CountOptions::new("missing"))
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }
}
