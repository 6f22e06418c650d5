//! Named schema registry
//!
//! A cheaply clonable, thread-safe map from names to schemas. References
//! handed out by [`SchemaRegistry::reference`] resolve by name on first use
//! and share ownership of the map, so definitions may refer to each other
//! (or themselves) regardless of registration order.

use crate::schema::Schema;
use crate::wrappers::lookup;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Registry of named schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<DashMap<String, Schema>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous one with the same name
    pub fn register(&self, name: impl Into<String>, schema: impl Into<Schema>) {
        let name = name.into();
        trace!(name = %name, "Registering schema");
        self.schemas.insert(name, schema.into());
    }

    /// Get a schema by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Schema> {
        self.schemas.get(name).map(|entry| entry.value().clone())
    }

    /// Check if a schema exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Remove a schema
    pub fn remove(&self, name: &str) -> Option<Schema> {
        self.schemas.remove(name).map(|(_, schema)| schema)
    }

    /// Number of registered schemas
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// A lazy schema resolving `name` on first use.
    ///
    /// The reference keeps the registry's entries alive. A name that is still
    /// missing validates as `never()` and is looked up again on the next use.
    pub fn reference(&self, name: impl Into<String>) -> Schema {
        let name = name.into();
        let schemas = Arc::clone(&self.schemas);
        lookup(move || {
            let resolved = schemas.get(&name).map(|entry| entry.value().clone());
            if resolved.is_none() {
                warn!(name = %name, "Unresolved schema reference");
            }
            resolved
        })
    }
}
