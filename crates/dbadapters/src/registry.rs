//! Registry of available database adapters

use dbadapters_core::{AdapterError, DatabaseAdapter, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available database adapters, keyed by adapter id
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn DatabaseAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Create a registry with all built-in adapters registered
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "mariadb")]
        registry.register(Arc::new(crate::mariadb::MariaDbAdapter::new()));

        registry
    }

    /// Register an adapter, replacing any previous one with the same id
    pub fn register(&mut self, adapter: Arc<dyn DatabaseAdapter>) {
        let id = adapter.id().to_string();
        tracing::info!(adapter = %id, name = adapter.display_name(), "registering database adapter");
        self.adapters.insert(id, adapter);
    }

    /// Get an adapter by id
    pub fn get(&self, id: &str) -> Option<Arc<dyn DatabaseAdapter>> {
        let adapter = self.adapters.get(id).cloned();
        if adapter.is_none() {
            tracing::warn!(adapter = %id, "adapter not found in registry");
        }
        adapter
    }

    /// Get an adapter by id, or a `NotFound` error naming the known ids
    pub fn get_or_err(&self, id: &str) -> Result<Arc<dyn DatabaseAdapter>> {
        self.get(id).ok_or_else(|| {
            AdapterError::NotFound(format!(
                "adapter '{}' (available: {})",
                id,
                self.list().join(", ")
            ))
        })
    }

    /// List all registered adapter ids, sorted
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered adapters, sorted by id
    pub fn adapters(&self) -> Vec<Arc<dyn DatabaseAdapter>> {
        self.list()
            .into_iter()
            .filter_map(|id| self.adapters.get(id).cloned())
            .collect()
    }

    /// Check if an adapter is registered
    pub fn has(&self, id: &str) -> bool {
        self.adapters.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
