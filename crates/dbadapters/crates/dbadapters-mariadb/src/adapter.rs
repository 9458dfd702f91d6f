//! MariaDB adapter

use async_trait::async_trait;
use dbadapters_core::{AdapterError, AdapterHandle, ConnectionParameters, DatabaseAdapter, Result};
use std::sync::Arc;

use crate::MariaDbHandle;
use crate::opts::{CONNECTION_LIMIT, DEFAULT_PORT, build_opts, endpoint};

/// Identifier hosts use to select this adapter
pub const ADAPTER_ID: &str = "local-mariadb";

/// Name shown when adapters are listed
pub const DISPLAY_NAME: &str = "Local MariaDB";

/// Adapter for a local MariaDB (or MySQL) server
pub struct MariaDbAdapter;

impl MariaDbAdapter {
    /// Create a new MariaDB adapter instance
    pub fn new() -> Self {
        tracing::debug!("MariaDB adapter initialized");
        Self
    }

    /// Build a pooled handle and keep its concrete type
    ///
    /// Use this instead of [`DatabaseAdapter::connect`] to reach
    /// [`MariaDbHandle::query_raw`] and [`MariaDbHandle::stats`].
    pub fn open(&self, params: &ConnectionParameters) -> Result<MariaDbHandle> {
        // mysql_async spawns its pool housekeeping onto the current runtime
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AdapterError::Configuration(
                "MariaDB pools must be created from within a Tokio runtime".into(),
            ));
        }

        let opts = build_opts(params)?;
        let endpoint = endpoint(params);

        tracing::info!(
            endpoint = %endpoint,
            database = %params.database,
            connection_limit = CONNECTION_LIMIT,
            "MariaDB connection pool created"
        );
        Ok(MariaDbHandle::new(opts, endpoint))
    }
}

impl Default for MariaDbAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseAdapter for MariaDbAdapter {
    fn id(&self) -> &'static str {
        ADAPTER_ID
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn default_port(&self) -> Option<u16> {
        Some(DEFAULT_PORT)
    }

    fn connection_limit(&self) -> usize {
        CONNECTION_LIMIT
    }

    #[tracing::instrument(skip(self, params), fields(host = params.host_or_default(), database = %params.database))]
    async fn connect(&self, params: &ConnectionParameters) -> Result<Arc<dyn AdapterHandle>> {
        Ok(Arc::new(self.open(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let adapter = MariaDbAdapter::new();
        assert_eq!(adapter.id(), "local-mariadb");
        assert_eq!(adapter.display_name(), "Local MariaDB");
        assert_eq!(adapter.default_port(), Some(3306));
        assert_eq!(adapter.connection_limit(), 5);
    }

    #[test]
    fn test_open_outside_runtime_is_rejected() {
        let err = MariaDbAdapter::new()
            .open(&ConnectionParameters::new("a", "b", "d"))
            .err()
            .expect("open should fail without a runtime");
        assert!(matches!(err, AdapterError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_connect_returns_trait_object() {
        let adapter: Arc<dyn DatabaseAdapter> = Arc::new(MariaDbAdapter::new());
        let handle = adapter
            .connect(&ConnectionParameters::new("a", "b", "d"))
            .await
            .unwrap();

        assert_eq!(handle.adapter_id(), adapter.id());
        assert!(!handle.is_closed());
    }
}
