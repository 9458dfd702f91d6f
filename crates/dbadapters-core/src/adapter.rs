//! Adapter and handle traits

use async_trait::async_trait;
use std::sync::Arc;

use crate::{ConnectionParameters, QueryResult, Result, Value};

#[cfg(test)]
mod tests;

/// A database adapter a host can select by id
///
/// An adapter carries fixed identity metadata and knows how to turn
/// [`ConnectionParameters`] into a pooled [`AdapterHandle`].
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Stable identifier used for lookup (e.g. "local-mariadb")
    fn id(&self) -> &'static str;

    /// Human-readable name shown when listing adapters
    fn display_name(&self) -> &'static str;

    /// Port used when the parameters leave it unset
    fn default_port(&self) -> Option<u16> {
        None
    }

    /// Maximum number of live connections a handle may hold
    fn connection_limit(&self) -> usize;

    /// Build a pooled handle
    ///
    /// Whether this touches the network is up to the wrapped driver's pool.
    async fn connect(&self, params: &ConnectionParameters) -> Result<Arc<dyn AdapterHandle>>;

    /// Connect, run `SELECT 1`, and close again
    #[tracing::instrument(skip(self, params), fields(adapter = self.id()))]
    async fn test_connection(&self, params: &ConnectionParameters) -> Result<()> {
        tracing::debug!("testing connection");
        let handle = self.connect(params).await?;
        let outcome = handle.ping().await;
        let closed = handle.close().await;
        outcome?;
        closed
    }
}

/// A pooled handle returned by [`DatabaseAdapter::connect`]
///
/// Callers never see raw connections: each `query` checks one out and
/// returns it before resolving.
#[async_trait]
pub trait AdapterHandle: Send + Sync {
    /// Id of the adapter that created this handle
    fn adapter_id(&self) -> &str;

    /// Run one statement with positional bind parameters
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Release every pooled connection and shut the pool down
    async fn close(&self) -> Result<()>;

    /// Whether `close` has been called on this handle
    fn is_closed(&self) -> bool;

    /// Round-trip a trivial query
    async fn ping(&self) -> Result<()> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}
