//! Tests for the provided adapter and handle methods

use super::*;
use crate::{AdapterError, Row};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock handle that records calls
struct MockHandle {
    fail_queries: bool,
    queries: AtomicUsize,
    closed: AtomicBool,
}

#[async_trait]
impl AdapterHandle for MockHandle {
    fn adapter_id(&self) -> &str {
        "mock"
    }

    async fn query(&self, sql: &str, _params: &[Value]) -> Result<QueryResult> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(AdapterError::driver(std::io::Error::other("server gone")));
        }
        assert_eq!(sql, "SELECT 1");
        let columns: Arc<[String]> = vec!["1".to_string()].into();
        Ok(QueryResult {
            rows: vec![Row::new(columns, vec![Value::Int64(1)])],
            ..QueryResult::default()
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Mock adapter that hands out one shared handle
struct MockAdapter {
    handle: Arc<MockHandle>,
}

impl MockAdapter {
    fn new(fail_queries: bool) -> Self {
        Self {
            handle: Arc::new(MockHandle {
                fail_queries,
                queries: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }
}

#[async_trait]
impl DatabaseAdapter for MockAdapter {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock"
    }

    fn connection_limit(&self) -> usize {
        1
    }

    async fn connect(&self, _params: &ConnectionParameters) -> Result<Arc<dyn AdapterHandle>> {
        Ok(self.handle.clone())
    }
}

#[tokio::test]
async fn test_ping_runs_select_one() {
    let adapter = MockAdapter::new(false);
    let handle = adapter
        .connect(&ConnectionParameters::new("a", "b", "d"))
        .await
        .unwrap();

    handle.ping().await.unwrap();
    assert_eq!(adapter.handle.queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_test_connection_closes_handle() {
    let adapter = MockAdapter::new(false);
    adapter
        .test_connection(&ConnectionParameters::new("a", "b", "d"))
        .await
        .unwrap();

    assert!(adapter.handle.is_closed());
}

#[tokio::test]
async fn test_test_connection_closes_even_when_query_fails() {
    let adapter = MockAdapter::new(true);
    let err = adapter
        .test_connection(&ConnectionParameters::new("a", "b", "d"))
        .await
        .unwrap_err();

    assert!(err.is_driver());
    assert_eq!(err.to_string(), "server gone");
    assert!(adapter.handle.is_closed());
}

#[test]
fn test_default_port_is_unset() {
    let adapter = MockAdapter::new(false);
    assert_eq!(adapter.default_port(), None);
    assert_eq!(adapter.connection_limit(), 1);
}
