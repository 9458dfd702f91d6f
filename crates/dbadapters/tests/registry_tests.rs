/// Integration tests for the adapter registry
use async_trait::async_trait;
use dbadapters::{
    AdapterError, AdapterHandle, AdapterRegistry, ConnectionParameters, DatabaseAdapter, Result,
};
use std::sync::Arc;

struct FakeAdapter {
    id: &'static str,
}

#[async_trait]
impl DatabaseAdapter for FakeAdapter {
    fn id(&self) -> &'static str {
        self.id
    }

    fn display_name(&self) -> &'static str {
        "Fake"
    }

    fn connection_limit(&self) -> usize {
        1
    }

    async fn connect(&self, _params: &ConnectionParameters) -> Result<Arc<dyn AdapterHandle>> {
        Err(AdapterError::Configuration("fake adapter cannot connect".into()))
    }
}

#[test]
fn test_empty_registry() {
    let registry = AdapterRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.list().is_empty());
    assert!(registry.get("local-mariadb").is_none());
}

#[test]
fn test_register_and_lookup() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { id: "zeta" }));
    registry.register(Arc::new(FakeAdapter { id: "alpha" }));

    assert_eq!(registry.len(), 2);
    assert!(registry.has("zeta"));
    assert_eq!(registry.list(), vec!["alpha", "zeta"]);
    assert_eq!(registry.get("alpha").unwrap().display_name(), "Fake");

    let ids: Vec<&str> = registry.adapters().iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}

#[test]
fn test_register_replaces_same_id() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { id: "dup" }));
    registry.register(Arc::new(FakeAdapter { id: "dup" }));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_get_or_err_names_available_adapters() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { id: "alpha" }));

    let err = registry.get_or_err("missing").err().unwrap();
    assert!(matches!(err, AdapterError::NotFound(_)));
    let message = err.to_string();
    assert!(message.contains("missing"));
    assert!(message.contains("alpha"));
}

#[tokio::test]
async fn test_connect_error_comes_from_adapter() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { id: "alpha" }));

    let adapter = registry.get_or_err("alpha").unwrap();
    let result = adapter
        .connect(&ConnectionParameters::new("u", "p", "db"))
        .await;
    assert!(matches!(result, Err(AdapterError::Configuration(_))));
}

#[cfg(feature = "mariadb")]
mod mariadb {
    use super::*;

    #[test]
    fn test_defaults_include_local_mariadb() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.has("local-mariadb"));

        let adapter = registry.get("local-mariadb").unwrap();
        assert_eq!(adapter.display_name(), "Local MariaDB");
        assert_eq!(adapter.connection_limit(), 5);
        assert_eq!(adapter.default_port(), Some(3306));
    }

    #[test]
    fn test_default_is_with_defaults() {
        assert_eq!(AdapterRegistry::default().list(), vec!["local-mariadb"]);
    }
}
