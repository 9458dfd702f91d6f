//! Handle lifecycle: connect, query, close

#[cfg(test)]
mod lifecycle_tests {
    use dbadapters::{AdapterHandle, AdapterRegistry, DatabaseAdapter, Value};
    use dbadapters_mariadb::{ADAPTER_ID, DISPLAY_NAME, MariaDbAdapter};
    use pretty_assertions::assert_eq;

    use crate::fixtures::{test_adapter_handle, test_handle, test_params};

    #[tokio::test]
    async fn test_registry_lookup_and_connect() -> anyhow::Result<()> {
        let Some(params) = test_params().await? else {
            return Ok(());
        };

        let registry = AdapterRegistry::with_defaults();
        let adapter = registry.get_or_err(ADAPTER_ID)?;
        assert_eq!(adapter.display_name(), DISPLAY_NAME);

        adapter.test_connection(&params).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_query_after_close_fails() -> anyhow::Result<()> {
        let Some(handle) = test_adapter_handle().await? else {
            return Ok(());
        };

        let result = handle.query("SELECT 1", &[]).await?;
        handle.close().await?;
        assert!(handle.is_closed());

        // Results already returned stay valid
        assert_eq!(result.scalar(), Some(&Value::Int64(1)));

        let err = handle
            .query("SELECT 1", &[])
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("query after close succeeded"))?;
        assert!(
            matches!(
                err.downcast_driver::<mysql_async::Error>(),
                Some(mysql_async::Error::Driver(
                    mysql_async::DriverError::PoolDisconnected
                ))
            ),
            "expected PoolDisconnected, got {:?}",
            err
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_close_with_idle_connections() -> anyhow::Result<()> {
        let Some(handle) = test_handle().await? else {
            return Ok(());
        };

        // Leave several connections idle in the pool
        let queries = (0..3).map(|_| handle.query("SELECT SLEEP(0.1)", &[]));
        for result in futures::future::join_all(queries).await {
            result?;
        }

        handle.close().await?;
        assert!(handle.is_closed());
        assert_eq!(handle.stats().active(), 0);
        assert!(handle.query_raw("SELECT 1", &[]).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_handles_are_independent() -> anyhow::Result<()> {
        let Some(params) = test_params().await? else {
            return Ok(());
        };

        let adapter = MariaDbAdapter::new();
        let first = adapter.connect(&params).await?;
        let second = adapter.connect(&params).await?;

        first.close().await?;
        let result = second.query("SELECT 1", &[]).await?;
        assert_eq!(result.scalar(), Some(&Value::Int64(1)));
        assert!(first.query("SELECT 1", &[]).await.is_err());

        second.close().await?;
        Ok(())
    }
}
