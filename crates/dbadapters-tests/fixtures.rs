//! Shared fixtures for the MariaDB integration tests.
//!
//! Every test builds its own handle, because a `mysql_async` pool belongs to
//! the Tokio runtime it was created on and each `#[tokio::test]` gets a fresh
//! runtime. Only the server (container) is shared.
//!
//! Fixtures return `Ok(None)` when no server is available, and tests return
//! early in that case:
//!
//! ```rust,ignore
//! let Some(handle) = test_handle().await? else {
//!     return Ok(());
//! };
//! ```

use anyhow::{Context, Result};
use dbadapters::{AdapterHandle, AdapterRegistry, ConnectionParameters};
use dbadapters_mariadb::{ADAPTER_ID, MariaDbAdapter, MariaDbHandle};
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::test_containers::{ContainerInfo, mariadb_container};

/// Use a server on 127.0.0.1:3307 instead of starting a container
///
/// Set DBADAPTERS_TEST_MANUAL_CONTAINERS=1 to enable.
pub fn use_manual_containers() -> bool {
    env_flag("DBADAPTERS_TEST_MANUAL_CONTAINERS")
}

/// Fail rather than skip when no server can be reached
///
/// Set DBADAPTERS_REQUIRE_CONTAINERS=1 to enable (e.g. in CI).
pub fn require_containers() -> bool {
    env_flag("DBADAPTERS_REQUIRE_CONTAINERS")
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(false)
}

/// Connection parameters for the test server, if one is available
pub async fn test_params() -> Result<Option<ConnectionParameters>> {
    initialize_logging();

    let info = if use_manual_containers() {
        ContainerInfo::manual()
    } else {
        match mariadb_container(require_containers()).await? {
            Some(info) => info,
            None => {
                tracing::warn!("skipping test: no MariaDB server available");
                return Ok(None);
            }
        }
    };

    Ok(Some(
        ConnectionParameters::new(info.username, info.password, info.database)
            .with_host(info.host)
            .with_port(info.port),
    ))
}

/// A ready MariaDB handle, keeping the concrete type for stats and raw rows
pub async fn test_handle() -> Result<Option<MariaDbHandle>> {
    let Some(params) = test_params().await? else {
        return Ok(None);
    };

    let handle = MariaDbAdapter::new().open(&params)?;
    wait_for_database_ready(&handle, 10, Duration::from_millis(500)).await?;
    Ok(Some(handle))
}

/// A ready handle obtained the way a host would: registry lookup by id,
/// then `connect`
pub async fn test_adapter_handle() -> Result<Option<Arc<dyn AdapterHandle>>> {
    let Some(params) = test_params().await? else {
        return Ok(None);
    };

    let adapter = AdapterRegistry::with_defaults().get_or_err(ADAPTER_ID)?;
    let handle = adapter.connect(&params).await?;
    wait_for_database_ready(handle.as_ref(), 10, Duration::from_millis(500)).await?;
    Ok(Some(handle))
}

/// Ping until the server answers
///
/// A freshly started container can accept TCP before it accepts queries.
async fn wait_for_database_ready(
    handle: &dyn AdapterHandle,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<()> {
    let mut attempt = 1;
    loop {
        match handle.ping().await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < max_attempts => {
                let delay = base_delay * attempt;
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "MariaDB not ready, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("MariaDB not ready after {} attempts", max_attempts)
                });
            }
        }
    }
}

/// Table name that no other test in this process uses
pub fn unique_table(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!(
        "{}_{}_{}",
        prefix,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Drop a table created by a test
pub async fn drop_table(handle: &dyn AdapterHandle, table: &str) -> Result<()> {
    handle
        .query(&format!("DROP TABLE IF EXISTS `{}`", table), &[])
        .await
        .with_context(|| format!("failed to drop table {}", table))?;
    Ok(())
}

/// Initialize logging for tests if not already initialized
fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(
                "dbadapters=debug,dbadapters_mariadb=debug,dbadapters_tests=debug",
            )
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
