//! Docker container management for integration tests.
//!
//! The MariaDB container is started lazily by the first test that needs it
//! and kept for the rest of the test process. When Docker cannot be reached
//! the failure is remembered, so later tests skip without retrying.

use once_cell::sync::Lazy;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::mariadb::Mariadb;
use tokio::sync::Mutex;

/// Connection details of a running test server
#[derive(Clone, Debug)]
pub struct ContainerInfo {
    /// Host address (typically 127.0.0.1)
    pub host: String,
    /// Port number (randomly assigned by testcontainers)
    pub port: u16,
    /// Database name
    pub database: String,
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
}

impl ContainerInfo {
    /// Details of a manually started server
    pub fn manual() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3307,
            database: "test".to_string(),
            username: "root".to_string(),
            password: String::new(),
        }
    }
}

enum ContainerState {
    Running {
        #[allow(dead_code)]
        inner: ContainerAsync<Mariadb>,
        info: ContainerInfo,
    },
    Unavailable(String),
}

/// Held across startup so concurrent tests share one container
static MARIADB_CONTAINER: Lazy<Mutex<Option<ContainerState>>> = Lazy::new(|| Mutex::new(None));

/// Get or create the MariaDB test container
///
/// Returns `Ok(None)` when the container could not be started, with the
/// reason logged once. `require` turns that into an error instead.
pub async fn mariadb_container(require: bool) -> anyhow::Result<Option<ContainerInfo>> {
    let mut guard = MARIADB_CONTAINER.lock().await;

    if guard.is_none() {
        *guard = Some(start_mariadb().await);
    }

    match guard.as_ref() {
        Some(ContainerState::Running { info, .. }) => Ok(Some(info.clone())),
        Some(ContainerState::Unavailable(reason)) if require => Err(anyhow::anyhow!(
            "MariaDB container unavailable: {}",
            reason
        )),
        _ => Ok(None),
    }
}

async fn start_mariadb() -> ContainerState {
    tracing::info!("starting MariaDB test container");

    let container = match Mariadb::default().start().await {
        Ok(container) => container,
        Err(e) => {
            tracing::warn!(error = %e, "failed to start MariaDB container - is Docker running?");
            return ContainerState::Unavailable(e.to_string());
        }
    };

    let port = match container.get_host_port_ipv4(3306).await {
        Ok(port) => port,
        Err(e) => {
            tracing::warn!(error = %e, "failed to get MariaDB port");
            return ContainerState::Unavailable(e.to_string());
        }
    };

    // testcontainers-modules MariaDB defaults: root user with empty password and "test" database
    let info = ContainerInfo {
        host: "127.0.0.1".to_string(),
        port,
        database: "test".to_string(),
        username: "root".to_string(),
        password: String::new(),
    };

    tracing::info!(port, "MariaDB test container started");

    ContainerState::Running {
        inner: container,
        info,
    }
}
