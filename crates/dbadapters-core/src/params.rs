//! Connection parameters supplied by the host

use serde::{Deserialize, Serialize};
use std::env;

use crate::{AdapterError, Result};


/// Default host used when the caller does not provide one
pub const DEFAULT_HOST: &str = "localhost";

/// Environment variable prefix read by [`ConnectionParameters::from_env`]
pub const DEFAULT_ENV_PREFIX: &str = "DB";

/// Endpoint and credentials for a database connection
///
/// `host` and `port` are optional; adapters fill in their own defaults.
/// Nothing is validated here: a bad host or a wrong password only surfaces
/// when the pool first tries to connect.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionParameters {
    /// Create parameters with the default host and port
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: None,
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Host to connect to, falling back to `localhost`
    ///
    /// An empty host string counts as absent.
    pub fn host_or_default(&self) -> &str {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Port to connect to, falling back to `default_port`
    ///
    /// Port 0 counts as absent.
    pub fn port_or(&self, default_port: u16) -> u16 {
        self.port.filter(|p| *p > 0).unwrap_or(default_port)
    }

    /// Read parameters from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`
    /// and `DB_NAME`
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Read parameters from `{prefix}_HOST`, `{prefix}_PORT`, `{prefix}_USER`,
    /// `{prefix}_PASSWORD` and `{prefix}_NAME`
    ///
    /// Host and port may be unset. User and database must be set; the
    /// password may be unset, in which case it is empty.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let var = |suffix: &str| env::var(format!("{}_{}", prefix, suffix)).ok();

        let port = match var("PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                AdapterError::Configuration(format!(
                    "{}_PORT must be a port number, got {:?}: {}",
                    prefix, raw, e
                ))
            })?),
            None => None,
        };

        let required = |suffix: &str| {
            var(suffix).ok_or_else(|| {
                AdapterError::Configuration(format!("{}_{} is not set", prefix, suffix))
            })
        };

        let params = Self {
            host: var("HOST").filter(|h| !h.is_empty()),
            port,
            user: required("USER")?,
            password: var("PASSWORD").unwrap_or_default(),
            database: required("NAME")?,
        };

        tracing::debug!(
            prefix = %prefix,
            host = ?params.host,
            port = ?params.port,
            database = %params.database,
            "connection parameters loaded from environment"
        );
        Ok(params)
    }
}

impl std::fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}
