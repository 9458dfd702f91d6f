//! Error types for database adapters

use thiserror::Error;

/// Boxed error produced by an underlying database driver
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for adapter operations
///
/// Failures raised by the wrapped driver (refused connections, rejected
/// credentials, SQL errors, acquisition timeouts) are carried as-is in
/// [`AdapterError::Driver`]. The remaining variants cover concerns that
/// never reach the driver.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{0}")]
    Driver(#[source] DriverError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Adapter not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdapterError {
    /// Wrap a driver error without altering it
    pub fn driver<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AdapterError::Driver(Box::new(error))
    }

    /// Borrow the driver error as its concrete type, if this is one
    pub fn downcast_driver<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            AdapterError::Driver(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Whether the error came from the underlying driver
    pub fn is_driver(&self) -> bool {
        matches!(self, AdapterError::Driver(_))
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
