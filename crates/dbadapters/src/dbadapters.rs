//! Database adapters behind one registry
//!
//! This crate collects the concrete adapters implementing the traits in
//! `dbadapters-core` and lets a host look them up by id.

#[cfg(feature = "mariadb")]
pub use dbadapters_mariadb as mariadb;

mod registry;

pub use registry::AdapterRegistry;

/// Re-export commonly used types from dbadapters-core
pub use dbadapters_core::{
    AdapterError, AdapterHandle, ColumnMeta, ConnectionParameters, DatabaseAdapter, QueryResult,
    Result, Row, Value,
};
