//! Driver options built from connection parameters

use dbadapters_core::{AdapterError, ConnectionParameters, Result};
use mysql_async::{Opts, OptsBuilder, PoolConstraints, PoolOpts};


/// Port used when the parameters leave it unset
pub const DEFAULT_PORT: u16 = 3306;

/// Maximum number of live connections per handle
pub const CONNECTION_LIMIT: usize = 5;

/// Build `mysql_async` options for a pool capped at [`CONNECTION_LIMIT`]
///
/// Host and port fall back to `localhost:3306`. Credentials are passed
/// through untouched; the server is the one that accepts or rejects them.
pub fn build_opts(params: &ConnectionParameters) -> Result<Opts> {
    let constraints = PoolConstraints::new(0, CONNECTION_LIMIT).ok_or_else(|| {
        AdapterError::Configuration(format!(
            "Failed to configure MariaDB pool constraints (min=0, max={})",
            CONNECTION_LIMIT
        ))
    })?;
    let pool_opts = PoolOpts::default().with_constraints(constraints);

    let builder = OptsBuilder::default()
        .ip_or_hostname(params.host_or_default())
        .tcp_port(params.port_or(DEFAULT_PORT))
        .user(Some(params.user.as_str()))
        .pass(Some(params.password.as_str()))
        .db_name(Some(params.database.as_str()))
        .pool_opts(pool_opts);

    Ok(builder.into())
}

/// `host:port` the options point at, for log fields
pub fn endpoint(params: &ConnectionParameters) -> String {
    format!("{}:{}", params.host_or_default(), params.port_or(DEFAULT_PORT))
}
