//! `dbadapters` command line: list adapters, check a connection, run a query

mod args;
mod output;

use anyhow::Context;
use clap::Parser;
use dbadapters::AdapterRegistry;

use crate::args::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = AdapterRegistry::with_defaults();

    match cli.command {
        Command::Adapters => {
            println!("{}", output::adapters_table(&registry.adapters()));
        }
        Command::Ping(conn) => {
            let adapter = registry.get_or_err(&conn.adapter)?;
            let params = conn.to_params();
            adapter
                .test_connection(&params)
                .await
                .with_context(|| format!("connection to '{}' failed", conn.adapter))?;
            println!("{}: ok", adapter.display_name());
        }
        Command::Query(query) => {
            let adapter = registry.get_or_err(&query.conn.adapter)?;
            let handle = adapter.connect(&query.conn.to_params()).await?;
            tracing::debug!(adapter = handle.adapter_id(), params = query.params.len(), "running query");

            let outcome = handle.query(&query.sql, &query.bind_values()).await;
            // Close before reporting so the pool is torn down on both paths
            let closed = handle.close().await;

            let result = outcome.context("query failed")?;
            closed.context("failed to close connection pool")?;

            println!("{}", output::render(&result, query.format)?);
        }
    }

    Ok(())
}

/// Log to stderr so query output on stdout stays clean
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
