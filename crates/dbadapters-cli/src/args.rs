//! Command line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use dbadapters::mariadb::ADAPTER_ID;
use dbadapters::{ConnectionParameters, Value};


#[derive(Parser, Debug)]
#[command(name = "dbadapters", author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered adapters
    Adapters,
    /// Connect, run `SELECT 1`, and close
    Ping(ConnectionArgs),
    /// Run one statement and print its result
    Query(QueryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Adapter id
    #[arg(long, env = "DB_ADAPTER", default_value = ADAPTER_ID)]
    pub adapter: String,

    /// Server host (adapter default when unset)
    #[arg(long, env = "DB_HOST")]
    pub host: Option<String>,

    /// Server port (adapter default when unset)
    #[arg(long, env = "DB_PORT")]
    pub port: Option<u16>,

    #[arg(short, long, env = "DB_USER")]
    pub user: String,

    #[arg(short, long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database (schema) name
    #[arg(short, long, env = "DB_NAME")]
    pub database: String,
}

impl ConnectionArgs {
    pub fn to_params(&self) -> ConnectionParameters {
        let mut params = ConnectionParameters::new(&self.user, &self.password, &self.database);
        if let Some(host) = &self.host {
            params = params.with_host(host);
        }
        if let Some(port) = self.port {
            params = params.with_port(port);
        }
        params
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL text, with `?` placeholders for `--param` values
    pub sql: String,

    /// Positional bind parameter (repeatable)
    #[arg(long = "param", value_name = "VALUE")]
    pub params: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

impl QueryArgs {
    pub fn bind_values(&self) -> Vec<Value> {
        self.params.iter().map(|p| parse_param(p)).collect()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

/// Interpret a command line parameter: `NULL`, integers, floats and
/// booleans are typed, anything else binds as a string.
pub fn parse_param(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int64(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::Float64(f);
        }
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}
