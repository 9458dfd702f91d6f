//! Core abstractions shared by every database adapter
//!
//! This crate defines the contract a host uses to pick an adapter and talk
//! to a database through it:
//!
//! - `DatabaseAdapter` - identity metadata plus `connect`
//! - `AdapterHandle` - the pooled handle returned by `connect` (`query`, `close`)
//! - `ConnectionParameters` - credentials and endpoint, with defaults applied by the adapter
//! - Common types like `Value`, `Row`, `QueryResult`

mod adapter;
mod error;
mod params;
mod types;

pub use adapter::*;
pub use error::*;
pub use params::*;
pub use types::*;
