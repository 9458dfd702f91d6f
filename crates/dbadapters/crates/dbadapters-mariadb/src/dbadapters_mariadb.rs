//! MariaDB adapter implementation

mod adapter;
mod handle;
mod opts;
mod stats;
mod values;

pub use adapter::{ADAPTER_ID, DISPLAY_NAME, MariaDbAdapter};
pub use handle::MariaDbHandle;
pub use opts::{CONNECTION_LIMIT, DEFAULT_PORT, build_opts};
pub use stats::PoolStats;
pub use values::{mysql_value_to_value, value_to_param};
