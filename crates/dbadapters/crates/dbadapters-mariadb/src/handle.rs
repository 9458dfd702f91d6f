//! Pooled MariaDB handle

use async_trait::async_trait;
use dbadapters_core::{AdapterError, AdapterHandle, QueryResult, Result, Value};
use mysql_async::prelude::{Protocol, Queryable};
use mysql_async::{Column, Conn, Opts, Params, Pool, QueryResult as MySqlResult, Row as MySqlRow};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::stats::{CheckoutCounters, CounterGuard, PoolStats};
use crate::values::{convert_result_set, value_to_param};
use crate::{ADAPTER_ID, CONNECTION_LIMIT};


/// A connection checked out for one query
///
/// Fields drop in order: the counter is released before the connection goes
/// back to the pool, so `active` never overcounts.
struct Checkout {
    _active: CounterGuard,
    conn: Conn,
}

/// Everything the driver reported for one result set
struct RawResultSet {
    columns: Option<Arc<[Column]>>,
    rows: Vec<MySqlRow>,
    affected_rows: u64,
    last_insert_id: Option<u64>,
}

/// Handle over a `mysql_async` pool capped at five connections
///
/// The pool is owned here and never handed out. Each query checks out one
/// connection and gives it back before returning, whether the query
/// succeeded, failed, or its future was dropped.
pub struct MariaDbHandle {
    pool: Pool,
    counters: Arc<CheckoutCounters>,
    closed: AtomicBool,
    endpoint: String,
}

impl MariaDbHandle {
    /// Create the pool. `mysql_async` connects lazily, so no I/O happens here.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn new(opts: Opts, endpoint: String) -> Self {
        Self {
            pool: Pool::new(opts),
            counters: CheckoutCounters::new(CONNECTION_LIMIT),
            closed: AtomicBool::new(false),
            endpoint,
        }
    }

    /// Current checkout counters
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// `host:port` this handle connects to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a statement and return the driver's rows unmodified, one entry
    /// per result set
    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql_preview(sql), params = params.len()))]
    pub async fn query_raw(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<MySqlRow>>> {
        let sets = self.run(sql, params).await?;
        Ok(sets.into_iter().map(|set| set.rows).collect())
    }

    async fn checkout(&self) -> Result<Checkout> {
        let waiting = self.counters.wait();
        let conn = self.pool.get_conn().await.map_err(|e| {
            tracing::debug!(error = %e, endpoint = %self.endpoint, "failed to get MariaDB connection");
            AdapterError::driver(e)
        })?;
        drop(waiting);

        Ok(Checkout {
            _active: self.counters.checkout(),
            conn,
        })
    }

    async fn run(&self, sql: &str, params: &[Value]) -> Result<Vec<RawResultSet>> {
        let mut checkout = self.checkout().await?;
        let result = execute(&mut checkout.conn, sql, params).await;
        drop(checkout);
        result.map_err(AdapterError::driver)
    }
}

/// Empty parameter lists use the text protocol; anything else is prepared
/// and bound positionally.
async fn execute(
    conn: &mut Conn,
    sql: &str,
    params: &[Value],
) -> std::result::Result<Vec<RawResultSet>, mysql_async::Error> {
    if params.is_empty() {
        read_result_sets(conn.query_iter(sql).await?).await
    } else {
        let bound = Params::Positional(params.iter().map(value_to_param).collect());
        read_result_sets(conn.exec_iter(sql, bound).await?).await
    }
}

/// Read every result set of a statement batch, in order
///
/// Always yields at least one set. Counters are taken before collecting:
/// collecting a set moves the connection on to the next set's header. A
/// statement without rows still leaves a pending (column-less) set, so the
/// loop runs until no set is pending. A server error in a later set stays
/// pending and surfaces from `drop_result`.
async fn read_result_sets<P: Protocol>(
    mut result: MySqlResult<'_, 'static, P>,
) -> std::result::Result<Vec<RawResultSet>, mysql_async::Error> {
    let mut sets = Vec::new();
    loop {
        let columns = result.columns();
        let has_rows = columns.as_ref().is_some_and(|c| !c.is_empty());
        // Row sets end in a terminator, not in an OK packet of their own
        let (affected_rows, last_insert_id) = if has_rows {
            (0, None)
        } else {
            (result.affected_rows(), result.last_insert_id())
        };

        let rows: Vec<MySqlRow> = result.collect().await?;
        sets.push(RawResultSet {
            columns,
            rows,
            affected_rows,
            last_insert_id,
        });

        if result.columns().is_none() {
            break;
        }
    }
    result.drop_result().await?;
    Ok(sets)
}

fn sql_preview(sql: &str) -> String {
    sql.chars().take(100).collect()
}

#[async_trait]
impl AdapterHandle for MariaDbHandle {
    fn adapter_id(&self) -> &str {
        ADAPTER_ID
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql_preview(sql), params = params.len()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let start_time = Instant::now();
        let sets = self.run(sql, params).await?;
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        let mut converted = sets.into_iter().map(|set| {
            let (columns, rows) = convert_result_set(set.columns, set.rows);
            QueryResult {
                columns,
                rows,
                affected_rows: set.affected_rows,
                last_insert_id: set.last_insert_id,
                ..Default::default()
            }
        });
        let mut result = converted.next().unwrap_or_default();
        result.more_results = converted.collect();
        result.execution_time_ms = execution_time_ms;

        tracing::debug!(
            row_count = result.rows.len(),
            affected_rows = result.affected_rows,
            result_sets = result.more_results.len() + 1,
            execution_time_ms = execution_time_ms,
            "query executed"
        );

        Ok(result)
    }

    /// The pool stops handing out connections as soon as disconnecting
    /// starts, so the handle counts as closed once `disconnect` resolves,
    /// even when tearing down idle connections failed.
    async fn close(&self) -> Result<()> {
        tracing::info!(endpoint = %self.endpoint, "closing MariaDB connection pool");
        let outcome = self.pool.clone().disconnect().await;
        self.closed.store(true, Ordering::SeqCst);
        outcome.map_err(|e| {
            tracing::warn!(error = %e, endpoint = %self.endpoint, "MariaDB pool disconnect failed");
            AdapterError::driver(e)
        })
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
