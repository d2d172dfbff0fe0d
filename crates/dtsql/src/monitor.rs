//! `tracing` instrumentation for stores.
//!
//! Enable via the crate feature: `dtsql = { features = ["tracing"] }` (on by default).

use crate::dialect::Dialect;
use crate::error::{DtError, DtResult};
use std::fmt;
use crate::store::{DbRow, TableStore};
use crate::value::Value;
use std::time::{Duration, Instant};
use tracing::Level;

/// Wraps a [`TableStore`] and emits one `tracing` event per executed statement.
///
/// Events go to target `dtsql.sql` with the statement tag, parameter count, elapsed
/// time, the outcome and the (optionally truncated) SQL. Parameter values are never
/// logged since they carry user search input.
#[derive(Debug, Clone)]
pub struct TracingStore<S> {
    inner: S,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl<S> TracingStore<S> {
    /// Wrap `inner`, logging at DEBUG with SQL truncated to 200 bytes.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }

    fn emit(&self, tag: &str, sql: &str, param_count: usize, elapsed: Duration, outcome: Outcome<'_>) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN => tracing::warn!($($field)*),
                    Level::INFO => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        // Field expressions are only evaluated when the event is enabled.
        emit_at_level!(
            self.level,
            target: "dtsql.sql",
            tag,
            param_count,
            elapsed_us = elapsed.as_micros() as u64,
            outcome = %outcome,
            sql = %self.truncate_sql(sql),
        );
    }
}

/// Statement result as recorded on the event. Only formatted when the event is enabled.
#[derive(Debug, Clone, Copy)]
enum Outcome<'a> {
    Rows(usize),
    Count(i64),
    Failed(&'a DtError),
}

impl fmt::Display for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rows(n) => write!(f, "{n} rows"),
            Outcome::Count(n) => write!(f, "count {n}"),
            Outcome::Failed(e) => write!(f, "error: {e}"),
        }
    }
}

impl<S: TableStore> TableStore for TracingStore<S> {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    async fn fetch_rows(&self, sql: &str, params: &[Value]) -> DtResult<Vec<DbRow>> {
        self.fetch_rows_tagged("-", sql, params).await
    }

    async fn fetch_count(&self, sql: &str, params: &[Value]) -> DtResult<i64> {
        self.fetch_count_tagged("-", sql, params).await
    }

    async fn fetch_rows_tagged(&self, tag: &str, sql: &str, params: &[Value]) -> DtResult<Vec<DbRow>> {
        let start = Instant::now();
        let result = self.inner.fetch_rows_tagged(tag, sql, params).await;
        let outcome = match &result {
            Ok(rows) => Outcome::Rows(rows.len()),
            Err(e) => Outcome::Failed(e),
        };
        self.emit(tag, sql, params.len(), start.elapsed(), outcome);
        result
    }

    async fn fetch_count_tagged(&self, tag: &str, sql: &str, params: &[Value]) -> DtResult<i64> {
        let start = Instant::now();
        let result = self.inner.fetch_count_tagged(tag, sql, params).await;
        let outcome = match &result {
            Ok(count) => Outcome::Count(*count),
            Err(e) => Outcome::Failed(e),
        };
        self.emit(tag, sql, params.len(), start.elapsed(), outcome);
        result
    }
}
