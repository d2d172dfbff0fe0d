//! The storage collaborator.
//!
//! The compiler only needs two read operations: a multi-row SELECT returning rows keyed
//! by column name, and a scalar COUNT. [`TableStore`] captures exactly that, so the
//! connection (or pool, or transaction) is passed in per call instead of living in a
//! process-wide handle.

use crate::dialect::Dialect;
use crate::error::{DtError, DtResult};
use crate::value::Value;
use indexmap::IndexMap;
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A result row keyed by DB column name, in SELECT order. SQL NULL is `None`.
pub type DbRow = IndexMap<String, Option<String>>;

/// Read access to the backing relational store.
///
/// Implementations must be safe to share across concurrent requests; the compiler
/// never mutates anything through them.
pub trait TableStore: Send + Sync {
    /// The SQL dialect statements must be rendered in.
    fn dialect(&self) -> Dialect;

    /// Execute a SELECT and return all rows as text.
    fn fetch_rows(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<Vec<DbRow>>> + Send;

    /// Execute a `SELECT COUNT(...)` and return the count.
    fn fetch_count(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<i64>> + Send;

    /// Execute a SELECT, associating a tag for monitoring/observability.
    ///
    /// The default implementation ignores `tag` and calls [`TableStore::fetch_rows`].
    fn fetch_rows_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<Vec<DbRow>>> + Send {
        let _ = tag;
        self.fetch_rows(sql, params)
    }

    /// Execute a COUNT, associating a tag for monitoring/observability.
    ///
    /// The default implementation ignores `tag` and calls [`TableStore::fetch_count`].
    fn fetch_count_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<i64>> + Send {
        let _ = tag;
        self.fetch_count(sql, params)
    }
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn fetch_rows(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<Vec<DbRow>>> + Send {
        (**self).fetch_rows(sql, params)
    }

    fn fetch_count(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<i64>> + Send {
        (**self).fetch_count(sql, params)
    }

    fn fetch_rows_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<Vec<DbRow>>> + Send {
        (**self).fetch_rows_tagged(tag, sql, params)
    }

    fn fetch_count_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DtResult<i64>> + Send {
        (**self).fetch_count_tagged(tag, sql, params)
    }
}

fn param_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

fn decode_row(row: &Row) -> DtResult<DbRow> {
    let mut out = DbRow::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let value: Option<String> = row
            .try_get(i)
            .map_err(|e| DtError::decode(column.name(), e.to_string()))?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_count(row: &Row) -> DtResult<i64> {
    row.try_get(0)
        .map_err(|e| DtError::decode("count", e.to_string()))
}

/// Implement [`TableStore`] for a type that derefs to tokio-postgres query methods.
macro_rules! impl_postgres_store {
    ($ty:ty) => {
        impl TableStore for $ty {
            fn dialect(&self) -> Dialect {
                Dialect::Postgres
            }

            async fn fetch_rows(&self, sql: &str, params: &[Value]) -> DtResult<Vec<DbRow>> {
                let rows = self.query(sql, &param_refs(params)).await?;
                rows.iter().map(decode_row).collect()
            }

            async fn fetch_count(&self, sql: &str, params: &[Value]) -> DtResult<i64> {
                let row = self.query_one(sql, &param_refs(params)).await?;
                decode_count(&row)
            }
        }
    };
}

impl_postgres_store!(tokio_postgres::Client);
impl_postgres_store!(tokio_postgres::Transaction<'_>);

#[cfg(feature = "pool")]
impl_postgres_store!(deadpool_postgres::Client);
