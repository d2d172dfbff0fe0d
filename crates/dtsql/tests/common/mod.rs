#![allow(dead_code)]

use dtsql::compiler::{TAG_FILTERED_COUNT, TAG_TOTAL_COUNT};
use dtsql::{DbRow, Dialect, DtError, DtResult, TableStore, Value};
use std::sync::Mutex;

/// One statement as the store received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub tag: String,
    pub sql: String,
    pub params: Vec<Value>,
}

/// In-memory store returning canned results and recording every statement.
pub struct MemoryStore {
    dialect: Dialect,
    rows: Vec<DbRow>,
    filtered: i64,
    total: i64,
    fail_at: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryStore {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            rows: Vec::new(),
            filtered: 0,
            total: 0,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rows(mut self, rows: Vec<DbRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn counts(mut self, filtered: i64, total: i64) -> Self {
        self.filtered = filtered;
        self.total = total;
        self
    }

    /// Fail the `n`th statement (0-based) with a connection error.
    pub fn fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, tag: &str, sql: &str, params: &[Value]) -> DtResult<()> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.len();
        calls.push(Call {
            tag: tag.to_string(),
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        if self.fail_at == Some(n) {
            return Err(DtError::Connection("connection reset by peer".into()));
        }
        Ok(())
    }
}

impl TableStore for MemoryStore {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn fetch_rows(&self, sql: &str, params: &[Value]) -> DtResult<Vec<DbRow>> {
        self.fetch_rows_tagged("", sql, params).await
    }

    async fn fetch_count(&self, sql: &str, params: &[Value]) -> DtResult<i64> {
        self.fetch_count_tagged("", sql, params).await
    }

    async fn fetch_rows_tagged(&self, tag: &str, sql: &str, params: &[Value]) -> DtResult<Vec<DbRow>> {
        self.record(tag, sql, params)?;
        Ok(self.rows.clone())
    }

    // Answered per statement, so concurrent requests sharing the store each get both counts.
    async fn fetch_count_tagged(&self, tag: &str, sql: &str, params: &[Value]) -> DtResult<i64> {
        self.record(tag, sql, params)?;
        match tag {
            TAG_FILTERED_COUNT => Ok(self.filtered),
            TAG_TOTAL_COUNT => Ok(self.total),
            _ => panic!("count issued without a known tag: {tag:?}"),
        }
    }
}

/// Build a DB row from `(column, value)` pairs.
pub fn db_row(values: &[(&str, Option<&str>)]) -> DbRow {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

pub async fn try_connect() -> Option<tokio_postgres::Client> {
    let _ = dotenvy::dotenv();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}
