//! # dtsql
//!
//! Server-side processing for browser data-table widgets: turns a paging / search /
//! sort request into parameterized SQL, runs it, and returns the envelope the widget
//! renders.
//!
//! ## Features
//!
//! - **Parameterized**: search terms are always bound, identifiers are validated and quoted
//! - **Column mapping**: UI field names never leak into SQL; a registry maps them to columns
//! - **Correct counts**: `recordsTotal` ignores search filters, `recordsFiltered` applies them
//! - **Injected storage**: pass a client, transaction or pooled connection per call
//! - **Two dialects**: MySQL-style and PostgreSQL rendering
//!
//! ## Example
//!
//! ```ignore
//! use dtsql::{Request, TableEndpoint};
//!
//! let users = TableEndpoint::new("users", "id", [
//!     ("id", "id"),
//!     ("name", "full_name"),
//!     ("email", "email"),
//! ])?;
//!
//! let request = Request::from_query(query_string)?;
//! let output = users.run(&request, &client).await?;
//! let body = serde_json::to_string(&output)?;
//! ```

pub mod clause;
pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod mapper;
pub mod output;
pub mod registry;
pub mod request;
pub mod sql;
pub mod store;
pub mod value;

#[cfg(feature = "tracing")]
pub mod monitor;

pub use clause::CompiledClauses;
pub use compiler::{QueryPlan, TableEndpoint, complex, simple};
pub use config::ConnectOptions;
pub use dialect::Dialect;
pub use error::{DtError, DtResult};
pub use ident::Ident;
pub use mapper::{map_row, map_rows, unmap_row};
pub use output::{ErrorBody, Output, RowObject};
pub use registry::{ColumnMapping, ColumnRegistry};
pub use request::{Direction, OrderSpec, Request, RequestColumn, Search};
pub use sql::{Sql, Statement};
pub use store::{DbRow, TableStore};
pub use value::Value;

#[cfg(feature = "tracing")]
pub use monitor::TracingStore;
