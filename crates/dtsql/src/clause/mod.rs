//! Clause builders.
//!
//! Each builder turns one part of a [`Request`] into a SQL fragment:
//!
//! - [`limit`]: page window -> `LIMIT`
//! - [`order_by`]: sort keys -> `ORDER BY`
//! - [`filter`]: global and per-column search -> the `WHERE` condition
//!
//! The builders are stateless; an empty [`Sql`] means "no clause".

mod filter;
mod limit;
mod order;


pub use filter::filter;
pub use limit::limit;
pub use order::order_by;

use crate::dialect::Dialect;
use crate::error::DtResult;
use crate::registry::ColumnRegistry;
use crate::request::Request;
use crate::sql::Sql;
use crate::value::Value;

/// The three request-derived fragments, unrendered.
///
/// Both [`CompiledClauses`] and [`TableEndpoint::plan`](crate::TableEndpoint::plan) start
/// from this, so the builders run in one order and fail the same way. The sort keys are
/// checked before the search terms.
#[derive(Debug, Clone)]
pub(crate) struct ClauseSet {
    pub(crate) filter: Sql,
    pub(crate) order_by: Sql,
    pub(crate) limit: Sql,
}

impl ClauseSet {
    pub(crate) fn build(request: &Request, registry: &ColumnRegistry, dialect: Dialect) -> DtResult<Self> {
        let order_by = order_by(request, registry)?;
        let filter = filter(request, registry, dialect)?;
        Ok(Self {
            filter,
            order_by,
            limit: limit(request, dialect),
        })
    }
}

/// The three request-derived clauses rendered for one dialect.
///
/// A standalone view for inspection: the search condition is rendered on its own, so its
/// placeholders are numbered from 1. Statements that put other bound values ahead of it
/// must be composed from the unrendered fragments, as `TableEndpoint::plan` does.
/// Built fresh per request. Empty strings mean the clause is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClauses {
    pub where_sql: String,
    pub where_params: Vec<Value>,
    pub order_by_sql: String,
    pub limit_sql: String,
}

impl CompiledClauses {
    pub fn build(request: &Request, registry: &ColumnRegistry, dialect: Dialect) -> DtResult<Self> {
        let ClauseSet {
            filter,
            order_by,
            limit,
        } = ClauseSet::build(request, registry, dialect)?;

        let mut where_clause = Sql::empty();
        if !filter.is_empty() {
            where_clause.push("WHERE ").push_sql(filter);
        }

        Ok(Self {
            where_sql: where_clause.to_sql(dialect),
            where_params: where_clause.params().to_vec(),
            order_by_sql: order_by.to_sql(dialect),
            limit_sql: limit.to_sql(dialect),
        })
    }
}
