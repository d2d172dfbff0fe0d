//! The query compiler: request -> three statements -> output envelope.

use crate::clause::ClauseSet;
use crate::dialect::Dialect;
use crate::error::{DtError, DtResult};
use crate::ident::Ident;
use crate::mapper;
use crate::output::Output;
use crate::registry::{ColumnMapping, ColumnRegistry};
use crate::request::Request;
use crate::sql::{Sql, Statement};
use crate::store::TableStore;

/// Statement tags passed to [`TableStore::fetch_rows_tagged`] / `fetch_count_tagged`.
pub const TAG_ROWS: &str = "dtsql.rows";
pub const TAG_FILTERED_COUNT: &str = "dtsql.filtered_count";
pub const TAG_TOTAL_COUNT: &str = "dtsql.total_count";

/// One table exposed to the widget: where the rows live, how columns are named, and
/// which fixed conditions always apply.
///
/// Conditions come in two layers:
///
/// - `where_result` narrows what the request can see: applied to the row query and the
///   filtered count only, so it shows up as "filtered" in the envelope.
/// - `where_all` defines the data set itself: applied to all three statements,
///   including the total count.
///
/// Request search terms never reach the total count.
#[derive(Debug, Clone)]
pub struct TableEndpoint {
    table: Ident,
    primary_key: Ident,
    registry: ColumnRegistry,
    where_result: Sql,
    where_all: Sql,
}

/// The three statements one request compiles to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub rows: Statement,
    pub filtered_count: Statement,
    pub total_count: Statement,
}

impl TableEndpoint {
    /// Configure an endpoint from ordered column mappings.
    pub fn new<I, M>(table: &str, primary_key: &str, columns: I) -> DtResult<Self>
    where
        I: IntoIterator<Item = M>,
        M: Into<ColumnMapping>,
    {
        Self::with_registry(table, primary_key, ColumnRegistry::new(columns)?)
    }

    /// Configure an endpoint from an existing registry.
    pub fn with_registry(table: &str, primary_key: &str, registry: ColumnRegistry) -> DtResult<Self> {
        if registry.is_empty() {
            return Err(DtError::validation(format!(
                "table '{table}' needs at least one column"
            )));
        }
        Ok(Self {
            table: Ident::parse(table)?,
            primary_key: Ident::parse(primary_key)?,
            registry,
            where_result: Sql::empty(),
            where_all: Sql::empty(),
        })
    }

    /// Add a condition applied to the rows and the filtered count.
    pub fn where_result(mut self, condition: Sql) -> Self {
        self.where_result = condition;
        self
    }

    /// Add a condition applied to every statement, including the total count.
    pub fn where_all(mut self, condition: Sql) -> Self {
        self.where_all = condition;
        self
    }

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// Compile `request` into statements for `dialect` without touching a store.
    pub fn plan(&self, request: &Request, dialect: Dialect) -> DtResult<QueryPlan> {
        let ClauseSet {
            filter,
            order_by,
            limit,
        } = ClauseSet::build(request, &self.registry, dialect)?;

        // The request filter leads, so its placeholders match `CompiledClauses`.
        let filtered = vec![
            filter,
            parenthesize(&self.where_result),
            parenthesize(&self.where_all),
        ];

        let mut rows = Sql::new("SELECT ");
        for (i, ident) in self.registry.idents().enumerate() {
            if i > 0 {
                rows.push(", ");
            }
            if dialect.casts_to_text() {
                rows.push_text_ident(ident, dialect)
                    .push(" AS ")
                    .push_ident_ref(ident);
            } else {
                rows.push_ident_ref(ident);
            }
        }
        rows.push(" FROM ").push_ident_ref(&self.table);
        rows.push_where_and(filtered.clone());
        for tail in [order_by, limit] {
            if !tail.is_empty() {
                rows.push(" ").push_sql(tail);
            }
        }

        let mut filtered_count = self.count();
        filtered_count.push_where_and(filtered);

        let mut total_count = self.count();
        total_count.push_where_and(vec![parenthesize(&self.where_all)]);

        Ok(QueryPlan {
            rows: rows.into_statement(dialect),
            filtered_count: filtered_count.into_statement(dialect),
            total_count: total_count.into_statement(dialect),
        })
    }

    /// Serve `request` from `store`.
    ///
    /// Issues the row query, the filtered count and the total count, in that order, and
    /// maps the rows to UI field names. The first storage failure is returned as is.
    pub async fn run<S: TableStore>(&self, request: &Request, store: &S) -> DtResult<Output> {
        let plan = self.plan(request, store.dialect())?;

        let rows = store
            .fetch_rows_tagged(TAG_ROWS, &plan.rows.sql, &plan.rows.params)
            .await?;
        let records_filtered = store
            .fetch_count_tagged(
                TAG_FILTERED_COUNT,
                &plan.filtered_count.sql,
                &plan.filtered_count.params,
            )
            .await?;
        let records_total = store
            .fetch_count_tagged(
                TAG_TOTAL_COUNT,
                &plan.total_count.sql,
                &plan.total_count.params,
            )
            .await?;

        let data = mapper::map_rows(&self.registry, rows)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "dtsql",
            table = %self.table.name(),
            draw = request.draw,
            records_total,
            records_filtered,
            returned = data.len(),
            "table request served"
        );

        Ok(Output {
            draw: request.draw.max(0),
            records_total,
            records_filtered,
            data,
        })
    }

    fn count(&self) -> Sql {
        let mut sql = Sql::new("SELECT COUNT(");
        sql.push_ident_ref(&self.primary_key)
            .push(") FROM ")
            .push_ident_ref(&self.table);
        sql
    }
}

fn parenthesize(condition: &Sql) -> Sql {
    let mut sql = Sql::empty();
    if !condition.is_empty() {
        sql.push("(").push_sql(condition.clone()).push(")");
    }
    sql
}

/// Serve a request against `table` with no fixed conditions.
pub async fn simple<S, I, M>(
    request: &Request,
    store: &S,
    table: &str,
    primary_key: &str,
    columns: I,
) -> DtResult<Output>
where
    S: TableStore,
    I: IntoIterator<Item = M>,
    M: Into<ColumnMapping>,
{
    TableEndpoint::new(table, primary_key, columns)?
        .run(request, store)
        .await
}

/// Serve a request against `table` with `where_result` and `where_all` conditions.
///
/// See [`TableEndpoint`] for how the two layers differ.
pub async fn complex<S, I, M>(
    request: &Request,
    store: &S,
    table: &str,
    primary_key: &str,
    columns: I,
    where_result: Sql,
    where_all: Sql,
) -> DtResult<Output>
where
    S: TableStore,
    I: IntoIterator<Item = M>,
    M: Into<ColumnMapping>,
{
    TableEndpoint::new(table, primary_key, columns)?
        .where_result(where_result)
        .where_all(where_all)
        .run(request, store)
        .await
}
