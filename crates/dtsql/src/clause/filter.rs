use crate::dialect::Dialect;
use crate::error::DtResult;
use crate::registry::ColumnRegistry;
use crate::request::{Request, RequestColumn};
use crate::sql::Sql;

/// Build the search condition (without the `WHERE` keyword).
///
/// Two groups are computed independently:
///
/// - global: when `search.value` is non-empty, one predicate per searchable column
/// - per-column: one predicate per searchable column with its own non-empty search value
///
/// Predicates inside a group are OR-ed and the group is parenthesized; the two groups
/// are AND-ed. Patterns are `%term%` and always bound, never spliced into the SQL.
/// Returns an empty fragment when there is nothing to filter on.
pub fn filter(request: &Request, registry: &ColumnRegistry, dialect: Dialect) -> DtResult<Sql> {
    let searchable = || request.columns.iter().filter(|c| c.searchable);

    let mut global = Vec::new();
    if !request.search.value.is_empty() {
        for column in searchable() {
            global.push(like(column, &request.search.value, registry, dialect)?);
        }
    }

    let mut per_column = Vec::new();
    for column in searchable().filter(|c| !c.search.value.is_empty()) {
        per_column.push(like(column, &column.search.value, registry, dialect)?);
    }

    let mut sql = Sql::empty();
    sql.push_joined(vec![group(global), group(per_column)], " AND ");
    Ok(sql)
}

fn like(
    column: &RequestColumn,
    term: &str,
    registry: &ColumnRegistry,
    dialect: Dialect,
) -> DtResult<Sql> {
    let ident = registry.ident(&column.ui_field)?;
    let mut sql = Sql::empty();
    sql.push_text_ident(ident, dialect)
        .push(" ")
        .push(dialect.like_operator())
        .push(" ")
        .push_bind(format!("%{term}%"));
    Ok(sql)
}

fn group(predicates: Vec<Sql>) -> Sql {
    let mut sql = Sql::empty();
    if !predicates.is_empty() {
        sql.push("(").push_joined(predicates, " OR ").push(")");
    }
    sql
}
