use crate::error::{DtError, DtResult};
use crate::registry::ColumnRegistry;
use crate::request::Request;
use crate::sql::Sql;

/// Build the `ORDER BY` clause from the request's sort keys.
///
/// Keys are applied in the order given. Each key's index points into
/// `request.columns`; an index past the end is a malformed request, a column whose UI
/// field is not registered is an unknown column. Columns not marked orderable are
/// skipped. Rows that tie on every key come back in whatever order the database picks,
/// so callers wanting stable pages should sort on a unique column last.
pub fn order_by(request: &Request, registry: &ColumnRegistry) -> DtResult<Sql> {
    let mut terms = Vec::with_capacity(request.order.len());

    for (i, spec) in request.order.iter().enumerate() {
        let column = request.columns.get(spec.column).ok_or_else(|| {
            DtError::malformed(format!(
                "order[{i}][column] = {} but only {} columns were sent",
                spec.column,
                request.columns.len()
            ))
        })?;
        let ident = registry.ident(&column.ui_field)?;
        if !column.orderable {
            continue;
        }

        let mut term = Sql::empty();
        term.push_ident_ref(ident).push(" ").push(spec.dir.as_sql());
        terms.push(term);
    }

    let mut sql = Sql::empty();
    if !terms.is_empty() {
        sql.push("ORDER BY ").push_joined(terms, ", ");
    }
    Ok(sql)
}
