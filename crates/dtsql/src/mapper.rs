//! Row mapping between DB column names and UI field names.

use crate::error::DtResult;
use crate::output::RowObject;
use crate::registry::ColumnRegistry;
use crate::store::DbRow;

/// Re-key one row from DB column names to UI field names.
///
/// Fails with `UnknownColumn` if the row carries a column the registry does not know,
/// which means the SELECT list and the registry disagree.
pub fn map_row(registry: &ColumnRegistry, row: DbRow) -> DtResult<RowObject> {
    let mut out = RowObject::with_capacity(row.len());
    for (db_column, value) in row {
        let ui_field = registry.ui_field(&db_column)?;
        out.insert(ui_field.to_string(), value);
    }
    Ok(out)
}

/// Re-key every row; output order matches input order.
pub fn map_rows(registry: &ColumnRegistry, rows: Vec<DbRow>) -> DtResult<Vec<RowObject>> {
    rows.into_iter().map(|row| map_row(registry, row)).collect()
}

/// Inverse of [`map_row`].
pub fn unmap_row(registry: &ColumnRegistry, row: RowObject) -> DtResult<DbRow> {
    let mut out = DbRow::with_capacity(row.len());
    for (ui_field, value) in row {
        let db_column = registry.db_column(&ui_field)?;
        out.insert(db_column.to_string(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::new([("id", "user_id"), ("fullName", "full_name"), ("bio", "bio")])
            .unwrap()
    }

    fn db_row(id: &str, name: &str, bio: Option<&str>) -> DbRow {
        let mut row = DbRow::new();
        row.insert("user_id".into(), Some(id.into()));
        row.insert("full_name".into(), Some(name.into()));
        row.insert("bio".into(), bio.map(Into::into));
        row
    }

    #[test]
    fn rekeys_by_ui_field() {
        let row = map_row(&registry(), db_row("1", "Ann Lee", None)).unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "fullName", "bio"]);
        assert_eq!(row["fullName"].as_deref(), Some("Ann Lee"));
        assert_eq!(row["bio"], None);
    }

    #[test]
    fn keeps_row_order() {
        let rows = vec![db_row("2", "B", None), db_row("1", "A", Some("x"))];
        let mapped = map_rows(&registry(), rows).unwrap();
        assert_eq!(mapped[0]["id"].as_deref(), Some("2"));
        assert_eq!(mapped[1]["id"].as_deref(), Some("1"));
    }

    #[test]
    fn round_trip_through_inverse() {
        let original = db_row("7", "Cy", Some("hello"));
        let mapped = map_row(&registry(), original.clone()).unwrap();
        assert_eq!(unmap_row(&registry(), mapped).unwrap(), original);
    }

    #[test]
    fn unexpected_db_column_fails() {
        let mut row = db_row("1", "A", None);
        row.insert("password_hash".into(), Some("...".into()));
        assert!(map_row(&registry(), row).unwrap_err().is_unknown_column());
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(map_rows(&registry(), Vec::new()).unwrap().is_empty());
    }
}
