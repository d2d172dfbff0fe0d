//! UI field <-> DB column mapping for one table endpoint.

use crate::error::{DtError, DtResult};
use crate::ident::Ident;
use std::collections::HashMap;

/// One declared column: the name the widget uses and the name the table uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub ui_field: String,
    pub db_column: String,
}

impl ColumnMapping {
    pub fn new(ui_field: impl Into<String>, db_column: impl Into<String>) -> Self {
        Self {
            ui_field: ui_field.into(),
            db_column: db_column.into(),
        }
    }
}

impl<U: Into<String>, D: Into<String>> From<(U, D)> for ColumnMapping {
    fn from((ui_field, db_column): (U, D)) -> Self {
        Self::new(ui_field, db_column)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    ui_field: String,
    db_column: String,
    ident: Ident,
}

/// Bidirectional, immutable column index.
///
/// Built once per endpoint; both lookup directions are hash lookups. Declaration
/// order is kept and defines the SELECT column order.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    entries: Vec<Entry>,
    by_ui: HashMap<String, usize>,
    by_db: HashMap<String, usize>,
}

impl ColumnRegistry {
    /// Build a registry from ordered mappings.
    ///
    /// Fails if a UI field or DB column is declared twice, if a UI field is empty, or if a
    /// DB column is not a valid identifier.
    pub fn new<I, M>(mappings: I) -> DtResult<Self>
    where
        I: IntoIterator<Item = M>,
        M: Into<ColumnMapping>,
    {
        let mut entries = Vec::new();
        let mut by_ui = HashMap::new();
        let mut by_db = HashMap::new();

        for mapping in mappings {
            let ColumnMapping {
                ui_field,
                db_column,
            } = mapping.into();
            if ui_field.is_empty() {
                return Err(DtError::validation(format!(
                    "empty UI field for column '{db_column}'"
                )));
            }
            let ident = Ident::parse(&db_column)?;
            // Drivers report result columns unqualified, so rows could not be mapped back.
            if ident.is_qualified() {
                return Err(DtError::validation(format!(
                    "DB column '{db_column}' must be a plain column name"
                )));
            }
            let idx = entries.len();
            if by_ui.insert(ui_field.clone(), idx).is_some() {
                return Err(DtError::validation(format!(
                    "duplicate UI field '{ui_field}'"
                )));
            }
            if by_db.insert(db_column.clone(), idx).is_some() {
                return Err(DtError::validation(format!(
                    "duplicate DB column '{db_column}'"
                )));
            }
            entries.push(Entry {
                ui_field,
                db_column,
                ident,
            });
        }

        Ok(Self {
            entries,
            by_ui,
            by_db,
        })
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a UI field to its DB column name.
    pub fn db_column(&self, ui_field: &str) -> DtResult<&str> {
        self.by_ui
            .get(ui_field)
            .map(|&i| self.entries[i].db_column.as_str())
            .ok_or_else(|| DtError::unknown_column(format!("UI field '{ui_field}'")))
    }

    /// Resolve a DB column name to its UI field.
    pub fn ui_field(&self, db_column: &str) -> DtResult<&str> {
        self.by_db
            .get(db_column)
            .map(|&i| self.entries[i].ui_field.as_str())
            .ok_or_else(|| DtError::unknown_column(format!("DB column '{db_column}'")))
    }

    /// Resolve a UI field to its validated DB identifier.
    pub(crate) fn ident(&self, ui_field: &str) -> DtResult<&Ident> {
        self.by_ui
            .get(ui_field)
            .map(|&i| &self.entries[i].ident)
            .ok_or_else(|| DtError::unknown_column(format!("UI field '{ui_field}'")))
    }

    /// Validated DB identifiers in declaration order.
    pub(crate) fn idents(&self) -> impl Iterator<Item = &Ident> {
        self.entries.iter().map(|e| &e.ident)
    }

    /// Declared mappings in order.
    pub fn mappings(&self) -> impl Iterator<Item = ColumnMapping> + '_ {
        self.entries
            .iter()
            .map(|e| ColumnMapping::new(e.ui_field.clone(), e.db_column.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::new([
            ("id", "id"),
            ("fullName", "full_name"),
            ("email", "email_address"),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_both_directions() {
        let r = registry();
        assert_eq!(r.db_column("fullName").unwrap(), "full_name");
        assert_eq!(r.ui_field("email_address").unwrap(), "email");
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn round_trip_is_identity_on_declared_set() {
        let r = registry();
        for m in r.mappings() {
            let db = r.db_column(&m.ui_field).unwrap();
            assert_eq!(r.ui_field(db).unwrap(), m.ui_field);
        }
    }

    #[test]
    fn unknown_names_fail() {
        let r = registry();
        assert!(r.db_column("nope").unwrap_err().is_unknown_column());
        assert!(r.ui_field("full_name_x").unwrap_err().is_unknown_column());
        // UI names are not DB names.
        assert!(r.ui_field("fullName").is_err());
    }

    #[test]
    fn keeps_declaration_order() {
        let names: Vec<String> = registry().idents().map(|i| i.name()).collect();
        assert_eq!(names, ["id", "full_name", "email_address"]);
    }

    #[test]
    fn rejects_duplicates() {
        let err = ColumnRegistry::new([("a", "x"), ("a", "y")]).unwrap_err();
        assert!(err.to_string().contains("duplicate UI field"));

        let err = ColumnRegistry::new([("a", "x"), ("b", "x")]).unwrap_err();
        assert!(err.to_string().contains("duplicate DB column"));
    }

    #[test]
    fn rejects_bad_definitions() {
        assert!(ColumnRegistry::new([("", "x")]).is_err());
        assert!(ColumnRegistry::new([("a", "x; drop table t")]).is_err());
        assert!(ColumnRegistry::new([("a", "users.name")]).is_err());
    }
}
