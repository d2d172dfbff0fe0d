//! Safe SQL identifier handling.
//!
//! Table, primary-key and column names come from endpoint configuration and are spliced
//! into SQL text (identifiers cannot be bound as parameters), so they are validated once
//! here and quoted for the target [`Dialect`] when rendered.
//!
//! - Each dotted part must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - `schema.table` and `table.column` forms are accepted
//!
//! # Example
//! ```ignore
//! use dtsql::{Dialect, Ident};
//!
//! let t = Ident::parse("app.users")?;
//! assert_eq!(t.to_sql(Dialect::MySql), "`app`.`users`");
//! # Ok::<(), dtsql::DtError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{DtError, DtResult};

/// A validated SQL identifier (column, table, or schema-qualified table).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// Parse and validate an identifier string.
    pub fn parse(s: &str) -> DtResult<Self> {
        if s.is_empty() {
            return Err(DtError::validation("Identifier cannot be empty"));
        }

        let mut parts = Vec::new();
        for segment in s.split('.') {
            let mut chars = segment.chars();
            match chars.next() {
                None => {
                    return Err(DtError::validation(format!(
                        "Empty identifier segment in '{s}'"
                    )));
                }
                Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
                Some(c) => {
                    return Err(DtError::validation(format!(
                        "Invalid identifier start character: '{c}'"
                    )));
                }
            }
            if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
                return Err(DtError::validation(format!(
                    "Invalid character in identifier: '{c}'"
                )));
            }
            parts.push(segment.to_string());
        }

        Ok(Self { parts })
    }

    /// The identifier as written in configuration (unquoted, dotted).
    pub fn name(&self) -> String {
        self.parts.join(".")
    }

    /// Whether the identifier has more than one dotted part.
    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// Render the identifier as quoted SQL.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: Dialect, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            dialect.write_quoted(part, out);
        }
    }
}
