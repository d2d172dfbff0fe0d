//! Parameter-safe SQL fragments.
//!
//! `Sql` stores SQL text, identifiers and bound values separately. Placeholders and
//! identifier quoting are only produced when the fragment is rendered for a
//! [`Dialect`], so the same fragment can be composed into a larger statement without
//! tracking parameter indices by hand.
//!
//! # Example
//!
//! ```ignore
//! use dtsql::{Dialect, Sql};
//!
//! let mut q = Sql::new("SELECT * FROM ");
//! q.push_ident("users")?.push(" WHERE status = ").push_bind("active");
//!
//! assert_eq!(q.to_sql(Dialect::Postgres), r#"SELECT * FROM "users" WHERE status = $1"#);
//! # Ok::<(), dtsql::DtError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::DtResult;
use crate::ident::Ident;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Ident(Ident),
    Param,
}

/// A composable SQL fragment with bound parameters.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    parts: Vec<SqlPart>,
    params: Vec<Value>,
}

impl Sql {
    /// Create a new fragment with initial raw SQL.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial_sql.into());
        sql
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value.into());
        self
    }

    /// Append an identifier, validating it first.
    pub fn push_ident(&mut self, ident: &str) -> DtResult<&mut Self> {
        let ident = Ident::parse(ident)?;
        self.parts.push(SqlPart::Ident(ident));
        Ok(self)
    }

    /// Append a pre-validated [`Ident`].
    pub fn push_ident_ref(&mut self, ident: &Ident) -> &mut Self {
        self.parts.push(SqlPart::Ident(ident.clone()));
        self
    }

    /// Append a column reference coerced to text where the dialect needs it
    /// (`CAST("col" AS TEXT)` on Postgres, plain `` `col` `` on MySQL).
    pub(crate) fn push_text_ident(&mut self, ident: &Ident, dialect: Dialect) -> &mut Self {
        if dialect.casts_to_text() {
            self.push("CAST(").push_ident_ref(ident).push(" AS TEXT)")
        } else {
            self.push_ident_ref(ident)
        }
    }

    /// Append another fragment, consuming it.
    pub fn push_sql(&mut self, mut other: Sql) -> &mut Self {
        for part in other.parts.drain(..) {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                part => self.parts.push(part),
            }
        }
        self.params.append(&mut other.params);
        self
    }

    /// Append fragments joined by `separator`. Empty fragments are skipped.
    pub fn push_joined(&mut self, fragments: Vec<Sql>, separator: &str) -> &mut Self {
        let mut first = true;
        for fragment in fragments.into_iter().filter(|f| !f.is_empty()) {
            if !first {
                self.push(separator);
            }
            first = false;
            self.push_sql(fragment);
        }
        self
    }

    /// Append ` WHERE ...` with `conditions` joined by `AND`.
    ///
    /// If every condition is empty, this is a no-op.
    pub fn push_where_and(&mut self, conditions: Vec<Sql>) -> &mut Self {
        let conditions: Vec<Sql> = conditions.into_iter().filter(|c| !c.is_empty()).collect();
        if conditions.is_empty() {
            return self;
        }
        self.push(" WHERE ");
        self.push_joined(conditions, " AND ")
    }

    /// Bound values, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Render SQL for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let cap = self
            .parts
            .iter()
            .map(|p| match p {
                SqlPart::Raw(s) => s.len(),
                SqlPart::Ident(_) => 16,
                SqlPart::Param => 3,
            })
            .sum();

        let mut out = String::with_capacity(cap);
        let mut idx = 0;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Ident(ident) => ident.write_sql(dialect, &mut out),
                SqlPart::Param => {
                    idx += 1;
                    dialect.write_placeholder(idx, &mut out);
                }
            }
        }
        out
    }

    /// Render into a self-contained [`Statement`].
    pub fn into_statement(self, dialect: Dialect) -> Statement {
        Statement {
            sql: self.to_sql(dialect),
            params: self.params,
        }
    }
}

/// A rendered SQL statement with its parameters, ready for a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}
