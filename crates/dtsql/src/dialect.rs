//! SQL dialects understood by the clause builders.
//!
//! The compiler never talks to a driver directly, so everything that differs between
//! backends (identifier quoting, placeholder style, the LIMIT form, pattern matching) is
//! decided here.

/// SQL flavour spoken by a [`TableStore`](crate::TableStore).
///
/// The bundled stores (tokio-postgres and deadpool clients) all report
/// [`Dialect::Postgres`]. [`Dialect::MySql`] is the default for rendering and inspection
/// ([`TableEndpoint::plan`](crate::TableEndpoint::plan),
/// [`CompiledClauses`](crate::CompiledClauses)); running it needs a MySQL-backed
/// `TableStore` supplied by the caller, and [`ConnectOptions`](crate::ConnectOptions) only
/// connects to PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Backtick identifiers, `?` placeholders, `LIMIT start, length`.
    #[default]
    MySql,
    /// Double-quoted identifiers, `$n` placeholders, `LIMIT length OFFSET start`.
    Postgres,
}

impl Dialect {
    /// Write a single identifier part with this dialect's quoting.
    pub(crate) fn write_quoted(self, name: &str, out: &mut String) {
        let quote = match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        };
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
    }

    /// Write the placeholder for the 1-based parameter `idx`.
    pub(crate) fn write_placeholder(self, idx: usize, out: &mut String) {
        match self {
            Dialect::MySql => out.push('?'),
            Dialect::Postgres => {
                out.push('$');
                out.push_str(&idx.to_string());
            }
        }
    }

    /// Render a LIMIT clause for an offset/length pair.
    pub fn limit_clause(self, start: i64, length: i64) -> String {
        match self {
            Dialect::MySql => format!("LIMIT {start}, {length}"),
            Dialect::Postgres => format!("LIMIT {length} OFFSET {start}"),
        }
    }

    /// Case-insensitive pattern operator.
    ///
    /// MySQL's `LIKE` is already case-insensitive under the default collations.
    pub fn like_operator(self) -> &'static str {
        match self {
            Dialect::MySql => "LIKE",
            Dialect::Postgres => "ILIKE",
        }
    }

    /// Whether column references must be coerced to text before pattern matching
    /// or string decoding.
    pub fn casts_to_text(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}
