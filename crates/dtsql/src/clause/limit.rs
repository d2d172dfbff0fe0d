use crate::dialect::Dialect;
use crate::request::Request;
use crate::sql::Sql;

/// Build the `LIMIT` clause for the request's page window.
///
/// Nothing is produced unless both `start` and `length` differ from `-1`. Other values,
/// negative or huge, are passed through as given; the database decides what they mean.
pub fn limit(request: &Request, dialect: Dialect) -> Sql {
    if !request.is_paged() {
        return Sql::empty();
    }
    Sql::new(dialect.limit_clause(request.start, request.length))
}
