//! Error types for dtsql

use thiserror::Error;

/// Result type alias for dtsql operations
pub type DtResult<T> = Result<T, DtError>;

/// Error types for request compilation and execution
#[derive(Debug, Error)]
pub enum DtError {
    /// The request is structurally invalid (bad index, bad number, bad flag)
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A UI field or DB column is not present in the column registry
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Invalid endpoint configuration (duplicate mapping, bad identifier, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DtError {
    /// Create a malformed request error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    /// Create an unknown column error
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a malformed request error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRequest(_))
    }

    /// Check if this is an unknown column error
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn(_))
    }

    /// Check if the failure came from the storage collaborator.
    pub fn is_storage_error(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Query(_) | Self::Decode { .. } => true,
            #[cfg(feature = "pool")]
            Self::Pool(_) => true,
            _ => false,
        }
    }

    /// Whether the caller sent something we cannot serve (a 4xx, as opposed to a 5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedRequest(_) | Self::UnknownColumn(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DtError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
