//! Error types for the PostgreSQL storage backend.

use opkatalog_storage::StorageError;
use sqlx::Error as SqlxError;

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Schema initialization error.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new schema error.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => map_sqlx_error(e),
            PostgresError::Schema(e) => StorageError::operation(format!("Schema error: {e}")),
            PostgresError::Config { message } => StorageError::unconfigured(message),
        }
    }
}

/// Maps a sqlx error onto the storage error taxonomy.
///
/// Failures to obtain or keep a connection surface as 503s upstream;
/// everything that happens after a connection was acquired is an operation
/// error (500 with the underlying message).
pub(crate) fn map_sqlx_error(err: SqlxError) -> StorageError {
    match &err {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::Configuration(_) => StorageError::connection(err.to_string()),
        _ => StorageError::operation(err.to_string()),
    }
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgresError::config("DATABASE_URL not configured");
        assert!(err.to_string().contains("Configuration error"));

        let err = PostgresError::schema("create table failed");
        assert!(err.to_string().contains("Schema error"));
    }

    #[test]
    fn test_conversion_to_storage_error() {
        let storage_err: StorageError = PostgresError::config("missing url").into();
        assert!(matches!(storage_err, StorageError::Unconfigured { .. }));

        let storage_err: StorageError = PostgresError::schema("boom").into();
        assert!(matches!(storage_err, StorageError::Operation { .. }));
    }

    #[test]
    fn test_pool_exhaustion_maps_to_connection() {
        let storage_err = map_sqlx_error(SqlxError::PoolTimedOut);
        assert!(matches!(storage_err, StorageError::Connection { .. }));
    }

    #[test]
    fn test_row_error_maps_to_operation() {
        let storage_err = map_sqlx_error(SqlxError::RowNotFound);
        assert!(matches!(storage_err, StorageError::Operation { .. }));
    }
}
