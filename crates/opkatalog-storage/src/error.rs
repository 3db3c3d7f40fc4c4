//! Storage error types shared by all backends.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage backend has not been configured (no connection string).
    #[error("Database not available: {message}")]
    Unconfigured {
        /// Description of the missing configuration.
        message: String,
    },

    /// The storage backend could not be reached.
    #[error("Database connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The request was rejected before touching the store.
    #[error("{message}")]
    Validation {
        /// Description of why the input was rejected.
        message: String,
    },

    /// A statement failed after a connection was obtained.
    #[error("{message}")]
    Operation {
        /// The underlying database error message.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `Unconfigured` error.
    #[must_use]
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self::Unconfigured {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `Operation` error.
    #[must_use]
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }

    /// Returns `true` if the store is unreachable or unconfigured.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unconfigured { .. } | Self::Connection { .. })
    }

    /// Returns the error category for logging and monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unconfigured { .. } => ErrorCategory::Configuration,
            Self::Connection { .. } => ErrorCategory::Infrastructure,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Operation { .. } => ErrorCategory::Operation,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or invalid configuration.
    Configuration,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Input validation error.
    Validation,
    /// Statement execution error.
    Operation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Validation => write!(f, "validation"),
            Self::Operation => write!(f, "operation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::unconfigured("DATABASE_URL not configured");
        assert_eq!(
            err.to_string(),
            "Database not available: DATABASE_URL not configured"
        );

        let err = StorageError::validation("No operations provided");
        assert_eq!(err.to_string(), "No operations provided");

        let err = StorageError::operation("duplicate key value");
        assert_eq!(err.to_string(), "duplicate key value");
    }

    #[test]
    fn test_error_predicates() {
        assert!(StorageError::unconfigured("x").is_unavailable());
        assert!(StorageError::connection("x").is_unavailable());
        assert!(!StorageError::validation("x").is_unavailable());
        assert!(!StorageError::operation("x").is_unavailable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::unconfigured("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            StorageError::connection("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            StorageError::validation("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::operation("x").category(),
            ErrorCategory::Operation
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
    }
}
