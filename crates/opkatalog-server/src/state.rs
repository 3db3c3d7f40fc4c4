//! Shared application state.

use opkatalog_storage::DynOperationStorage;

use crate::error::ApiError;

/// State injected into every handler.
///
/// The storage client is constructed once at startup and shared; there is
/// no other process-wide mutable state. When no connection string was
/// supplied the slot stays empty and the configuration error is kept for
/// the health endpoint.
#[derive(Clone)]
pub struct AppState {
    storage: Option<DynOperationStorage>,
    config_error: Option<String>,
}

impl AppState {
    /// Creates a state backed by the given storage.
    #[must_use]
    pub fn with_storage(storage: DynOperationStorage) -> Self {
        Self {
            storage: Some(storage),
            config_error: None,
        }
    }

    /// Creates a state without storage, remembering why.
    #[must_use]
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            storage: None,
            config_error: Some(reason.into()),
        }
    }

    /// Returns the storage client, or a 503 when none is configured.
    pub fn storage(&self) -> Result<&DynOperationStorage, ApiError> {
        self.storage.as_ref().ok_or_else(|| {
            ApiError::unavailable(format!(
                "Database not available: {}",
                self.config_reason()
            ))
        })
    }

    /// Returns the configuration failure reason, if storage is absent.
    #[must_use]
    pub fn config_error(&self) -> Option<&str> {
        self.config_error.as_deref()
    }

    fn config_reason(&self) -> &str {
        self.config_error
            .as_deref()
            .unwrap_or("storage not configured")
    }
}
