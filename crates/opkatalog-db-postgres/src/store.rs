//! PostgreSQL implementation of the `OperationStorage` trait.

use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use opkatalog_core::{OperationDraft, OperationRecord};
use opkatalog_storage::{OperationStorage, StorageError};

use crate::config::PostgresConfig;
use crate::pool;
use crate::queries;
use crate::schema;

/// PostgreSQL storage backend for operation records.
///
/// Owns the connection pool and a last-known-connectivity-error slot used
/// only for health diagnostics. Construction is cheap and never touches the
/// network; connections are established on first use.
#[derive(Debug)]
pub struct PostgresOperationStore {
    pool: PgPool,
    last_error: RwLock<Option<String>>,
}

impl PostgresOperationStore {
    /// Creates a new store with a lazily connecting pool.
    ///
    /// # Errors
    ///
    /// Returns an error only when the connection URL cannot be parsed;
    /// an unreachable database is reported per request, not here.
    pub fn new(config: &PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(config).map_err(StorageError::from)?;
        Ok(Self::from_pool(pool))
    }

    /// Creates a store from an existing connection pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            last_error: RwLock::new(None),
        }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the table and indexes when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or the DDL fails.
    /// Callers treat this as non-fatal at startup.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        schema::init_schema(&self.pool)
            .await
            .map_err(StorageError::from)?;
        info!("Operations schema ready");
        Ok(())
    }

    /// Returns the most recent connectivity error observed by [`ping`],
    /// if any.
    ///
    /// [`ping`]: OperationStorage::ping
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().ok().and_then(|guard| guard.clone())
    }

    fn record_probe(&self, outcome: &Result<(), StorageError>) {
        if let Ok(mut guard) = self.last_error.write() {
            *guard = outcome.as_ref().err().map(ToString::to_string);
        }
    }
}

#[async_trait]
impl OperationStorage for PostgresOperationStore {
    async fn ping(&self) -> Result<(), StorageError> {
        let outcome = queries::ping(&self.pool).await;
        self.record_probe(&outcome);
        outcome
    }

    async fn list(&self, user_id: &str) -> Result<Vec<OperationRecord>, StorageError> {
        queries::list(&self.pool, user_id).await
    }

    async fn create(&self, user_id: &str, draft: &OperationDraft) -> Result<i32, StorageError> {
        queries::create(&self.pool, user_id, draft).await
    }

    async fn update(
        &self,
        id: i32,
        user_id: &str,
        draft: &OperationDraft,
    ) -> Result<u64, StorageError> {
        queries::update(&self.pool, id, user_id, draft).await
    }

    async fn delete(&self, id: i32, user_id: &str) -> Result<(), StorageError> {
        queries::delete(&self.pool, id, user_id).await
    }

    async fn bulk_import(
        &self,
        user_id: &str,
        drafts: &[OperationDraft],
    ) -> Result<usize, StorageError> {
        if drafts.is_empty() {
            return Err(StorageError::validation("No operations provided"));
        }
        queries::bulk_import(&self.pool, user_id, drafts).await
    }

    async fn clear(&self, user_id: &str) -> Result<u64, StorageError> {
        queries::clear(&self.pool, user_id).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
