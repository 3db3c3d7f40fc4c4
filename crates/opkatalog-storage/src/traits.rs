//! Storage traits for the operation log abstraction layer.

use async_trait::async_trait;

use opkatalog_core::{OperationDraft, OperationRecord};

use crate::error::StorageError;

/// The storage contract every backend must implement.
///
/// Each method corresponds to exactly one API operation. All operations are
/// scoped to a caller-supplied `user_id` partition key; a backend must never
/// let one partition read or mutate another's rows, even with a correctly
/// guessed record id. Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait OperationStorage: Send + Sync {
    /// Trivial connectivity probe (`SELECT 1` or equivalent).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` when the backend is unreachable.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Returns all records for `user_id`, newest date first, ties broken by
    /// descending id. An empty partition yields an empty vector, not an
    /// error.
    async fn list(&self, user_id: &str) -> Result<Vec<OperationRecord>, StorageError>;

    /// Inserts a single record and returns the server-assigned id.
    ///
    /// The backend assigns `created_at` and `updated_at`. The insert is
    /// atomic: either the full row is persisted or nothing is.
    async fn create(&self, user_id: &str, draft: &OperationDraft) -> Result<i32, StorageError>;

    /// Replaces all non-key fields of the record matching both `id` and
    /// `user_id`, refreshing `updated_at`.
    ///
    /// Returns the number of rows matched. Zero means no record with that
    /// id exists in the caller's partition; callers decide whether that is
    /// worth reporting (the API deliberately does not).
    async fn update(
        &self,
        id: i32,
        user_id: &str,
        draft: &OperationDraft,
    ) -> Result<u64, StorageError>;

    /// Deletes at most one record matching both `id` and `user_id`.
    /// Deleting a nonexistent record is not an error.
    async fn delete(&self, id: i32, user_id: &str) -> Result<(), StorageError>;

    /// Inserts a batch of records, assigning fresh ids and timestamps to
    /// each. All-or-nothing: if any insert fails the whole batch is rolled
    /// back. Returns the number of records imported.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Validation` for an empty batch, before any
    /// store interaction.
    async fn bulk_import(
        &self,
        user_id: &str,
        drafts: &[OperationDraft],
    ) -> Result<usize, StorageError>;

    /// Deletes all records for `user_id` and returns the exact count
    /// removed.
    async fn clear(&self, user_id: &str) -> Result<u64, StorageError>;

    /// Returns the name of the storage backend (for logging).
    fn backend_name(&self) -> &'static str;
}
