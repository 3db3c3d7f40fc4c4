//! In-memory storage backend for the OP-Katalog server.
//!
//! Implements the `OperationStorage` trait from `opkatalog-storage` on a
//! plain vector behind a mutex. Used as the substitute store in server
//! tests and for running the API without a database. Ordering and
//! partitioning semantics match the PostgreSQL backend, including the
//! null-date sort position (nulls first under descending order, as
//! PostgreSQL sorts them natively).

pub mod storage;

pub use storage::InMemoryOperationStore;

// Re-export the storage trait for convenience.
pub use opkatalog_storage::{DynOperationStorage, OperationStorage, StorageError};

/// Creates a new shareable in-memory storage instance.
#[must_use]
pub fn create_storage() -> DynOperationStorage {
    std::sync::Arc::new(InMemoryOperationStore::new())
}
