//! Storage abstraction layer for the OP-Katalog server.
//!
//! Defines the [`OperationStorage`] trait that all storage backends
//! implement, and the [`StorageError`] taxonomy shared across backends.
//! The HTTP layer only ever talks to a `dyn OperationStorage`, so a
//! substitute backend (see `opkatalog-db-memory`) can stand in for
//! PostgreSQL in tests.

pub mod error;
pub mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::OperationStorage;

/// Type alias for a shareable storage instance.
pub type DynOperationStorage = std::sync::Arc<dyn OperationStorage>;
