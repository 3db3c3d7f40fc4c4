//! PostgreSQL storage backend for the OP-Katalog server.
//!
//! Persists operation records in a single `op_katalog_operations` table,
//! keyed by a server-assigned serial id and partitioned by `user_id`. The
//! array-valued fields are stored as JSONB columns. The schema is created
//! on demand (`CREATE TABLE IF NOT EXISTS`); there is no migration
//! machinery beyond that.

pub mod config;
pub mod error;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod store;

pub use config::PostgresConfig;
pub use error::PostgresError;
pub use store::PostgresOperationStore;
