//! HTTP server for the OP-Katalog surgical operation log.
//!
//! Exposes the `/api` endpoints that map one-to-one onto storage
//! operations: health, list, create, update, delete, bulk import, and
//! clear. The storage backend is injected through [`state::AppState`], so
//! tests can run the full HTTP stack against the in-memory backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::{OpkatalogServer, ServerBuilder, build_app};
pub use state::AppState;
