//! Core types for the OP-Katalog operations store.
//!
//! This crate defines the surgical operation record in its two shapes: the
//! external JSON representation (camelCase field names, as spoken by the
//! frontend) and the draft shape submitted by clients. The serde attributes
//! on these types *are* the field mapping contract between the API and the
//! snake_case column names in storage.

pub mod record;

pub use record::{DEFAULT_USER_ID, OperationDraft, OperationRecord};
