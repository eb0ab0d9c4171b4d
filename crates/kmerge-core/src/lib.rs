#![forbid(unsafe_code)]
//! kmerge-core: key definitions, field types, and shared error/config types
//! for the k-way tuple merger (`kmerge-engine`).
//!
//! This crate carries no algorithmic behavior: it is the same "shared types
//! underneath, behavior crates on top" split this codebase uses for its
//! other subsystems.

pub mod config;
pub mod error;
pub mod field;
pub mod id;
pub mod key;

pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use field::{CollationId, FieldType};
pub use id::SourceId;
pub use key::{KeyDef, KeyPart};
