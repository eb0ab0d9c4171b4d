#![forbid(unsafe_code)]
//! `kmerge`: a k-way streaming merger over ordered sequences of typed
//! binary tuples.
//!
//! This root package is a thin facade over [`kmerge_engine`]: the
//! algorithm lives in `kmerge-engine`, shared key/error/config types in
//! `kmerge-core`. Integration tests and benchmarks live here, against
//! the public API re-exported below.

pub use kmerge_core::{CollationId, FieldType, KeyDef, KeyPart, MergeConfig, MergeError, Result};
pub use kmerge_engine::{Buffer, Merger, SourceInput, Tuple, TupleFormat};
