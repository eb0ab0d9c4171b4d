#![forbid(unsafe_code)]
//! The k-way streaming merger: tuple decoding, source cursors, the
//! comparator, the binary min-heap, and the merge driver itself.
//!
//! Shared key/error/config types live one crate down, in `kmerge-core`.

mod comparator;
mod decode;
mod format;
mod heap;
mod merger;
mod source;
mod tuple;

pub use format::TupleFormat;
pub use merger::Merger;
pub use source::{Buffer, SourceInput};
pub use tuple::Tuple;

pub use kmerge_core::{CollationId, FieldType, KeyDef, KeyPart, MergeConfig, MergeError, Result};
