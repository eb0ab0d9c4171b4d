//! Tuple format derived from a key definition.

use std::sync::Arc;

use kmerge_core::KeyDef;

/// A tuple format descriptor: the key definition a merge run compares by,
/// shared (via `Arc`) between the merger and every source cursor it owns.
/// Every [`Tuple`](crate::Tuple) built while a source is attached holds a
/// clone of this same `Arc`, so the format a tuple was constructed through
/// can never be dropped while that tuple is still alive.
///
/// This crate does not validate a tuple's full field layout against a
/// richer schema; only the key parts the comparator actually reads are
/// ever inspected. A fuller schema, if one exists, stays with the host.
#[derive(Debug)]
pub struct TupleFormat {
    key_def: Arc<KeyDef>,
}

impl TupleFormat {
    pub fn new(key_def: Arc<KeyDef>) -> Self {
        TupleFormat { key_def }
    }

    pub fn key_def(&self) -> &KeyDef {
        &self.key_def
    }
}
