//! The tuple handle itself.

use std::sync::Arc;

use kmerge_core::error::{MergeError, Result};

use crate::format::TupleFormat;

/// An opaque, immutable, reference-counted binary record.
///
/// Concretely this wraps a decoded MessagePack array, one element per
/// field, addressed by zero-based field index. Cloning a `Tuple` is a
/// refcount bump (`Arc::clone`), never a deep copy; this is what makes
/// "one reference per live head, transferred on emit" a structural
/// property instead of a bookkeeping one.
///
/// Every tuple also carries the [`TupleFormat`] it was constructed
/// through, the same way `box_tuple_new(format, ...)` ties a tuple to its
/// format in the grounding source: holding that `Arc` is what keeps the
/// format alive for as long as any tuple built from it survives.
#[derive(Debug, Clone)]
pub struct Tuple(Arc<TupleInner>);

#[derive(Debug)]
struct TupleInner {
    fields: Vec<rmpv::Value>,
    format: Arc<TupleFormat>,
}

impl Tuple {
    /// Build a tuple from a decoded MessagePack value, which must be an
    /// array, under the given format. Any other shape is `InvalidSource`:
    /// a return value that is present but not a tuple is a fatal error.
    pub(crate) fn from_value(value: rmpv::Value, format: Arc<TupleFormat>) -> Result<Tuple> {
        match value {
            rmpv::Value::Array(fields) => Ok(Tuple(Arc::new(TupleInner { fields, format }))),
            other => Err(MergeError::invalid_source(format!(
                "expected a tuple (array), got {other}"
            ))),
        }
    }

    /// Build a tuple directly from already-decoded fields under the given
    /// format. Exposed for callers constructing function-source output or
    /// test fixtures without round-tripping through the wire encoding.
    pub fn from_fields(fields: Vec<rmpv::Value>, format: Arc<TupleFormat>) -> Tuple {
        Tuple(Arc::new(TupleInner { fields, format }))
    }

    /// The value at `index`, or `None` if the tuple is too short to carry
    /// that field.
    pub fn field(&self, index: u32) -> Option<&rmpv::Value> {
        self.0.fields.get(index as usize)
    }

    pub fn arity(&self) -> usize {
        self.0.fields.len()
    }

    /// The format this tuple was constructed through.
    pub fn format(&self) -> &TupleFormat {
        &self.0.format
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.fields == other.0.fields
    }
}
