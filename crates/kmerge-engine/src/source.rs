//! Source producers and per-source cursor state.

use std::sync::Arc;

use kmerge_core::error::Result;

use crate::decode::{decode_header, decode_one};
use crate::format::TupleFormat;
use crate::tuple::Tuple;

/// A borrowed byte region carrying the untouched suffix of a buffer
/// source, with a movable read position and a fixed write position.
/// The merger only ever advances the read position; it never takes
/// ownership of, or copies, the underlying bytes.
pub struct Buffer<'a> {
    data: &'a [u8],
    rpos: usize,
}

impl<'a> Buffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Buffer { data, rpos: 0 }
    }

    /// Whether every byte of the region has already been consumed.
    pub fn is_empty(&self) -> bool {
        self.rpos >= self.data.len()
    }

    pub(crate) fn remaining(&self) -> &[u8] {
        &self.data[self.rpos..]
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.rpos += n;
    }
}

/// A producer handle as supplied to `Merger::start`.
///
/// A buffer source is handed in *by value*: `Buffer` is just a borrowed
/// slice plus a read position, so the merger taking ownership of that
/// small handle is what lets it track its own read position without an
/// external `&mut` back into the caller's frame. The bytes themselves
/// stay borrowed (`Buffer`'s lifetime parameter) and are never copied.
pub enum SourceInput<'a> {
    /// Buffers that are already empty are skipped by `start` without ever
    /// being attached.
    Buffer(Buffer<'a>),
    /// A pull-style callable modelling a handle a host registry would
    /// otherwise hold open on the merger's behalf. Returns `Ok(None)` at
    /// end-of-stream, `Ok(Some(value))` for the next record, and `Err`
    /// to surface a producer fault.
    Function(Box<dyn FnMut() -> Result<Option<rmpv::Value>> + 'a>),
}

enum SourceKind<'a> {
    Buffer(Buffer<'a>),
    Function(Box<dyn FnMut() -> Result<Option<rmpv::Value>> + 'a>),
}

/// Per-source state: the producer handle, the format every tuple fetched
/// from it is constructed under, the current head tuple (`None` at
/// end-of-stream), and whether the source has already been drained.
pub(crate) struct SourceCursor<'a> {
    kind: SourceKind<'a>,
    format: Arc<TupleFormat>,
    head: Option<Tuple>,
    drained: bool,
}

impl<'a> SourceCursor<'a> {
    /// Attach a source: for a buffer, this parses and skips its header
    /// immediately, before any record is fetched. Every tuple this cursor
    /// ever produces is built through `format`.
    pub(crate) fn new(input: SourceInput<'a>, format: Arc<TupleFormat>) -> Result<Self> {
        let kind = match input {
            SourceInput::Buffer(mut buf) => {
                decode_header(&mut buf)?;
                SourceKind::Buffer(buf)
            }
            SourceInput::Function(f) => SourceKind::Function(f),
        };
        Ok(SourceCursor {
            kind,
            format,
            head: None,
            drained: false,
        })
    }

    pub(crate) fn head(&self) -> Option<&Tuple> {
        self.head.as_ref()
    }

    /// Transfer ownership of the head tuple to the caller; leaves the
    /// cursor holding no head until the next `fetch`.
    pub(crate) fn take_head(&mut self) -> Option<Tuple> {
        self.head.take()
    }

    /// Pull the next record into `head`. A source that has already
    /// signalled end-of-stream is never polled again.
    pub(crate) fn fetch(&mut self) -> Result<()> {
        if self.drained {
            self.head = None;
            return Ok(());
        }
        let next = match &mut self.kind {
            SourceKind::Buffer(buf) => {
                if buf.is_empty() {
                    None
                } else {
                    Some(decode_one(buf, Arc::clone(&self.format))?)
                }
            }
            SourceKind::Function(producer) => match producer()? {
                None => None,
                Some(value) => Some(Tuple::from_value(value, Arc::clone(&self.format))?),
            },
        };
        if next.is_none() {
            self.drained = true;
        }
        self.head = next;
        Ok(())
    }
}
