//! The merge driver itself: attaching sources, draining in order, and
//! comparing the current winner against an external key.

use std::sync::Arc;

use kmerge_core::error::{MergeError, Result};
use kmerge_core::{KeyDef, KeyPart, MergeConfig, SourceId};

use crate::comparator::compare;
use crate::format::TupleFormat;
use crate::heap::Heap;
use crate::source::{SourceCursor, SourceInput};
use crate::tuple::Tuple;

/// `less(a, b)` for two cursor-array indices, under the ascending order
/// `key_def` defines and with `direction` applied. A cursor with no head
/// always sinks to the bottom of the heap, regardless of direction.
fn less(cursors: &[SourceCursor], key_def: &KeyDef, direction: i8, a: usize, b: usize) -> bool {
    match (cursors[a].head(), cursors[b].head()) {
        (None, None) => false,
        (None, Some(_)) => false,
        (Some(_), None) => true,
        (Some(ta), Some(tb)) => (direction as i32) * compare(ta, tb, key_def) < 0,
    }
}

/// A k-way streaming merger over ordered sequences of tuples.
///
/// Sources are attached with [`Merger::start`]; [`Merger::next`] then
/// drains the current minimum (or maximum, under a descending direction)
/// across all of them, one tuple at a time, in a single pass with no
/// buffering of future records. Dropping a `Merger` releases its heap,
/// its cursors, and any head tuple it still holds — there is no separate
/// explicit teardown step beyond [`Merger::destroy`], which exists only
/// to give that moment a name.
pub struct Merger<'a> {
    key_def: Arc<KeyDef>,
    format: Arc<TupleFormat>,
    direction: i8,
    cursors: Vec<SourceCursor<'a>>,
    heap: Heap,
    config: MergeConfig,
}

impl<'a> Merger<'a> {
    /// Build a merger for the given key parts, using default tunables.
    pub fn new(parts: Vec<KeyPart>) -> Result<Merger<'a>> {
        Self::with_config(parts, MergeConfig::default())
    }

    pub fn with_config(parts: Vec<KeyPart>, config: MergeConfig) -> Result<Merger<'a>> {
        let key_def = Arc::new(KeyDef::new(parts)?);
        let format = Arc::new(TupleFormat::new(Arc::clone(&key_def)));
        Ok(Merger {
            key_def,
            format,
            direction: 1,
            cursors: Vec::new(),
            heap: Heap::new(),
            config,
        })
    }

    pub fn key_def(&self) -> &KeyDef {
        &self.key_def
    }

    pub fn format(&self) -> &TupleFormat {
        &self.format
    }

    /// Whether a run is in progress: at least one attached source still
    /// has a head tuple.
    pub fn is_draining(&self) -> bool {
        !self.heap.is_empty()
    }

    /// Attach every source in `sources` and fetch each one's first
    /// record. `direction >= 0` merges ascending, negative descending.
    ///
    /// A second `start` call discards whatever the merger was doing
    /// before: restarting is always safe. Any error — a malformed
    /// buffer header, a producer fault on the first fetch, or an
    /// allocation failure — leaves the merger back in its empty state,
    /// with every tuple reference acquired so far released.
    pub fn start(&mut self, sources: Vec<SourceInput<'a>>, direction: i32) -> Result<()> {
        self.direction = if direction >= 0 { 1 } else { -1 };
        self.cursors.clear();
        self.heap.clear();

        let source_capacity = self.config.initial_source_capacity.max(sources.len());
        self.cursors
            .try_reserve(source_capacity)
            .map_err(|_| MergeError::out_of_memory("source cursor array", source_capacity))?;
        let heap_capacity = self.config.initial_heap_capacity.max(sources.len());
        self.heap.reserve(heap_capacity)?;

        for source in sources {
            if let SourceInput::Buffer(ref buf) = source {
                if buf.is_empty() {
                    continue;
                }
            }
            let mut cursor = match SourceCursor::new(source, Arc::clone(&self.format)) {
                Ok(c) => c,
                Err(e) => {
                    self.cursors.clear();
                    self.heap.clear();
                    return Err(e);
                }
            };
            if let Err(e) = cursor.fetch() {
                self.cursors.clear();
                self.heap.clear();
                return Err(e);
            }
            self.cursors.push(cursor);
            let idx = self.cursors.len() - 1;
            if self.cursors[idx].head().is_some() {
                if let Err(e) = self.heap_insert(idx) {
                    self.cursors.clear();
                    self.heap.clear();
                    return Err(e);
                }
            }
            tracing::trace!(source_id = %SourceId::new(idx as u32), "merger: source attached");
        }
        Ok(())
    }

    /// Emit the current winner and fetch its source's next record.
    /// Returns `Ok(None)` once every source is drained.
    ///
    /// On a producer fault during the follow-up fetch, the failing
    /// source is dropped from the heap so the merger stays safe to keep
    /// draining (or to destroy); the error is still returned, since the
    /// caller lost a record it can no longer get back.
    pub fn next(&mut self) -> Result<Option<Tuple>> {
        let top_idx = match self.heap.top() {
            Some(i) => i,
            None => return Ok(None),
        };
        let emitted = self.cursors[top_idx]
            .take_head()
            .expect("heap top cursor must hold a head tuple");
        tracing::trace!(source_id = %SourceId::new(top_idx as u32), "merger: emit");

        if let Err(e) = self.cursors[top_idx].fetch() {
            self.heap_delete(top_idx);
            return Err(e);
        }

        if self.cursors[top_idx].head().is_some() {
            tracing::trace!(source_id = %SourceId::new(top_idx as u32), "merger: update");
            self.heap_update(top_idx);
        } else {
            tracing::trace!(source_id = %SourceId::new(top_idx as u32), "merger: delete");
            self.heap_delete(top_idx);
        }
        Ok(Some(emitted))
    }

    /// Compare the current winner against an externally supplied,
    /// self-delimiting key, without consuming it. Returns `None` once
    /// every source is drained.
    pub fn cmp(&self, key_bytes: &[u8]) -> Result<Option<i32>> {
        let top_idx = match self.heap.top() {
            Some(i) => i,
            None => return Ok(None),
        };
        let head = self.cursors[top_idx]
            .head()
            .expect("heap top cursor must hold a head tuple");
        let mut cursor = std::io::Cursor::new(key_bytes);
        let value = rmpv::decode::read_value(&mut cursor)
            .map_err(|e| MergeError::invalid_source(format!("cmp: malformed key bytes: {e}")))?;
        let key_tuple = Tuple::from_value(value, Arc::clone(&self.format))?;
        Ok(Some(
            self.direction as i32 * compare(head, &key_tuple, &self.key_def),
        ))
    }

    /// Release the heap, every cursor, and any head tuple still held. In
    /// Rust this is exactly what dropping the value does; the method
    /// exists so the operation has an explicit name to call out.
    pub fn destroy(self) {}

    fn heap_insert(&mut self, idx: usize) -> Result<()> {
        let Merger {
            ref mut heap,
            ref cursors,
            ref key_def,
            direction,
            ..
        } = *self;
        heap.insert(idx, |a, b| less(cursors, key_def, direction, a, b))
    }

    fn heap_delete(&mut self, idx: usize) {
        let Merger {
            ref mut heap,
            ref cursors,
            ref key_def,
            direction,
            ..
        } = *self;
        heap.delete(idx, |a, b| less(cursors, key_def, direction, a, b));
    }

    fn heap_update(&mut self, idx: usize) {
        let Merger {
            ref mut heap,
            ref cursors,
            ref key_def,
            direction,
            ..
        } = *self;
        heap.update(idx, |a, b| less(cursors, key_def, direction, a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Buffer;
    use kmerge_core::FieldType;
    use rmpv::Value;

    fn encode_records(records: &[Vec<Value>]) -> Vec<u8> {
        let mut out = Vec::new();
        rmp::encode::write_map_len(&mut out, 1).unwrap();
        rmp::encode::write_uint(&mut out, 0x30).unwrap();
        rmp::encode::write_array_len(&mut out, records.len() as u32).unwrap();
        for record in records {
            rmpv::encode::write_value(&mut out, &Value::Array(record.clone())).unwrap();
        }
        out
    }

    fn rows(vals: &[i64]) -> Vec<Vec<Value>> {
        vals.iter().map(|v| vec![Value::from(*v)]).collect()
    }

    #[test]
    fn merges_two_ascending_buffers() {
        let a_bytes = encode_records(&rows(&[1, 3, 5]));
        let b_bytes = encode_records(&rows(&[2, 4, 6]));
        let buf_a = Buffer::new(&a_bytes);
        let buf_b = Buffer::new(&b_bytes);

        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        merger
            .start(
                vec![SourceInput::Buffer(buf_a), SourceInput::Buffer(buf_b)],
                1,
            )
            .unwrap();

        let mut out = Vec::new();
        while let Some(t) = merger.next().unwrap() {
            out.push(t.field(0).unwrap().as_i64().unwrap());
        }
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn descending_direction_reverses_output() {
        let a_bytes = encode_records(&rows(&[5, 3, 1]));
        let b_bytes = encode_records(&rows(&[6, 4, 2]));
        let buf_a = Buffer::new(&a_bytes);
        let buf_b = Buffer::new(&b_bytes);

        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        merger
            .start(
                vec![SourceInput::Buffer(buf_a), SourceInput::Buffer(buf_b)],
                -1,
            )
            .unwrap();

        let mut out = Vec::new();
        while let Some(t) = merger.next().unwrap() {
            out.push(t.field(0).unwrap().as_i64().unwrap());
        }
        assert_eq!(out, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn empty_buffer_source_is_skipped() {
        let a_bytes: Vec<u8> = Vec::new();
        let b_bytes = encode_records(&rows(&[1, 2]));
        let buf_a = Buffer::new(&a_bytes);
        let buf_b = Buffer::new(&b_bytes);

        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        merger
            .start(
                vec![SourceInput::Buffer(buf_a), SourceInput::Buffer(buf_b)],
                1,
            )
            .unwrap();

        let mut out = Vec::new();
        while let Some(t) = merger.next().unwrap() {
            out.push(t.field(0).unwrap().as_i64().unwrap());
        }
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn function_source_returning_non_tuple_is_a_fault() {
        let mut calls = 0;
        let producer = Box::new(move || -> Result<Option<Value>> {
            calls += 1;
            if calls == 1 {
                Ok(Some(Value::from(7)))
            } else {
                Ok(None)
            }
        });

        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        let err = merger
            .start(vec![SourceInput::Function(producer)], 1)
            .unwrap_err();
        assert!(matches!(err, MergeError::InvalidSource(_)));
        assert!(!merger.is_draining());
    }

    #[test]
    fn cmp_reflects_direction() {
        let a_bytes = encode_records(&rows(&[5]));
        let buf_a = Buffer::new(&a_bytes);
        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        merger
            .start(vec![SourceInput::Buffer(buf_a)], -1)
            .unwrap();

        let mut key_bytes = Vec::new();
        rmpv::encode::write_value(&mut key_bytes, &Value::Array(vec![Value::from(3)])).unwrap();
        // ascending 5 vs 3 is positive; direction -1 flips the sign.
        assert_eq!(merger.cmp(&key_bytes).unwrap(), Some(-1));
    }

    #[test]
    fn restart_discards_previous_run() {
        let a_bytes = encode_records(&rows(&[1, 2]));
        let buf_a = Buffer::new(&a_bytes);
        let mut merger = Merger::new(vec![KeyPart::new(0, FieldType::Integer)]).unwrap();
        merger
            .start(vec![SourceInput::Buffer(buf_a)], 1)
            .unwrap();
        merger.next().unwrap();

        let b_bytes = encode_records(&rows(&[9]));
        let buf_b = Buffer::new(&b_bytes);
        merger
            .start(vec![SourceInput::Buffer(buf_b)], 1)
            .unwrap();
        let first = merger.next().unwrap().unwrap();
        assert_eq!(first.field(0).unwrap().as_i64().unwrap(), 9);
        assert_eq!(merger.next().unwrap(), None);
    }
}
