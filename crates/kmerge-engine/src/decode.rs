//! MessagePack decoding: the `{[DATA] = [...]}` buffer header and
//! individual self-delimiting tuple records.

use std::io::Cursor;
use std::sync::Arc;

use kmerge_core::error::{MergeError, Result};

use crate::format::TupleFormat;
use crate::source::Buffer;
use crate::tuple::Tuple;

/// IPROTO_DATA, the single map key a buffer source's header wraps its
/// tuple array under.
const DATA_KEY: u64 = 0x30;

/// Skip the one-entry `{DATA: [...]}` header wrapping a buffer source's
/// records, advancing `buf` past it.
///
/// The declared array length is read, to confirm the value really is an
/// array, then discarded: it is never checked against how many records
/// actually follow.
pub(crate) fn decode_header(buf: &mut Buffer<'_>) -> Result<()> {
    let mut cursor = Cursor::new(buf.remaining());
    let map_len = rmp::decode::read_map_len(&mut cursor)
        .map_err(|e| MergeError::invalid_source(format!("expected a map header: {e}")))?;
    if map_len != 1 {
        return Err(MergeError::invalid_source(format!(
            "expected a map of exactly one entry, got {map_len}"
        )));
    }
    let key = rmp::decode::read_int::<u64, _>(&mut cursor)
        .map_err(|e| MergeError::invalid_source(format!("expected an integer map key: {e}")))?;
    if key != DATA_KEY {
        return Err(MergeError::invalid_source(format!(
            "expected map key 0x{DATA_KEY:02x}, got 0x{key:02x}"
        )));
    }
    rmp::decode::read_array_len(&mut cursor)
        .map_err(|e| MergeError::invalid_source(format!("expected an array value: {e}")))?;
    let consumed = cursor.position() as usize;
    buf.advance(consumed);
    Ok(())
}

/// Read one tuple from `buf`, advancing it past exactly the bytes that
/// tuple occupies, and construct it under `format`. Any well-formed
/// MessagePack array decodes; anything else is `InvalidSource`.
pub(crate) fn decode_one(buf: &mut Buffer<'_>, format: Arc<TupleFormat>) -> Result<Tuple> {
    let mut cursor = Cursor::new(buf.remaining());
    let value = rmpv::decode::read_value(&mut cursor)
        .map_err(|e| MergeError::invalid_source(format!("malformed record: {e}")))?;
    let consumed = cursor.position() as usize;
    buf.advance(consumed);
    Tuple::from_value(value, format)
}
