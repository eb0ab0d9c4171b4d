//! Key-based tuple comparison.

use std::cmp::Ordering;

use kmerge_core::KeyDef;
use rmpv::Value;

use crate::tuple::Tuple;

/// Compare `a` and `b` field-by-field over `key_def`'s parts, in order,
/// returning a negative/zero/positive `i32`. A field a tuple doesn't
/// carry sorts as less than any field that is present, and `nil` sorts
/// as less than any non-nil value of the same field.
///
/// Direction is applied by the caller, not here: this function always
/// returns the ascending-order verdict.
pub(crate) fn compare(a: &Tuple, b: &Tuple, key_def: &KeyDef) -> i32 {
    for part in key_def.parts() {
        let ordering = match (a.field(part.field_index), b.field(part.field_index)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare_values(x, y),
        };
        match ordering {
            Ordering::Equal => continue,
            Ordering::Less => return -1,
            Ordering::Greater => return 1,
        }
    }
    0
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ordering::Equal,
        (Value::Nil, _) => Ordering::Less,
        (_, Value::Nil) => Ordering::Greater,
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => compare_integers(x, y),
        (Value::F32(x), Value::F32(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::F64(x), Value::F64(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::F32(x), Value::F64(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::F64(x), Value::F32(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Binary(x), Value::Binary(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                match compare_values(xi, yi) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Map(x), Value::Map(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Values within `i64` range compare exactly; values only representable
/// as `u64` beyond `i64::MAX` fall back to unsigned comparison.
fn compare_integers(a: &rmpv::Integer, b: &rmpv::Integer) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.as_u64().unwrap_or(0).cmp(&b.as_u64().unwrap_or(0)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Nil => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) => 2,
        Value::F32(_) | Value::F64(_) => 3,
        Value::String(_) => 4,
        Value::Binary(_) => 5,
        Value::Array(_) => 6,
        Value::Map(_) => 7,
        Value::Ext(_, _) => 8,
    }
}
