//! The closed enumeration of field types a key part may name, plus the
//! (currently unresolved) collation identifier that can tag a key part.

use serde::{Deserialize, Serialize};

/// A field type drawn from the closed enumeration a key part may declare.
///
/// `Any` opts a key part out of type checking: the comparator still orders
/// by the value's own natural type order, but construction does not reject
/// fields of other declared types at that position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Unsigned,
    Double,
    String,
    Boolean,
    Binary,
    Array,
    Map,
    Nil,
    Any,
}

impl FieldType {
    /// Parse a field type from its lower-case name, as it would arrive from
    /// a host binding. Unknown names are the caller's problem:
    /// [`KeyPart::from_name`](crate::key::KeyPart::from_name) turns a
    /// `None` here into `MergeError::InvalidKeyPart`.
    pub fn by_name(name: &str) -> Option<FieldType> {
        Some(match name {
            "integer" | "int" => FieldType::Integer,
            "unsigned" | "uint" => FieldType::Unsigned,
            "double" | "number" => FieldType::Double,
            "string" | "str" => FieldType::String,
            "boolean" | "bool" => FieldType::Boolean,
            "binary" | "bin" => FieldType::Binary,
            "array" => FieldType::Array,
            "map" => FieldType::Map,
            "nil" => FieldType::Nil,
            "any" | "*" => FieldType::Any,
            _ => return None,
        })
    }
}

/// An opaque collation identifier. No collation table ships with this
/// crate; the identifier is carried through construction and comparison
/// but never changes the comparator's natural per-type order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationId(pub String);

impl CollationId {
    pub fn named(name: impl Into<String>) -> Self {
        CollationId(name.into())
    }
}
