//! Key parts and key definitions.

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};
use crate::field::{CollationId, FieldType};

/// One component of a key definition: which tuple field it names, what type
/// that field is declared to hold, whether `nil` is allowed there, and an
/// optional collation identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPart {
    pub field_index: u32,
    pub field_type: FieldType,
    pub is_nullable: bool,
    pub collation: Option<CollationId>,
}

impl KeyPart {
    pub fn new(field_index: u32, field_type: FieldType) -> Self {
        KeyPart {
            field_index,
            field_type,
            is_nullable: false,
            collation: None,
        }
    }

    /// Build a key part from a field type named the way a host binding
    /// would spell it (see [`FieldType::by_name`]). An unrecognized name
    /// is caller-visible and aborts construction with `InvalidKeyPart`.
    pub fn from_name(field_index: u32, type_name: &str) -> Result<Self> {
        let field_type = FieldType::by_name(type_name).ok_or_else(|| {
            MergeError::InvalidKeyPart(format!("unknown field type: {type_name}"))
        })?;
        Ok(KeyPart::new(field_index, field_type))
    }

    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn with_collation(mut self, collation: CollationId) -> Self {
        self.collation = Some(collation);
        self
    }
}

/// An ordered, non-empty sequence of key parts. Two tuples are "equal under
/// the definition" when every part compares equal in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    parts: Vec<KeyPart>,
}

impl KeyDef {
    /// Build a key definition from key-part descriptors.
    ///
    /// Errors with `InvalidKeyPart` if `parts` is empty; field indices are
    /// not range-checked here (the tuple format they describe may vary per
    /// source and is only known when an actual tuple is decoded).
    pub fn new(parts: Vec<KeyPart>) -> Result<KeyDef> {
        if parts.is_empty() {
            return Err(MergeError::InvalidKeyPart(
                "key definition must have at least one part".into(),
            ));
        }
        Ok(KeyDef { parts })
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// The highest field index any part references; used to size a
    /// decoded tuple's field-presence check.
    pub fn max_field_index(&self) -> u32 {
        self.parts
            .iter()
            .map(|p| p.field_index)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_known_type() {
        let part = KeyPart::from_name(0, "integer").unwrap();
        assert_eq!(part.field_type, FieldType::Integer);
    }

    #[test]
    fn from_name_rejects_unknown_type() {
        let err = KeyPart::from_name(0, "nonsense").unwrap_err();
        assert!(matches!(err, MergeError::InvalidKeyPart(_)));
    }

    #[test]
    fn new_rejects_empty_key_def() {
        let err = KeyDef::new(vec![]).unwrap_err();
        assert!(matches!(err, MergeError::InvalidKeyPart(_)));
    }
}
