use super::error::{ArityError, DecodeError};
use super::layout;
use super::reader::WireReader;

/// Positional fields of one decoded message.
///
/// Only obtainable through [`parse_fields`], so every value holds at least
/// `MIN_FIELDS` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList<'a> {
    fields: Vec<&'a str>,
}

impl<'a> FieldList<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at a position below `MIN_FIELDS`.
    pub fn field(&self, index: usize) -> &'a str {
        debug_assert!(index < layout::MIN_FIELDS);
        self.fields[index]
    }

    /// Any field, including the reserved positions past the consumed range.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.fields
    }
}

/// Recover the ASCII message carried by a byte-expanded datagram.
pub fn decode_message(raw: &[u8]) -> Result<String, DecodeError> {
    WireReader::new(raw).read_ascii()
}

/// Split a decoded message on `;` and enforce the minimum arity.
pub fn parse_fields(message: &str) -> Result<FieldList<'_>, ArityError> {
    let fields: Vec<&str> = message.split(layout::FIELD_DELIMITER).collect();
    if fields.len() < layout::MIN_FIELDS {
        return Err(ArityError::new(fields.len()));
    }
    Ok(FieldList { fields })
}
