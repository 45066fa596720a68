use thiserror::Error;

use super::layout;

/// Errors returned when recovering text from a byte-expanded datagram.
///
/// # Examples
/// ```
/// use icast_core::DecodeError;
///
/// let err = DecodeError::NonAscii { index: 2, byte: 0xc3 };
/// assert!(err.to_string().contains("non-ASCII byte 0xc3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("non-ASCII byte 0x{byte:02x} at character {index}")]
    NonAscii { index: usize, byte: u8 },
}

/// A decoded message carried fewer positional fields than the protocol needs.
///
/// # Examples
/// ```
/// use icast_core::ArityError;
///
/// let err = ArityError { needed: 13, actual: 4 };
/// assert_eq!(err.to_string(), "too few fields: need 13, got 4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("too few fields: need {needed}, got {actual}")]
pub struct ArityError {
    pub needed: usize,
    pub actual: usize,
}

impl ArityError {
    pub(crate) fn new(actual: usize) -> Self {
        Self {
            needed: layout::MIN_FIELDS,
            actual,
        }
    }
}

/// Errors returned when expanding text into the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("cannot encode non-ASCII character {ch:?} at position {index}")]
    NonAscii { index: usize, ch: char },
}
