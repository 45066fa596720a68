use super::error::EncodeError;
use super::layout;

/// Expand `message` into the 4-bytes-per-character wire form.
///
/// Padding bytes are zero; only ASCII text can be represented.
pub fn encode_message(message: &str) -> Result<Vec<u8>, EncodeError> {
    let mut payload = Vec::with_capacity(message.len() * layout::CHAR_STRIDE);
    for (index, ch) in message.chars().enumerate() {
        if !ch.is_ascii() {
            return Err(EncodeError::NonAscii { index, ch });
        }
        let mut group = [0u8; layout::CHAR_STRIDE];
        group[layout::CHAR_OFFSET] = ch as u8;
        payload.extend_from_slice(&group);
    }
    Ok(payload)
}
