use super::error::DecodeError;
use super::layout;

pub struct WireReader<'a> {
    payload: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    /// Number of character slots carried by the payload, counting a trailing
    /// partial group only when it reaches the character offset.
    pub fn char_count(&self) -> usize {
        self.char_bytes().count()
    }

    pub fn char_bytes(&self) -> impl Iterator<Item = u8> + 'a {
        self.payload
            .iter()
            .skip(layout::CHAR_OFFSET)
            .step_by(layout::CHAR_STRIDE)
            .copied()
    }

    pub fn read_ascii(&self) -> Result<String, DecodeError> {
        let mut text = String::with_capacity(self.char_count());
        for (index, byte) in self.char_bytes().enumerate() {
            if !byte.is_ascii() {
                return Err(DecodeError::NonAscii { index, byte });
            }
            text.push(char::from(byte));
        }
        Ok(text)
    }
}
