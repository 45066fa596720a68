pub use hex::FromHexError;

/// Lowercase hex rendering used for datagram diagnostics.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse a hex dump back into bytes, ignoring ASCII whitespace.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, FromHexError> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(digits)
}
