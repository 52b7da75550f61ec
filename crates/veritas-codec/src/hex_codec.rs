//! Hex text <-> bytes

use crate::error::CodecError;

/// Decode hex text into bytes
///
/// Surrounding whitespace and an optional `0x` / `0X` prefix are ignored.
/// Empty input decodes to an empty byte vector.
///
/// # Errors
///
/// Returns [`CodecError::InvalidEncoding`] if any remaining character is not
/// a hex digit or the digit count is odd.
///
/// # Examples
///
/// ```
/// use veritas_codec::hex_codec;
///
/// assert_eq!(hex_codec::decode("0xDEad").unwrap(), vec![0xde, 0xad]);
/// assert!(hex_codec::decode("abc").is_err());
/// ```
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if let Some((idx, c)) = digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-hex character {:?} at position {}",
            c, idx
        )));
    }
    if digits.len() % 2 != 0 {
        return Err(CodecError::InvalidEncoding(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }

    hex::decode(digits).map_err(|e| CodecError::InvalidEncoding(e.to_string()))
}

/// Encode bytes as lower-case hex without prefix
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Normalize hex text for comparison: trimmed and lower-cased
pub fn normalize(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}
