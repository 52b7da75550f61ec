//! Digest shape checks shared by every evidence entity

/// Length of a SHA-256 digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// Check whether `value` is a full 64-character hex digest
///
/// Surrounding whitespace is ignored; case is not significant.
///
/// # Examples
///
/// ```
/// use veritas_domain::is_digest_hex;
///
/// assert!(is_digest_hex(&"ab".repeat(32)));
/// assert!(!is_digest_hex("abc"));
/// ```
pub fn is_digest_hex(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.len() == DIGEST_HEX_LEN && trimmed.bytes().all(|b| b.is_ascii_hexdigit())
}
