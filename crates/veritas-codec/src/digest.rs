//! SHA-256 digests and digest comparison

use crate::hex_codec;
use sha2::{Digest, Sha256};

/// Digest of the zero-length input
///
/// This is what an empty argument list hashes to. It is a test anchor only;
/// callers reach it by hashing an empty slice, never by short-circuiting.
pub const EMPTY_INPUT_DIGEST: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Compute the SHA-256 digest of exactly `bytes`, as lower-case hex
///
/// The caller decides what "the bytes" are (UTF-8 text, decoded hex, file
/// content); no encoding is guessed here.
///
/// # Examples
///
/// ```
/// use veritas_codec::digest;
///
/// assert_eq!(
///     digest::digest(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_codec::encode(&hasher.finalize())
}

/// Compare a computed digest against an expected one
///
/// Returns `false` if either side is absent or blank; otherwise compares
/// trimmed, case-insensitive text.
pub fn matches(computed: Option<&str>, expected: Option<&str>) -> bool {
    match (computed, expected) {
        (Some(c), Some(e)) => {
            let c = hex_codec::normalize(c);
            let e = hex_codec::normalize(e);
            !c.is_empty() && !e.is_empty() && c == e
        }
        _ => false,
    }
}
