//! Escaped blob literals
//!
//! Tool output prints argument bytes as a quoted literal in which printable
//! ASCII appears as itself and every other byte as `\` followed by exactly
//! two hex digits, e.g. `opt blob "DIDL\01\6d\7b"`. Other escape forms
//! such as `\xNN` or `\n` are rejected: the marker must be followed
//! directly by two hex digits.

use crate::error::CodecError;
use regex::Regex;
use std::sync::LazyLock;

const ESCAPE_MARKER: char = '\\';

static BLOB_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\bopt\s+)?\bblob\s*"((?:[^"\\]|\\.)*)""#).expect("valid blob literal regex")
});

/// Decode an escaped blob payload into bytes
///
/// # Errors
///
/// Returns [`CodecError::MalformedBlob`] if an escape marker is followed by
/// fewer than two characters or by a non-hex character.
///
/// # Examples
///
/// ```
/// use veritas_codec::blob;
///
/// assert_eq!(blob::parse(r"DIDL\00\01").unwrap(), b"DIDL\x00\x01".to_vec());
/// assert!(blob::parse(r"\4").is_err());
/// ```
pub fn parse(payload: &str) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(payload.len());
    let mut chars = payload.chars().enumerate();

    while let Some((offset, c)) = chars.next() {
        if c != ESCAPE_MARKER {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let mut byte = 0u8;
        for _ in 0..2 {
            let (_, digit) = chars.next().ok_or_else(|| CodecError::MalformedBlob {
                offset,
                reason: "escape needs two hex digits".to_string(),
            })?;
            let nibble = digit.to_digit(16).ok_or_else(|| CodecError::MalformedBlob {
                offset,
                reason: format!("non-hex character {:?} in escape", digit),
            })?;
            byte = (byte << 4) | nibble as u8;
        }
        out.push(byte);
    }

    Ok(out)
}

/// Render bytes as an escaped blob payload
///
/// Printable ASCII other than `\` and `"` is written as-is; every other byte
/// becomes a lower-case `\NN` escape. `parse(&escape(b))` returns `b`.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        if (0x20..=0x7e).contains(&b) && b != b'\\' && b != b'"' {
            out.push(b as char);
        } else {
            out.push(ESCAPE_MARKER);
            out.push_str(&format!("{:02x}", b));
        }
    }
    out
}

/// Locate the quoted payload of the first `opt blob "..."` literal in `text`
///
/// A bare `blob "..."` literal is also accepted. Escaped quotes inside the
/// payload do not terminate it.
///
/// # Errors
///
/// Returns [`CodecError::MalformedBlob`] if no blob literal is present.
pub fn extract_blob_payload(text: &str) -> Result<&str, CodecError> {
    BLOB_LITERAL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| CodecError::MalformedBlob {
            offset: 0,
            reason: "no `opt blob \"...\"` literal found".to_string(),
        })
}

/// Pick the blob payload out of captured tool output
///
/// A quoted blob literal is preferred. Failing that, the whole text is taken
/// as a bare payload, minus a trailing line ending, but only if it looks like
/// one: it holds at least one escape and no quote or control characters,
/// which escaping never leaves unescaped.
///
/// # Errors
///
/// Returns [`CodecError::MalformedBlob`] if neither form is present.
///
/// # Examples
///
/// ```
/// use veritas_codec::blob;
///
/// assert_eq!(blob::payload_from_tool_output("(blob \"\\00\")").unwrap(), r"\00");
/// assert_eq!(blob::payload_from_tool_output("DIDL\\00\n").unwrap(), r"DIDL\00");
/// assert!(blob::payload_from_tool_output("(null)").is_err());
/// ```
pub fn payload_from_tool_output(text: &str) -> Result<&str, CodecError> {
    if let Ok(payload) = extract_blob_payload(text) {
        return Ok(payload);
    }

    let bare = text.trim_end_matches(['\r', '\n']);
    let looks_escaped = bare.contains(ESCAPE_MARKER)
        && !bare.contains('"')
        && !bare.chars().any(char::is_control);
    if looks_escaped {
        Ok(bare)
    } else {
        Err(CodecError::MalformedBlob {
            offset: 0,
            reason: "no blob literal or bare escaped payload found".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_payload() {
        let bytes = parse(r"DIDL\01\6d\7b\00").unwrap();
        assert_eq!(bytes, vec![b'D', b'I', b'D', b'L', 0x01, 0x6d, 0x7b, 0x00]);
    }

    #[test]
    fn test_parse_uppercase_escape() {
        assert_eq!(parse(r"\FF\aB").unwrap(), vec![0xff, 0xab]);
    }

    #[test]
    fn test_parse_non_ascii_literal_is_utf8() {
        assert_eq!(parse("é").unwrap(), "é".as_bytes().to_vec());
    }

    #[test]
    fn test_parse_truncated_escape() {
        let err = parse(r"ab\4").unwrap_err();
        assert!(matches!(err, CodecError::MalformedBlob { offset: 2, .. }));
        assert!(parse(r"\").is_err());
    }

    #[test]
    fn test_parse_non_hex_escape() {
        // `\x41` is not an escape form; `x` fails as a hex digit.
        assert!(matches!(parse(r"\x41"), Err(CodecError::MalformedBlob { .. })));
        assert!(matches!(parse(r#"\""#), Err(CodecError::MalformedBlob { .. })));
    }

    #[test]
    fn test_escape_reserved_bytes() {
        assert_eq!(escape(b"a\\\"\n"), r#"a\5c\22\0a"#);
    }

    #[test]
    fn test_extract_opt_blob() {
        let output = "(\n  opt blob \"DIDL\\00\\01\\71\",\n)\n";
        assert_eq!(extract_blob_payload(output).unwrap(), r"DIDL\00\01\71");
    }

    #[test]
    fn test_extract_keeps_escaped_quote() {
        let output = r#"(opt blob "a\"b")"#;
        assert_eq!(extract_blob_payload(output).unwrap(), r#"a\"b"#);
    }

    #[test]
    fn test_extract_bare_blob() {
        assert_eq!(extract_blob_payload(r#"blob "\00""#).unwrap(), r"\00");
    }

    #[test]
    fn test_extract_missing_literal() {
        assert!(extract_blob_payload("(null)").is_err());
    }

    #[test]
    fn test_tool_output_prefers_literal() {
        let output = "(opt blob \"DIDL\\00\")\n";
        assert_eq!(payload_from_tool_output(output).unwrap(), r"DIDL\00");
    }

    #[test]
    fn test_tool_output_bare_payload() {
        assert_eq!(payload_from_tool_output("DIDL\\00\\00\r\n").unwrap(), r"DIDL\00\00");
        // Leading spaces are payload bytes, not padding.
        let payload = payload_from_tool_output(r" a\00").unwrap();
        assert_eq!(parse(payload).unwrap(), b" a\x00".to_vec());
    }

    #[test]
    fn test_tool_output_without_payload() {
        for output in ["(null)", "", "\n", "Error: canister not found", "DIDL", "line\\00\nmore"] {
            assert!(
                matches!(payload_from_tool_output(output), Err(CodecError::MalformedBlob { .. })),
                "accepted {output:?}"
            );
        }
    }
}
