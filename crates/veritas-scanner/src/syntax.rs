//! Detection of interface-description (Candid) values in argument text
//!
//! Detection only: encoding such text into bytes is left to external tooling.

use regex::Regex;
use std::sync::LazyLock;

static CANDID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:",
        r"record|variant|opt|vec|principal|service|func|blob|null|reserved",
        r"|text|bool|nat(?:8|16|32|64)?|int(?:8|16|32|64)?|float(?:32|64)",
        r")\b",
    ))
    .expect("valid Candid token regex")
});

/// Check whether `text` looks like a structured interface value
///
/// True when any composite marker (`record`, `variant`), constructor keyword
/// (`opt`, `vec`, `principal`, `service`, `func`) or primitive type name
/// occurs as a whole word. Such text must be encoded before hashing.
///
/// # Examples
///
/// ```
/// use veritas_scanner::detect_structured_syntax;
///
/// assert!(detect_structured_syntax("(record { id = 42 : nat64 })"));
/// assert!(!detect_structured_syntax("plain arguments"));
/// ```
pub fn detect_structured_syntax(text: &str) -> bool {
    CANDID_TOKEN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_values() {
        assert!(detect_structured_syntax("(variant { Upgrade })"));
        assert!(detect_structured_syntax("(opt vec { 1; 2 })"));
        assert!(detect_structured_syntax("(principal \"aaaaa-aa\")"));
    }

    #[test]
    fn test_primitive_type_annotations() {
        assert!(detect_structured_syntax("(42 : nat)"));
        assert!(detect_structured_syntax("(7 : int32)"));
        assert!(detect_structured_syntax("(1.5 : float64)"));
    }

    #[test]
    fn test_word_boundary_required() {
        assert!(!detect_structured_syntax("recorded options vectorized"));
        assert!(!detect_structured_syntax("internal national"));
        assert!(!detect_structured_syntax("4449444c0000"));
    }

    #[test]
    fn test_empty_text() {
        assert!(!detect_structured_syntax(""));
    }
}
