//! Argument evidence - one attempt at verifying proposal call arguments

use crate::digest::is_digest_hex;

/// How the user supplied the argument bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentInputKind {
    /// Plain text, hashed as its UTF-8 bytes
    Text,

    /// Hex text, decoded before hashing
    Hex,

    /// Structured interface text that must be encoded by an external tool first
    CandidNeedsEncoding,

    /// Tool output containing an escaped `opt blob "..."` literal
    DfxBlob,
}

impl ArgumentInputKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentInputKind::Text => "text",
            ArgumentInputKind::Hex => "hex",
            ArgumentInputKind::CandidNeedsEncoding => "candid-needs-encoding",
            ArgumentInputKind::DfxBlob => "dfx-blob",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ArgumentInputKind::Text),
            "hex" => Some(ArgumentInputKind::Hex),
            "candid" | "candid-needs-encoding" => Some(ArgumentInputKind::CandidNeedsEncoding),
            "blob" | "dfx-blob" => Some(ArgumentInputKind::DfxBlob),
            _ => None,
        }
    }
}

/// Result of one argument verification attempt
///
/// Replaced wholesale whenever the input kind or content changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentEvidence {
    /// How the input was interpreted
    pub input_kind: ArgumentInputKind,

    /// Input exactly as supplied
    pub raw_input: String,

    /// Expected argument digest at the time of the attempt
    pub expected_digest: Option<String>,

    /// Digest computed from the decoded input
    pub computed_digest: Option<String>,

    /// Whether the computed digest equals a 64-hex expected digest
    pub matched: bool,

    /// Failure or advisory message
    pub error: Option<String>,
}

impl ArgumentEvidence {
    /// Record a completed digest computation
    ///
    /// `matched` is forced to `false` unless a 64-hex expected digest is present.
    pub fn computed(
        input_kind: ArgumentInputKind,
        raw_input: impl Into<String>,
        expected_digest: Option<String>,
        computed_digest: String,
        matched: bool,
    ) -> Self {
        let verifiable = expected_digest.as_deref().is_some_and(is_digest_hex);
        let error = if verifiable {
            None
        } else {
            Some("No expected argument digest to compare against".to_string())
        };

        Self {
            input_kind,
            raw_input: raw_input.into(),
            expected_digest,
            computed_digest: Some(computed_digest),
            matched: matched && verifiable,
            error,
        }
    }

    /// Record an attempt that failed before a digest could be computed
    pub fn failed(
        input_kind: ArgumentInputKind,
        raw_input: impl Into<String>,
        expected_digest: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            input_kind,
            raw_input: raw_input.into(),
            expected_digest,
            computed_digest: None,
            matched: false,
            error: Some(error.into()),
        }
    }

    /// Attach an advisory note without changing the outcome
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{}; {}", existing, note),
            None => note,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_match_requires_expected_digest() {
        let ev = ArgumentEvidence::computed(
            ArgumentInputKind::Text,
            "",
            None,
            HASH.to_string(),
            true,
        );
        assert!(!ev.matched);
        assert!(ev.error.is_some());
    }

    #[test]
    fn test_match_with_expected_digest() {
        let ev = ArgumentEvidence::computed(
            ArgumentInputKind::Hex,
            "",
            Some(HASH.to_string()),
            HASH.to_string(),
            true,
        );
        assert!(ev.matched);
        assert!(ev.error.is_none());
    }

    #[test]
    fn test_failed_attempt() {
        let ev = ArgumentEvidence::failed(ArgumentInputKind::Hex, "zz", None, "bad hex");
        assert!(!ev.matched);
        assert!(ev.computed_digest.is_none());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ArgumentInputKind::parse("HEX"), Some(ArgumentInputKind::Hex));
        assert_eq!(ArgumentInputKind::parse("blob"), Some(ArgumentInputKind::DfxBlob));
        assert_eq!(ArgumentInputKind::parse("nope"), None);
    }
}
