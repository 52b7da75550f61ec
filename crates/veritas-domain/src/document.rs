//! Document evidence - per-document verification state

use crate::digest::is_digest_hex;
use crate::proposal::DocumentRef;

/// Outcome of comparing a document digest against its expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchResult {
    /// Not verified yet, or not verifiable
    #[default]
    Unknown,

    /// Computed digest equals the expected digest
    Match,

    /// Computed digest differs from the expected digest
    Mismatch,
}

impl MatchResult {
    /// Get the result name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Unknown => "unknown",
            MatchResult::Match => "match",
            MatchResult::Mismatch => "mismatch",
        }
    }
}

/// Verification state of one referenced document
///
/// Entries are only ever updated in place by the verification action for
/// that document; they are never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEvidence {
    /// Display name
    pub name: String,

    /// Where the document can be fetched, if known
    pub source_url: Option<String>,

    /// Expected digest; anything other than 64 hex chars is treated as absent
    pub expected_hash: Option<String>,

    /// Current comparison outcome
    pub match_result: MatchResult,

    /// Digest computed by the last successful verification
    pub computed_hash: Option<String>,

    /// Last failure, if any
    pub error: Option<String>,

    /// Short text preview of the verified content
    pub preview: Option<String>,
}

impl DocEvidence {
    /// Create unverified evidence for a document reference
    pub fn from_ref(doc: &DocumentRef) -> Self {
        Self {
            name: doc.name.clone(),
            source_url: doc.url.clone(),
            expected_hash: doc
                .expected_hash
                .as_deref()
                .filter(|h| is_digest_hex(h))
                .map(|h| h.trim().to_ascii_lowercase()),
            match_result: MatchResult::Unknown,
            computed_hash: None,
            error: None,
            preview: None,
        }
    }

    /// Whether this document carries an expected digest to compare against
    pub fn is_verifiable(&self) -> bool {
        self.expected_hash.as_deref().is_some_and(is_digest_hex)
    }

    /// Record a computed digest and the comparison made by the caller
    ///
    /// A match is only recorded when the document is verifiable; otherwise
    /// the result stays `Unknown` and an explanatory error is set.
    pub fn record_digest(&mut self, computed: String, matched: bool, preview: Option<String>) {
        self.computed_hash = Some(computed);
        self.preview = preview;

        if !self.is_verifiable() {
            self.match_result = MatchResult::Unknown;
            self.error = Some("No 64-hex expected hash; document is not verifiable".to_string());
            return;
        }

        self.error = None;
        self.match_result = if matched {
            MatchResult::Match
        } else {
            MatchResult::Mismatch
        };
    }

    /// Record a failure without discarding the previous outcome
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
