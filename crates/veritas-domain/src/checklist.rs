//! Checklist state - the six readiness flags shown to the auditor

/// Readiness flags derived from the current evidence
///
/// Every flag except `manual_rebuild_confirmed` is recomputed from other
/// entities; that one is a sticky user assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChecklistState {
    /// A proposal is loaded
    pub fetched: bool,

    /// The most recent commit check succeeded
    pub commit_verified: bool,

    /// An argument digest check currently matches
    pub argument_digest_verified: bool,

    /// Every verifiable document matches, and there is at least one
    pub document_digest_verified: bool,

    /// A top-level expected digest is known
    pub expected_digest_known: bool,

    /// The auditor asserted a successful local rebuild
    pub manual_rebuild_confirmed: bool,
}

impl ChecklistState {
    /// Flags as `(label, value)` pairs in display order
    pub fn items(&self) -> [(&'static str, bool); 6] {
        [
            ("Proposal fetched", self.fetched),
            ("Commit verified", self.commit_verified),
            ("Expected digest known", self.expected_digest_known),
            ("Argument digest verified", self.argument_digest_verified),
            ("Document digests verified", self.document_digest_verified),
            ("Rebuild confirmed", self.manual_rebuild_confirmed),
        ]
    }

    /// Number of flags that are set
    pub fn completed(&self) -> usize {
        self.items().iter().filter(|(_, v)| *v).count()
    }

    /// Total number of flags
    pub fn total(&self) -> usize {
        self.items().len()
    }
}
