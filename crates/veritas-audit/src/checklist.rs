//! Checklist aggregation
//!
//! Folds every verification facet into the six readiness flags. Pure and
//! idempotent: the same inputs always give the same state.

use veritas_domain::{
    ArgumentEvidence, ChecklistState, DocEvidence, MatchResult, ProposalEvidence,
    SUCCESS_INDICATOR,
};

/// Compute the checklist from the current facets
///
/// `commit_status` is the most recent commit status line; only a line
/// starting with the success indicator counts. The document flag is false
/// when no document carries a 64-hex expected digest.
pub fn aggregate(
    evidence: Option<&ProposalEvidence>,
    documents: &[DocEvidence],
    direct_argument: Option<&ArgumentEvidence>,
    blob_argument: Option<&ArgumentEvidence>,
    commit_status: Option<&str>,
    manual_rebuild_confirmed: bool,
) -> ChecklistState {
    let mut verifiable = documents.iter().filter(|d| d.is_verifiable()).peekable();
    let document_digest_verified =
        verifiable.peek().is_some() && verifiable.all(|d| d.match_result == MatchResult::Match);

    ChecklistState {
        fetched: evidence.is_some(),
        commit_verified: commit_status.is_some_and(|s| s.starts_with(SUCCESS_INDICATOR)),
        argument_digest_verified: [direct_argument, blob_argument]
            .into_iter()
            .flatten()
            .any(|a| a.matched),
        document_digest_verified,
        expected_digest_known: evidence
            .and_then(|e| e.expected_digest())
            .is_some_and(|d| !d.trim().is_empty()),
        manual_rebuild_confirmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_domain::{
        ArgumentInputKind, DigestProvenance, DocumentRef, ProposalId, FAILURE_INDICATOR,
    };

    const HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    fn evidence() -> ProposalEvidence {
        ProposalEvidence::new(ProposalId::new(1).unwrap(), "summary")
    }

    fn doc(expected: Option<&str>, result: MatchResult) -> DocEvidence {
        let mut doc = DocEvidence::from_ref(&DocumentRef {
            name: "doc.pdf".to_string(),
            url: None,
            expected_hash: expected.map(String::from),
        });
        doc.match_result = result;
        doc
    }

    fn argument(matched: bool) -> ArgumentEvidence {
        ArgumentEvidence::computed(
            ArgumentInputKind::Hex,
            "4449444c0000",
            Some(HASH.to_string()),
            if matched { HASH.to_string() } else { "0".repeat(64) },
            matched,
        )
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(aggregate(None, &[], None, None, None, false), ChecklistState::default());
    }

    #[test]
    fn test_fetched_and_expected_digest() {
        let mut ev = evidence();
        let state = aggregate(Some(&ev), &[], None, None, None, false);
        assert!(state.fetched);
        assert!(!state.expected_digest_known);

        ev.offer_expected_digest(Some(HASH), DigestProvenance::Dashboard);
        let state = aggregate(Some(&ev), &[], None, None, None, false);
        assert!(state.expected_digest_known);
    }

    #[test]
    fn test_documents_vacuously_false() {
        let ev = evidence();
        let unverifiable = vec![doc(None, MatchResult::Unknown), doc(Some("abc"), MatchResult::Unknown)];
        assert!(!aggregate(Some(&ev), &[], None, None, None, false).document_digest_verified);
        assert!(!aggregate(Some(&ev), &unverifiable, None, None, None, false).document_digest_verified);
    }

    #[test]
    fn test_documents_require_every_verifiable_match() {
        let ev = evidence();
        let mixed = vec![
            doc(Some(HASH), MatchResult::Match),
            doc(Some(HASH), MatchResult::Mismatch),
        ];
        assert!(!aggregate(Some(&ev), &mixed, None, None, None, false).document_digest_verified);

        let all_match = vec![
            doc(Some(HASH), MatchResult::Match),
            doc(None, MatchResult::Unknown),
            doc(Some(HASH), MatchResult::Match),
        ];
        assert!(aggregate(Some(&ev), &all_match, None, None, None, false).document_digest_verified);
    }

    #[test]
    fn test_either_argument_facet_verifies() {
        let ok = argument(true);
        let bad = argument(false);
        assert!(aggregate(None, &[], Some(&ok), None, None, false).argument_digest_verified);
        assert!(aggregate(None, &[], Some(&bad), Some(&ok), None, false).argument_digest_verified);
        assert!(!aggregate(None, &[], Some(&bad), Some(&bad), None, false).argument_digest_verified);
    }

    #[test]
    fn test_commit_status_prefix() {
        let good = format!("{} dfinity/ic@abcdef1 (primary): found", SUCCESS_INDICATOR);
        let bad = format!("{} dfinity/ic@abcdef1 (fallback): missing", FAILURE_INDICATOR);
        assert!(aggregate(None, &[], None, None, Some(&good), false).commit_verified);
        assert!(!aggregate(None, &[], None, None, Some(&bad), false).commit_verified);
        assert!(!aggregate(None, &[], None, None, Some(" ✅ padded"), false).commit_verified);
    }

    #[test]
    fn test_manual_flag_passes_through() {
        assert!(aggregate(None, &[], None, None, None, true).manual_rebuild_confirmed);
    }

    #[test]
    fn test_idempotent() {
        let ev = evidence();
        let docs = vec![doc(Some(HASH), MatchResult::Match)];
        let arg = argument(true);
        let first = aggregate(Some(&ev), &docs, Some(&arg), None, Some("✅ ok"), true);
        let second = aggregate(Some(&ev), &docs, Some(&arg), None, Some("✅ ok"), true);
        assert_eq!(first, second);
        assert_eq!(first.completed(), 5);
    }
}
