//! Audit session: the explicit state of one auditor working one proposal
//!
//! Every action takes `&mut self`, so at most one action per session is in
//! flight. A failed action returns an error and leaves the previous state as
//! it was.

use crate::checklist::aggregate;
use crate::commit::CommitVerifier;
use crate::AuditError;
use std::fmt::Display;
use tracing::{debug, info, warn};
use veritas_codec::{blob, digest, hex_codec};
use veritas_domain::traits::{
    CommitLookup, DigestHintSource, DocumentFetcher, EvidenceSource, UploadedFile,
};
use veritas_domain::{
    ArgumentEvidence, ArgumentInputKind, ChecklistState, CommitCheckResult, DigestHints,
    DigestProvenance, DocEvidence, ProposalEvidence, ProposalId, ProposalKind,
};
use veritas_scanner::{detect_structured_syntax, EvidenceScanner};

/// Characters kept in a document text preview
pub const PREVIEW_CHARS: usize = 160;

/// Advisory attached to text input that looks like a structured value
pub const STRUCTURED_TEXT_NOTE: &str =
    "input looks like a structured interface value; its text bytes are hashed as-is, \
     encode it externally and verify the hex or blob output instead";

/// Error recorded for structured input that has not been encoded
pub const NEEDS_ENCODING_MESSAGE: &str =
    "structured arguments must be encoded to bytes with an external tool \
     (for example `didc encode`) and verified as hex or blob input";

/// State of one audit
#[derive(Debug, Clone, Default)]
pub struct AuditSession {
    scanner: EvidenceScanner,
    evidence: Option<ProposalEvidence>,
    documents: Vec<DocEvidence>,
    direct_argument: Option<ArgumentEvidence>,
    blob_argument: Option<ArgumentEvidence>,
    commit_result: Option<CommitCheckResult>,
    commit_status: Option<String>,
    manual_rebuild_confirmed: bool,
    fetch_generation: u64,
}

impl AuditSession {
    /// Create an empty session that scans summaries with `scanner`
    pub fn new(scanner: EvidenceScanner) -> Self {
        Self {
            scanner,
            ..Self::default()
        }
    }

    /// Currently loaded proposal evidence
    pub fn evidence(&self) -> Option<&ProposalEvidence> {
        self.evidence.as_ref()
    }

    /// Per-document verification state, in document order
    pub fn documents(&self) -> &[DocEvidence] {
        &self.documents
    }

    /// Last text/hex argument check
    pub fn direct_argument(&self) -> Option<&ArgumentEvidence> {
        self.direct_argument.as_ref()
    }

    /// Last blob argument check
    pub fn blob_argument(&self) -> Option<&ArgumentEvidence> {
        self.blob_argument.as_ref()
    }

    /// Last commit check
    pub fn commit_result(&self) -> Option<&CommitCheckResult> {
        self.commit_result.as_ref()
    }

    /// Last commit status line
    pub fn commit_status(&self) -> Option<&str> {
        self.commit_status.as_deref()
    }

    /// Whether the auditor confirmed a local rebuild
    pub fn manual_rebuild_confirmed(&self) -> bool {
        self.manual_rebuild_confirmed
    }

    /// Number of successful proposal loads so far
    ///
    /// Callers that start work against one generation can compare it later
    /// to tell whether a newer proposal has replaced it.
    pub fn fetch_generation(&self) -> u64 {
        self.fetch_generation
    }

    /// Load a proposal from the registry and scan its summary
    pub async fn load_proposal<S>(
        &mut self,
        source: &S,
        id: ProposalId,
    ) -> Result<&ProposalEvidence, AuditError>
    where
        S: EvidenceSource,
        S::Error: Into<AuditError>,
    {
        self.load(source, None::<&NoDigestHints>, id).await
    }

    /// Load a proposal, consulting a secondary digest source as well
    ///
    /// Expected digests are filled in order registry, dashboard, summary
    /// heuristic; the first source to supply one wins. A failing dashboard
    /// is logged and skipped.
    pub async fn load_proposal_with_hints<S, D>(
        &mut self,
        source: &S,
        dashboard: &D,
        id: ProposalId,
    ) -> Result<&ProposalEvidence, AuditError>
    where
        S: EvidenceSource,
        S::Error: Into<AuditError>,
        D: DigestHintSource,
        D::Error: Display,
    {
        self.load(source, Some(dashboard), id).await
    }

    async fn load<S, D>(
        &mut self,
        source: &S,
        dashboard: Option<&D>,
        id: ProposalId,
    ) -> Result<&ProposalEvidence, AuditError>
    where
        S: EvidenceSource,
        S::Error: Into<AuditError>,
        D: DigestHintSource,
        D::Error: Display,
    {
        let record = source
            .fetch_proposal(id)
            .await
            .map_err(Into::<AuditError>::into)?;
        let scanned = self.scanner.scan(&record.summary)?;

        let mut evidence = ProposalEvidence::new(id, record.summary.clone());
        evidence.title = record.title.clone();
        evidence.kind = record
            .action
            .as_deref()
            .map(ProposalKind::from_action)
            .unwrap_or_default();
        evidence.repository = record.repository_hint.clone().or(scanned.repository);
        evidence.commit = record.commit_hint.clone().or(scanned.commit);
        evidence.documents = scanned.documents;
        evidence.artifact_path = scanned.artifact_path;
        evidence.urls = scanned.urls;

        evidence.offer_expected_digest(record.expected_digest.as_deref(), DigestProvenance::Registry);
        evidence.offer_arg_digest(record.expected_arg_digest.as_deref(), DigestProvenance::Registry);

        if let Some(dashboard) = dashboard {
            match dashboard.fetch_digest_hints(id).await {
                Ok(DigestHints { wasm_hash, arg_hash }) => {
                    evidence.offer_expected_digest(wasm_hash.as_deref(), DigestProvenance::Dashboard);
                    evidence.offer_arg_digest(arg_hash.as_deref(), DigestProvenance::Dashboard);
                }
                Err(err) => warn!("Dashboard digests unavailable for proposal {}: {}", id, err),
            }
        }

        evidence.offer_expected_digest(
            scanned.expected_digest.as_deref(),
            DigestProvenance::SummaryHeuristic,
        );
        evidence.offer_arg_digest(
            scanned.expected_arg_digest.as_deref(),
            DigestProvenance::SummaryHeuristic,
        );

        info!(
            "Loaded proposal {} ({}): digest from {}, {} documents",
            id,
            evidence.kind,
            evidence.digest_provenance().map_or("nowhere", |p| p.tag()),
            evidence.documents.len()
        );

        self.documents = evidence.documents.iter().map(DocEvidence::from_ref).collect();
        self.direct_argument = None;
        self.blob_argument = None;
        self.commit_result = None;
        self.commit_status = None;
        self.fetch_generation += 1;
        Ok(self.evidence.insert(evidence))
    }

    fn expected_arg_digest(&self) -> Option<String> {
        self.evidence
            .as_ref()
            .and_then(|e| e.expected_arg_digest())
            .map(str::to_string)
    }

    /// Verify call arguments given as text, hex, or an escaped blob
    ///
    /// Decoding problems are recorded on the returned evidence rather than
    /// returned as errors, so the input stays editable.
    pub fn verify_argument(&mut self, kind: ArgumentInputKind, input: &str) -> &ArgumentEvidence {
        if kind == ArgumentInputKind::DfxBlob {
            return self.verify_argument_blob(input);
        }

        let expected = self.expected_arg_digest();
        let evidence = match kind {
            ArgumentInputKind::Text => {
                let evidence = computed(kind, input, expected, input.as_bytes());
                if detect_structured_syntax(input) {
                    warn!("Hashing text argument that looks like a structured value");
                    evidence.with_note(STRUCTURED_TEXT_NOTE)
                } else {
                    evidence
                }
            }
            ArgumentInputKind::Hex => match hex_codec::decode(input) {
                Ok(bytes) => computed(kind, input, expected, &bytes),
                Err(err) => ArgumentEvidence::failed(kind, input, expected, err.to_string()),
            },
            ArgumentInputKind::CandidNeedsEncoding | ArgumentInputKind::DfxBlob => {
                ArgumentEvidence::failed(kind, input, expected, NEEDS_ENCODING_MESSAGE)
            }
        };

        debug!("Argument check ({}): matched={}", kind.as_str(), evidence.matched);
        self.direct_argument.insert(evidence)
    }

    /// Verify call arguments given as escaped-blob tool output
    ///
    /// Accepts either full output containing a `blob "..."` literal or the
    /// bare escaped payload between the quotes. Output with neither, such as
    /// `(null)`, is recorded as a failure and never hashed.
    pub fn verify_argument_blob(&mut self, tool_output: &str) -> &ArgumentEvidence {
        let kind = ArgumentInputKind::DfxBlob;
        let expected = self.expected_arg_digest();

        let evidence = match blob::payload_from_tool_output(tool_output).and_then(blob::parse) {
            Ok(bytes) => computed(kind, tool_output, expected, &bytes),
            Err(err) => ArgumentEvidence::failed(kind, tool_output, expected, err.to_string()),
        };

        debug!("Blob argument check: matched={}", evidence.matched);
        self.blob_argument.insert(evidence)
    }

    /// Download document `index` and compare its digest
    ///
    /// Download failures are recorded on the document entry.
    pub async fn verify_document<F>(
        &mut self,
        index: usize,
        fetcher: &F,
    ) -> Result<&DocEvidence, AuditError>
    where
        F: DocumentFetcher,
        F::Error: Display,
    {
        let url = self.document_mut(index)?.source_url.clone();
        let Some(url) = url else {
            let doc = self.document_mut(index)?;
            doc.record_error("No download URL; upload the file instead");
            return Ok(doc);
        };

        let fetched = fetcher.fetch(&url).await;
        let doc = self.document_mut(index)?;
        match fetched {
            Ok(fetched) => record_bytes(doc, &fetched.bytes, fetched.content_type.as_deref()),
            Err(err) => {
                warn!("Could not fetch {}: {}", url, err);
                doc.record_error(err.to_string());
            }
        }
        Ok(doc)
    }

    /// Compare the digest of a user-supplied file with document `index`
    pub fn verify_document_upload(
        &mut self,
        index: usize,
        upload: &UploadedFile,
    ) -> Result<&DocEvidence, AuditError> {
        let doc = self.document_mut(index)?;
        debug!("Verifying upload {} against {}", upload.filename, doc.name);
        record_bytes(doc, &upload.bytes, upload.content_type.as_deref());
        Ok(doc)
    }

    fn document_mut(&mut self, index: usize) -> Result<&mut DocEvidence, AuditError> {
        if self.evidence.is_none() {
            return Err(AuditError::NoProposalLoaded);
        }
        let count = self.documents.len();
        self.documents
            .get_mut(index)
            .ok_or(AuditError::DocumentIndex { index, count })
    }

    /// Check the loaded proposal's repository and commit
    pub async fn check_commit<P, F>(
        &mut self,
        verifier: &CommitVerifier<P, F>,
    ) -> Result<&CommitCheckResult, AuditError>
    where
        P: CommitLookup,
        F: CommitLookup,
        P::Error: Display,
        F::Error: Display,
    {
        let evidence = self.evidence.as_ref().ok_or(AuditError::NoProposalLoaded)?;
        let (Some(repository), Some(commit)) = (evidence.repository.clone(), evidence.commit.clone())
        else {
            return Err(AuditError::MissingCommitTarget);
        };
        self.check_commit_for(verifier, &repository, &commit).await
    }

    /// Check an explicitly named repository and commit
    pub async fn check_commit_for<P, F>(
        &mut self,
        verifier: &CommitVerifier<P, F>,
        repository: &str,
        commit: &str,
    ) -> Result<&CommitCheckResult, AuditError>
    where
        P: CommitLookup,
        F: CommitLookup,
        P::Error: Display,
        F::Error: Display,
    {
        let result = verifier.verify(repository, commit).await;
        self.commit_status = Some(result.status_line());
        Ok(self.commit_result.insert(result))
    }

    /// Record that the auditor rebuilt the artifact and saw a matching digest
    ///
    /// Stays set across proposal loads.
    pub fn confirm_manual_rebuild(&mut self) {
        self.manual_rebuild_confirmed = true;
    }

    /// Current readiness flags
    pub fn checklist(&self) -> ChecklistState {
        aggregate(
            self.evidence.as_ref(),
            &self.documents,
            self.direct_argument.as_ref(),
            self.blob_argument.as_ref(),
            self.commit_status.as_deref(),
            self.manual_rebuild_confirmed,
        )
    }
}

fn computed(
    kind: ArgumentInputKind,
    raw: &str,
    expected: Option<String>,
    bytes: &[u8],
) -> ArgumentEvidence {
    let computed = digest::digest(bytes);
    let matched = digest::matches(Some(&computed), expected.as_deref());
    ArgumentEvidence::computed(kind, raw, expected, computed, matched)
}

fn record_bytes(doc: &mut DocEvidence, bytes: &[u8], content_type: Option<&str>) {
    let computed = digest::digest(bytes);
    let matched = digest::matches(Some(&computed), doc.expected_hash.as_deref());
    doc.record_digest(computed, matched, preview(bytes, content_type));
    info!("Document {}: {}", doc.name, doc.match_result.as_str());
}

/// Short text preview for textual content
fn preview(bytes: &[u8], content_type: Option<&str>) -> Option<String> {
    let binary_type = content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        !(ct.starts_with("text/") || ct.contains("json") || ct.contains("xml"))
    });
    if binary_type {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(PREVIEW_CHARS).collect())
}

/// Placeholder hint source for loads without a dashboard
struct NoDigestHints;

impl DigestHintSource for NoDigestHints {
    type Error = AuditError;

    async fn fetch_digest_hints(&self, _id: ProposalId) -> Result<DigestHints, Self::Error> {
        Ok(DigestHints::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_only_for_text() {
        assert_eq!(preview(b"  hello  ", None), Some("hello".to_string()));
        assert_eq!(preview(b"hello", Some("text/markdown")), Some("hello".to_string()));
        assert_eq!(preview(b"{}", Some("application/json")), Some("{}".to_string()));
        assert_eq!(preview(b"%PDF", Some("application/pdf")), None);
        assert_eq!(preview(&[0xff, 0xfe], None), None);
        assert_eq!(preview(b"   ", None), None);
    }

    #[test]
    fn test_preview_is_bounded() {
        let long = "x".repeat(PREVIEW_CHARS * 2);
        assert_eq!(preview(long.as_bytes(), None).map(|p| p.len()), Some(PREVIEW_CHARS));
    }

    #[test]
    fn test_actions_need_a_proposal() {
        let mut session = AuditSession::default();
        let upload = UploadedFile {
            bytes: b"x".to_vec(),
            filename: "x.txt".to_string(),
            content_type: None,
        };
        assert_eq!(
            session.verify_document_upload(0, &upload).unwrap_err(),
            AuditError::NoProposalLoaded
        );
    }

    #[test]
    fn test_argument_without_proposal_never_matches() {
        let mut session = AuditSession::default();
        let evidence = session.verify_argument(ArgumentInputKind::Text, "hello");
        assert!(!evidence.matched);
        assert!(evidence.computed_digest.is_some());
        assert!(evidence.error.is_some());
    }

    #[test]
    fn test_manual_flag_is_sticky() {
        let mut session = AuditSession::default();
        session.confirm_manual_rebuild();
        session.confirm_manual_rebuild();
        assert!(session.checklist().manual_rebuild_confirmed);
    }
}
