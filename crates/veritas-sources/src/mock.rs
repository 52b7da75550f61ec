//! Deterministic in-memory implementations of the boundary traits
//!
//! All mocks are cheap to clone; clones share call counters so a test can
//! hand one copy to the code under test and inspect the other.

use crate::SourceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use veritas_domain::traits::{
    CommitLookup, DigestHintSource, DocumentFetcher, EvidenceSource, FetchedDocument,
};
use veritas_domain::{CommitLookupOutcome, DigestHints, ProposalId, ProposalRecord};

#[derive(Debug, Clone, Default)]
struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

/// Mock proposal registry
///
/// # Examples
///
/// ```
/// use veritas_sources::MockEvidenceSource;
/// use veritas_domain::{ProposalId, ProposalRecord};
///
/// let id = ProposalId::new(1).unwrap();
/// let source = MockEvidenceSource::default().with_proposal(ProposalRecord::new(id, "text"));
/// assert_eq!(source.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEvidenceSource {
    proposals: HashMap<ProposalId, ProposalRecord>,
    failure: Option<SourceError>,
    calls: CallCounter,
}

impl MockEvidenceSource {
    /// Register a proposal
    pub fn with_proposal(mut self, record: ProposalRecord) -> Self {
        self.proposals.insert(record.id, record);
        self
    }

    /// Fail every fetch with `error`
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of fetches made
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl EvidenceSource for MockEvidenceSource {
    type Error = SourceError;

    async fn fetch_proposal(&self, id: ProposalId) -> Result<ProposalRecord, Self::Error> {
        self.calls.bump();
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.proposals
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("proposal {}", id)))
    }
}

/// Mock dashboard
#[derive(Debug, Clone, Default)]
pub struct MockDigestHints {
    hints: HashMap<ProposalId, DigestHints>,
    failure: Option<SourceError>,
    calls: CallCounter,
}

impl MockDigestHints {
    /// Register hints for a proposal
    pub fn with_hints(mut self, id: ProposalId, hints: DigestHints) -> Self {
        self.hints.insert(id, hints);
        self
    }

    /// Fail every lookup with `error`
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of lookups made
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl DigestHintSource for MockDigestHints {
    type Error = SourceError;

    async fn fetch_digest_hints(&self, id: ProposalId) -> Result<DigestHints, Self::Error> {
        self.calls.bump();
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.hints
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("dashboard proposal {}", id)))
    }
}

/// Mock commit lookup service with a fixed answer
///
/// # Examples
///
/// ```
/// use veritas_sources::MockCommitLookup;
///
/// let lookup = MockCommitLookup::missing("no such commit");
/// assert_eq!(lookup.call_count(), 0);
/// assert!(lookup.calls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MockCommitLookup {
    answer: Result<CommitLookupOutcome, SourceError>,
    calls: CallCounter,
    log: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockCommitLookup {
    fn answering(answer: Result<CommitLookupOutcome, SourceError>) -> Self {
        Self {
            answer,
            calls: CallCounter::default(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always report that the commit exists
    pub fn found(status: impl Into<String>) -> Self {
        Self::answering(Ok(CommitLookupOutcome {
            exists: true,
            status: status.into(),
        }))
    }

    /// Always report that the commit does not exist
    pub fn missing(status: impl Into<String>) -> Self {
        Self::answering(Ok(CommitLookupOutcome {
            exists: false,
            status: status.into(),
        }))
    }

    /// Always fail as if the service were unreachable
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::answering(Err(SourceError::NetworkUnavailable(message.into())))
    }

    /// Number of lookups made
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    /// Reset the call counter and log
    pub fn reset(&self) {
        self.calls.reset();
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// `(repository, commit)` pairs looked up, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl CommitLookup for MockCommitLookup {
    type Error = SourceError;

    async fn lookup(
        &self,
        repository: &str,
        commit: &str,
    ) -> Result<CommitLookupOutcome, Self::Error> {
        self.calls.bump();
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((repository.to_string(), commit.to_string()));
        self.answer.clone()
    }
}

/// Mock document host
#[derive(Debug, Clone, Default)]
pub struct MockDocumentFetcher {
    documents: HashMap<String, Result<FetchedDocument, SourceError>>,
    calls: CallCounter,
}

impl MockDocumentFetcher {
    /// Serve `bytes` at `url`
    pub fn with_document(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let url = url.into();
        let doc = FetchedDocument {
            bytes: bytes.into(),
            content_type: None,
            final_url: url.clone(),
        };
        self.documents.insert(url, Ok(doc));
        self
    }

    /// Fail fetches of `url` with `error`
    pub fn with_failure(mut self, url: impl Into<String>, error: SourceError) -> Self {
        self.documents.insert(url.into(), Err(error));
        self
    }

    /// Number of fetches made
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl DocumentFetcher for MockDocumentFetcher {
    type Error = SourceError;

    async fn fetch(&self, url: &str) -> Result<FetchedDocument, Self::Error> {
        self.calls.bump();
        self.documents
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::NotFound(url.to_string())))
    }
}
