//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the verification engine and
//! the network services it queries. Infrastructure implementations live in
//! `veritas-sources`.

// Implementations are used through generics, never as trait objects, so the
// missing `Send` bound on the returned futures is not a concern.
#![allow(async_fn_in_trait)]

use crate::{CommitLookupOutcome, DigestHints, ProposalId, ProposalRecord};

/// Trait for fetching proposal data from the upstream registry
pub trait EvidenceSource {
    /// Error type for fetch operations
    type Error;

    /// Fetch a proposal by id
    async fn fetch_proposal(&self, id: ProposalId) -> Result<ProposalRecord, Self::Error>;
}

/// Trait for secondary digest sources (e.g. a public dashboard)
pub trait DigestHintSource {
    /// Error type for lookups
    type Error;

    /// Fetch whatever digests the source knows for a proposal
    async fn fetch_digest_hints(&self, id: ProposalId) -> Result<DigestHints, Self::Error>;
}

/// Trait for a single commit-existence lookup service
pub trait CommitLookup {
    /// Error type for lookups
    type Error;

    /// Ask whether `commit` exists in `repository` (`owner/repo`)
    async fn lookup(
        &self,
        repository: &str,
        commit: &str,
    ) -> Result<CommitLookupOutcome, Self::Error>;
}

/// Bytes and metadata of a downloaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Raw response body
    pub bytes: Vec<u8>,

    /// `Content-Type` header, if any
    pub content_type: Option<String>,

    /// URL the bytes were finally read from
    pub final_url: String,
}

/// A file supplied by the user instead of fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Raw file content
    pub bytes: Vec<u8>,

    /// Original file name
    pub filename: String,

    /// Declared content type
    pub content_type: Option<String>,
}

/// Trait for downloading referenced documents
pub trait DocumentFetcher {
    /// Error type for fetch operations
    type Error;

    /// Download the document at `url`
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, Self::Error>;
}
