//! Error types for audit session actions

use thiserror::Error;
use veritas_codec::CodecError;
use veritas_scanner::ScannerError;
use veritas_sources::SourceError;

/// Errors that can occur during audit actions
///
/// None of these is fatal to a session: a failed action leaves the
/// previous state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Byte decoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Summary scanning failed
    #[error("Scanner error: {0}")]
    Scanner(#[from] ScannerError),

    /// An external service failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The action needs a loaded proposal
    #[error("No proposal loaded")]
    NoProposalLoaded,

    /// Document index out of range
    #[error("No document at index {index} ({count} documents)")]
    DocumentIndex {
        /// Requested index
        index: usize,
        /// Number of documents available
        count: usize,
    },

    /// Neither the proposal nor the caller named a repository and commit
    #[error("No repository and commit to check")]
    MissingCommitTarget,
}
