//! Veritas Domain Layer
//!
//! This crate contains the shared data model for proposal verification.
//! It has ZERO external dependencies and defines the evidence entities and
//! trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **ProposalEvidence**: Everything extracted about one proposal
//! - **DocEvidence**: Per-document digest verification state
//! - **ArgumentEvidence**: One attempt at verifying call arguments
//! - **CommitCheckResult**: Outcome of the two-tier commit lookup
//! - **ChecklistState**: Readiness flags derived from all of the above
//!
//! ## Invariant
//!
//! No entity ever reports a digest match without a concrete 64-hex expected
//! digest. Absence of an expected digest always yields unknown / false.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod argument;
pub mod checklist;
pub mod commit;
pub mod digest;
pub mod document;
pub mod proposal;
pub mod traits;

// Re-exports for convenience
pub use argument::{ArgumentEvidence, ArgumentInputKind};
pub use checklist::ChecklistState;
pub use commit::{
    CommitCheckResult, CommitLookupOutcome, CommitTier, FAILURE_INDICATOR, SUCCESS_INDICATOR,
};
pub use digest::{is_digest_hex, DIGEST_HEX_LEN};
pub use document::{DocEvidence, MatchResult};
pub use proposal::{
    DigestHints, DigestProvenance, DocumentRef, ProposalEvidence, ProposalId, ProposalKind,
    ProposalRecord,
};
pub use traits::{FetchedDocument, UploadedFile};
