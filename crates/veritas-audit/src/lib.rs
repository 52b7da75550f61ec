//! Veritas Audit
//!
//! Verification actions and their aggregation into a readiness checklist.
//!
//! # Architecture
//!
//! ```text
//! EvidenceSource ─┐
//! DigestHintSource┼→ AuditSession ──→ ChecklistState
//! DocumentFetcher ┤        │
//! CommitVerifier ─┘   (codec, scanner)
//! ```
//!
//! - [`CommitVerifier`] runs the two-tier commit check as a state machine.
//! - [`aggregate`] folds all facets into six flags.
//! - [`AuditSession`] holds the state of one audit and exposes every
//!   user-triggered action.
//!
//! # Example
//!
//! ```
//! use veritas_audit::AuditSession;
//! use veritas_domain::ArgumentInputKind;
//!
//! let mut session = AuditSession::default();
//! let evidence = session.verify_argument(ArgumentInputKind::Hex, "0x4449444c0000");
//! assert!(evidence.computed_digest.is_some());
//! assert!(!session.checklist().fetched);
//! ```

#![warn(missing_docs)]

pub mod checklist;
pub mod commit;
mod error;
pub mod session;

pub use checklist::aggregate;
pub use commit::{validate_target, CommitCheckState, CommitVerifier};
pub use error::AuditError;
pub use session::AuditSession;
