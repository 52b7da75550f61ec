//! Veritas Scanner
//!
//! Mines unstructured proposal text for verification evidence.
//!
//! # Overview
//!
//! Proposal summaries are free-form markdown written by humans. The scanner
//! uses text heuristics to pull out what an auditor needs to check:
//!
//! - **URLs**: scheme-qualified links, stripped of surrounding punctuation
//! - **Digests**: 64-hex tokens anchored near prioritized label markers
//! - **Commit & repository**: from source-host URLs or commit labels
//! - **Documents**: linked files and the digest stated beside them
//! - **Structured syntax**: a warning that argument text needs encoding
//!
//! # Architecture
//!
//! ```text
//! Summary → EvidenceScanner → SummaryEvidence → (audit session enrichment)
//! ```
//!
//! # Example Usage
//!
//! ```
//! use veritas_scanner::{EvidenceScanner, ScannerConfig};
//!
//! let scanner = EvidenceScanner::new(ScannerConfig::default()).unwrap();
//! let summary = format!(
//!     "Source: https://github.com/dfinity/ic/commit/{}\nWasm module hash: {}",
//!     "1".repeat(40),
//!     "ab".repeat(32),
//! );
//!
//! let evidence = scanner.scan(&summary).unwrap();
//! assert_eq!(evidence.repository.as_deref(), Some("dfinity/ic"));
//! assert_eq!(evidence.expected_digest, Some("ab".repeat(32)));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod markers;
mod scanner;
mod syntax;
mod types;
mod urls;


pub use config::ScannerConfig;
pub use error::ScannerError;
pub use markers::{
    find_digest_near_markers, find_digest_near_markers_in, find_labelled_digest,
    find_labelled_token, Window, DEFAULT_WINDOW_AFTER, DEFAULT_WINDOW_BEFORE,
};
pub use scanner::{find_artifact_path, find_repository, EvidenceScanner};
pub use syntax::detect_structured_syntax;
pub use types::SummaryEvidence;
pub use urls::{find_urls, sanitize_url};
