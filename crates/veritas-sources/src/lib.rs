//! Veritas Source Adapters
//!
//! HTTP implementations of the boundary traits from `veritas-domain`.
//!
//! # Architecture
//!
//! Each adapter wraps one external service and translates its wire format
//! into domain types exactly once, at the edge. The verification engine only
//! ever sees `ProposalRecord`, `DigestHints`, `CommitLookupOutcome` and
//! `FetchedDocument`.
//!
//! # Adapters
//!
//! - `RegistryClient`: upstream proposal registry (`EvidenceSource`)
//! - `DashboardClient`: public dashboard digests (`DigestHintSource`)
//! - `CommitStatusClient`: primary commit lookup (`CommitLookup`)
//! - `GithubCommitClient`: browser-reachable fallback lookup (`CommitLookup`)
//! - `HttpDocumentFetcher`: document download with allow-list and proxy
//!   fallback (`DocumentFetcher`)
//! - `Mock*`: deterministic in-memory doubles for tests and offline use
//!
//! # Examples
//!
//! ```
//! use veritas_sources::{HttpSettings, RegistryClient};
//! use std::time::Duration;
//!
//! let settings = HttpSettings::default().with_timeout(Duration::from_secs(10));
//! let registry = RegistryClient::new("https://registry.example.org", &settings).unwrap();
//! assert_eq!(registry.base_url(), "https://registry.example.org");
//! ```

#![warn(missing_docs)]

pub mod commit;
pub mod dashboard;
pub mod documents;
pub mod http;
pub mod mock;
pub mod registry;

use thiserror::Error;

pub use commit::{CommitStatusClient, GithubCommitClient};
pub use dashboard::DashboardClient;
pub use documents::HttpDocumentFetcher;
pub use http::HttpSettings;
pub use mock::{MockCommitLookup, MockDigestHints, MockDocumentFetcher, MockEvidenceSource};
pub use registry::RegistryClient;

/// Errors that can occur while talking to external services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Any fetch or lookup failure at the transport level
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Host refuses direct access and no fallback succeeded
    #[error("Access restricted for {host}: {guidance}")]
    AccessRestricted {
        /// Host that refused access
        host: String,
        /// What the user can do instead
        guidance: String,
    },

    /// The service answered with something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::InvalidResponse(err.to_string())
        } else {
            SourceError::NetworkUnavailable(err.to_string())
        }
    }
}
