//! Public dashboard client for secondary digest hints

use crate::http::{ensure_success, trim_base, HttpSettings};
use crate::SourceError;
use serde::Deserialize;
use tracing::debug;
use veritas_domain::traits::DigestHintSource;
use veritas_domain::{is_digest_hex, DigestHints, ProposalId};

#[derive(Debug, Deserialize)]
struct DashboardProposal {
    #[serde(default)]
    payload: Option<DashboardPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct DashboardPayload {
    #[serde(default)]
    wasm_module_hash: Option<String>,
    #[serde(default)]
    arg_hash: Option<String>,
}

impl DashboardProposal {
    /// Keep only well-formed digests; anything else is no hint at all
    fn into_hints(self) -> DigestHints {
        let payload = self.payload.unwrap_or_default();
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| is_digest_hex(v))
        };
        DigestHints {
            wasm_hash: clean(payload.wasm_module_hash),
            arg_hash: clean(payload.arg_hash),
        }
    }
}

/// HTTP client for the public proposal dashboard
///
/// Reads `GET {base}/api/v3/proposals/{id}` and reports the payload digests.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    client: reqwest::Client,
}

impl DashboardClient {
    /// Create a dashboard client
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self, SourceError> {
        Ok(Self::with_client(base_url, settings.client()?))
    }

    /// Create a dashboard client sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(base_url),
            client,
        }
    }

    fn proposal_url(&self, id: ProposalId) -> String {
        format!("{}/api/v3/proposals/{}", self.base_url, id)
    }
}

impl DigestHintSource for DashboardClient {
    type Error = SourceError;

    async fn fetch_digest_hints(&self, id: ProposalId) -> Result<DigestHints, Self::Error> {
        let url = self.proposal_url(id);
        debug!("Fetching dashboard digests for proposal {}", id);

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, &format!("dashboard proposal {}", id)).await?;
        let proposal: DashboardProposal = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("dashboard proposal {}: {}", id, e)))?;

        Ok(proposal.into_hints())
    }
}
