//! Proposal registry client
//!
//! The registry serialises optional fields as zero-or-one element arrays
//! (`[]` or `["value"]`). They are unwrapped into `Option` here and nowhere
//! else.

use crate::http::{ensure_success, trim_base, HttpSettings};
use crate::SourceError;
use serde::Deserialize;
use tracing::{debug, info};
use veritas_domain::traits::EvidenceSource;
use veritas_domain::{is_digest_hex, ProposalId, ProposalRecord};

/// Wire shape of one registry proposal
#[derive(Debug, Deserialize)]
struct RegistryProposal {
    id: u64,
    summary: String,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    action: Vec<String>,
    #[serde(default)]
    repository: Vec<String>,
    #[serde(default)]
    commit: Vec<String>,
    #[serde(default)]
    wasm_module_hash: Vec<String>,
    #[serde(default)]
    arg_hash: Vec<String>,
}

/// Unwrap a `[] | [T]` field, treating blank strings as absent
fn opt(values: Vec<String>) -> Option<String> {
    values
        .into_iter()
        .next()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`opt`], keeping the value only when it is a full hex digest
fn opt_digest(values: Vec<String>) -> Option<String> {
    opt(values).filter(|v| is_digest_hex(v))
}

impl RegistryProposal {
    fn into_record(self, requested: ProposalId) -> Result<ProposalRecord, SourceError> {
        if self.id != requested.value() {
            return Err(SourceError::InvalidResponse(format!(
                "registry returned proposal {} for request {}",
                self.id, requested
            )));
        }
        Ok(ProposalRecord {
            id: requested,
            title: opt(self.title),
            summary: self.summary,
            action: opt(self.action),
            repository_hint: opt(self.repository),
            commit_hint: opt(self.commit),
            expected_digest: opt_digest(self.wasm_module_hash),
            expected_arg_digest: opt_digest(self.arg_hash),
        })
    }
}

/// HTTP client for the upstream proposal registry
///
/// Reads `GET {base}/proposals/{id}`.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Create a registry client
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self, SourceError> {
        Ok(Self::with_client(base_url, settings.client()?))
    }

    /// Create a registry client sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(base_url),
            client,
        }
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn proposal_url(&self, id: ProposalId) -> String {
        format!("{}/proposals/{}", self.base_url, id)
    }
}

impl EvidenceSource for RegistryClient {
    type Error = SourceError;

    async fn fetch_proposal(&self, id: ProposalId) -> Result<ProposalRecord, Self::Error> {
        let url = self.proposal_url(id);
        debug!("Fetching proposal {} from {}", id, url);

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, &format!("proposal {}", id)).await?;
        let proposal: RegistryProposal = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("proposal {}: {}", id, e)))?;

        let record = proposal.into_record(id)?;
        info!(
            "Fetched proposal {} ({} chars of summary, registry digest {})",
            id,
            record.summary.len(),
            if record.expected_digest.is_some() { "present" } else { "absent" }
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u64) -> ProposalId {
        ProposalId::new(value).unwrap()
    }

    #[test]
    fn test_optional_arrays_unwrap() {
        let json = r#"{
            "id": 42,
            "summary": "Upgrade governance",
            "title": ["Upgrade"],
            "action": [],
            "repository": ["dfinity/ic"],
            "commit": [""],
            "wasm_module_hash": ["ABCD"],
            "arg_hash": [" 0FEE102BD16B053022B69F2C65FD5E2F41D150CE9C214AC8731CFAF496EBDA4E "]
        }"#;
        let proposal: RegistryProposal = serde_json::from_str(json).unwrap();
        let record = proposal.into_record(id(42)).unwrap();

        assert_eq!(record.title.as_deref(), Some("Upgrade"));
        assert_eq!(record.action, None);
        assert_eq!(record.repository_hint.as_deref(), Some("dfinity/ic"));
        assert_eq!(record.commit_hint, None);
        assert_eq!(record.expected_digest, None);
        assert_eq!(
            record.expected_arg_digest.as_deref(),
            Some("0FEE102BD16B053022B69F2C65FD5E2F41D150CE9C214AC8731CFAF496EBDA4E")
        );
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let proposal: RegistryProposal =
            serde_json::from_str(r#"{"id": 7, "summary": ""}"#).unwrap();
        let record = proposal.into_record(id(7)).unwrap();
        assert_eq!(record, ProposalRecord::new(id(7), ""));
    }

    #[test]
    fn test_mismatched_id_rejected() {
        let proposal: RegistryProposal =
            serde_json::from_str(r#"{"id": 8, "summary": "x"}"#).unwrap();
        assert!(matches!(
            proposal.into_record(id(7)),
            Err(SourceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_proposal_url() {
        let client = RegistryClient::new("http://localhost:4943/", &HttpSettings::default()).unwrap();
        assert_eq!(client.proposal_url(id(134039)), "http://localhost:4943/proposals/134039");
    }
}
