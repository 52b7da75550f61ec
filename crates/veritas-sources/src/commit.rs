//! Commit lookup services
//!
//! Two independent services answer "does this commit exist?". The primary
//! one is a purpose-built status endpoint; the fallback is the public
//! source-host API, which can also be reached from a browser.

use crate::http::{trim_base, HttpSettings};
use crate::SourceError;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use veritas_domain::traits::CommitLookup;
use veritas_domain::CommitLookupOutcome;

/// Default base URL of the public source-host API
pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    exists: bool,
    #[serde(default)]
    status: String,
}

/// Primary commit lookup: `GET {base}/commits/status?repository=..&commit=..`
///
/// Answers `{"exists": bool, "status": "..."}`.
#[derive(Debug, Clone)]
pub struct CommitStatusClient {
    base_url: String,
    client: reqwest::Client,
}

impl CommitStatusClient {
    /// Create a primary commit lookup client
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: trim_base(base_url),
            client: settings.client()?,
        })
    }
}

impl CommitLookup for CommitStatusClient {
    type Error = SourceError;

    async fn lookup(
        &self,
        repository: &str,
        commit: &str,
    ) -> Result<CommitLookupOutcome, Self::Error> {
        debug!("Primary commit lookup for {}@{}", repository, commit);

        let response = self
            .client
            .get(format!("{}/commits/status", self.base_url))
            .query(&[("repository", repository), ("commit", commit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::NetworkUnavailable(format!(
                "commit status service answered HTTP {}",
                response.status()
            )));
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("commit status: {}", e)))?;

        let status = if body.status.trim().is_empty() {
            default_status(body.exists).to_string()
        } else {
            body.status
        };
        Ok(CommitLookupOutcome {
            exists: body.exists,
            status,
        })
    }
}

/// Fallback commit lookup against the public source-host API
///
/// `GET {base}/repos/{owner}/{repo}/commits/{commit}`: a body with a `sha`
/// field means the commit exists, HTTP 404 or 422 means it does not.
#[derive(Debug, Clone)]
pub struct GithubCommitClient {
    base_url: String,
    client: reqwest::Client,
}

impl GithubCommitClient {
    /// Create a fallback client against the public API
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceError> {
        Self::with_base_url(GITHUB_API_BASE, settings)
    }

    /// Create a fallback client against another API base (tests, mirrors)
    pub fn with_base_url(
        base_url: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: trim_base(base_url),
            client: settings.client()?,
        })
    }

    fn commit_url(&self, repository: &str, commit: &str) -> String {
        format!("{}/repos/{}/commits/{}", self.base_url, repository, commit)
    }
}

impl CommitLookup for GithubCommitClient {
    type Error = SourceError;

    async fn lookup(
        &self,
        repository: &str,
        commit: &str,
    ) -> Result<CommitLookupOutcome, Self::Error> {
        debug!("Fallback commit lookup for {}@{}", repository, commit);

        let response = self
            .client
            .get(self.commit_url(repository, commit))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                return Ok(CommitLookupOutcome {
                    exists: false,
                    status: default_status(false).to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(SourceError::NetworkUnavailable(format!(
                    "source host answered HTTP {}",
                    status
                )))
            }
            _ => {}
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("commit lookup: {}", e)))?;
        let exists = body.get("sha").and_then(|sha| sha.as_str()).is_some();

        Ok(CommitLookupOutcome {
            exists,
            status: default_status(exists).to_string(),
        })
    }
}

fn default_status(exists: bool) -> &'static str {
    if exists {
        "commit found"
    } else {
        "commit not found"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_url() {
        let client = GithubCommitClient::with_base_url("http://127.0.0.1:9000/", &HttpSettings::default())
            .unwrap();
        assert_eq!(
            client.commit_url("dfinity/ic", "abc1234"),
            "http://127.0.0.1:9000/repos/dfinity/ic/commits/abc1234"
        );
    }

    #[test]
    fn test_default_base_is_public_api() {
        let client = GithubCommitClient::new(&HttpSettings::default()).unwrap();
        assert!(client.commit_url("a/b", "c").starts_with(GITHUB_API_BASE));
    }

    #[test]
    fn test_status_response_without_status_text() {
        let body: StatusResponse = serde_json::from_str(r#"{"exists": true}"#).unwrap();
        assert!(body.exists);
        assert!(body.status.is_empty());
    }
}
