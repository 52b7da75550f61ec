//! Core EvidenceScanner implementation

use crate::config::ScannerConfig;
use crate::error::ScannerError;
use crate::markers::{self, Window};
use crate::syntax::detect_structured_syntax;
use crate::types::SummaryEvidence;
use crate::urls::{find_urls, url_end};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use veritas_domain::DocumentRef;

static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)")
        .expect("valid repository regex")
});

static COMMIT_IN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:commit|commits|tree)/([0-9a-fA-F]{7,40})\b").expect("valid commit URL regex")
});

static COMMIT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{40}\b").expect("valid commit regex"));

static ARTIFACT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z0-9_.-]+/)*[A-Za-z0-9_.-]+\.(?:wasm\.gz|wasm|tar\.zst|tar\.gz)\b")
        .expect("valid artifact path regex")
});

/// Owners that appear in GitHub URLs but are not repositories
const NON_REPO_OWNERS: &[&str] = &["orgs", "settings", "marketplace", "sponsors", "topics"];

/// The EvidenceScanner mines proposal text for verification evidence
///
/// The scanner is stateless apart from its configuration and may be shared
/// between concurrent callers.
#[derive(Debug, Clone)]
pub struct EvidenceScanner {
    config: ScannerConfig,
}

impl EvidenceScanner {
    /// Create a scanner, validating the configuration
    pub fn new(config: ScannerConfig) -> Result<Self, ScannerError> {
        config.validate().map_err(ScannerError::Config)?;
        Ok(Self { config })
    }

    /// Create a scanner with the default configuration
    pub fn default_config() -> Self {
        Self {
            config: ScannerConfig::default(),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn window(&self) -> Window {
        Window {
            before: self.config.window_before,
            after: self.config.window_after,
        }
    }

    /// Scan a proposal summary for all supported evidence
    pub fn scan(&self, text: &str) -> Result<SummaryEvidence, ScannerError> {
        let length = text.chars().count();
        if length > self.config.max_text_length {
            warn!(
                "Refusing to scan {} chars (max {})",
                length, self.config.max_text_length
            );
            return Err(ScannerError::TextTooLong(length, self.config.max_text_length));
        }

        let urls = find_urls(text);
        let documents = self.find_documents(text, &urls);
        let expected_arg_digest = self.find_arg_digest(text);
        let expected_digest = self
            .find_expected_digest(text)
            .filter(|d| Some(d) != expected_arg_digest.as_ref())
            .filter(|d| !documents.iter().any(|doc| doc.expected_hash.as_ref() == Some(d)));

        let evidence = SummaryEvidence {
            repository: find_repository(&urls),
            commit: self.find_commit(text, &urls),
            artifact_path: find_artifact_path(text),
            structured_syntax: detect_structured_syntax(text),
            urls,
            documents,
            expected_digest,
            expected_arg_digest,
        };

        info!(
            "Scanned summary: {} urls, {} documents, digest {}, commit {}",
            evidence.urls.len(),
            evidence.documents.len(),
            if evidence.expected_digest.is_some() { "found" } else { "missing" },
            evidence.commit.as_deref().unwrap_or("missing"),
        );

        Ok(evidence)
    }

    /// Expected module digest, falling back to the first digest in the text
    pub fn find_expected_digest(&self, text: &str) -> Option<String> {
        markers::find_digest_near_markers_in(text, &self.config.digest_markers, self.window())
    }

    /// Expected argument digest; only labelled digests are accepted
    pub fn find_arg_digest(&self, text: &str) -> Option<String> {
        markers::find_labelled_digest(text, &self.config.arg_digest_markers, self.window())
    }

    /// Commit identifier from a commit/tree URL, else near a commit marker
    pub fn find_commit(&self, text: &str, urls: &[String]) -> Option<String> {
        let from_url = urls.iter().find_map(|url| {
            COMMIT_IN_URL
                .captures(url)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_ascii_lowercase())
        });
        if from_url.is_some() {
            return from_url;
        }

        markers::find_labelled_token(&COMMIT_TOKEN, text, &self.config.commit_markers, self.window())
            .map(|c| c.to_ascii_lowercase())
    }

    /// URLs that point at documents, with the digest stated on the same line
    pub fn find_documents(&self, text: &str, urls: &[String]) -> Vec<DocumentRef> {
        urls.iter()
            .filter_map(|url| {
                let name = document_name(url, &self.config.document_extensions)?;
                let expected_hash = url_end(text, url).and_then(|end| {
                    let rest = &text[end..];
                    let line = rest.split('\n').next().unwrap_or(rest);
                    markers::first_digest(line)
                });
                debug!("Document reference {} (hash stated: {})", name, expected_hash.is_some());
                Some(DocumentRef {
                    name,
                    url: Some(url.clone()),
                    expected_hash,
                })
            })
            .collect()
    }
}

impl Default for EvidenceScanner {
    fn default() -> Self {
        Self::default_config()
    }
}

/// First GitHub repository referenced, as `owner/repo`
pub fn find_repository(urls: &[String]) -> Option<String> {
    urls.iter().find_map(|url| {
        let caps = GITHUB_REPO.captures(url)?;
        let owner = caps.get(1)?.as_str();
        let repo = caps.get(2)?.as_str();
        if NON_REPO_OWNERS.contains(&owner) {
            return None;
        }
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        Some(format!("{}/{}", owner, repo))
    })
}

/// First build artifact path mentioned in the text
pub fn find_artifact_path(text: &str) -> Option<String> {
    ARTIFACT_PATH.find(text).map(|m| m.as_str().to_string())
}

/// File name of `url` if its extension marks it as a document
fn document_name(url: &str, extensions: &[String]) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (_, after_scheme) = path.split_once("://")?;
    let (_, path) = after_scheme.split_once('/')?;
    let name = path.rsplit('/').next().filter(|n| !n.is_empty())?;
    let (_, ext) = name.rsplit_once('.')?;
    extensions
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
        .then(|| name.to_string())
}
