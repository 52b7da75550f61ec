//! Document download with allow-list and proxy fallback
//!
//! Order of attempts for one URL:
//!
//! 1. direct fetch
//! 2. host on the allow-list: the direct failure is reported as is, since
//!    the host is known to serve direct downloads
//! 3. otherwise the configured proxy, once
//! 4. otherwise `AccessRestricted` with guidance to download and upload

use crate::http::{content_type, ensure_success, HttpSettings};
use crate::SourceError;
use reqwest::Url;
use tracing::{debug, warn};
use veritas_domain::traits::{DocumentFetcher, FetchedDocument};

/// Guidance given when a host cannot be reached by any path
pub const UPLOAD_GUIDANCE: &str =
    "download the file in your browser and verify it with the upload option instead";

/// HTTP document fetcher
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
    allowed_hosts: Vec<String>,
    proxy_url: Option<String>,
}

impl HttpDocumentFetcher {
    /// Create a fetcher with an empty allow-list and no proxy
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceError> {
        Ok(Self {
            client: settings.client()?,
            allowed_hosts: Vec::new(),
            proxy_url: None,
        })
    }

    /// Hosts known to permit direct download (sub-domains included)
    pub fn with_allowed_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_hosts = hosts
            .into_iter()
            .map(|h| h.into().trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    /// Proxy endpoint; the target is passed as the `url` query parameter
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Whether `host` is on the direct-download allow-list
    pub fn is_allowed(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed_hosts.iter().any(|allowed| {
            host == *allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    async fn fetch_direct(&self, url: &Url) -> Result<FetchedDocument, SourceError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = ensure_success(response, url.as_str()).await?;
        read_document(response).await
    }

    async fn fetch_via_proxy(&self, proxy: &str, url: &Url) -> Result<FetchedDocument, SourceError> {
        let response = self
            .client
            .get(proxy)
            .query(&[("url", url.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, url.as_str()).await?;
        read_document(response).await
    }
}

async fn read_document(response: reqwest::Response) -> Result<FetchedDocument, SourceError> {
    let final_url = response.url().to_string();
    let content_type = content_type(&response);
    let bytes = response.bytes().await?.to_vec();
    Ok(FetchedDocument {
        bytes,
        content_type,
        final_url,
    })
}

impl DocumentFetcher for HttpDocumentFetcher {
    type Error = SourceError;

    async fn fetch(&self, url: &str) -> Result<FetchedDocument, Self::Error> {
        let parsed = Url::parse(url)
            .map_err(|e| SourceError::InvalidResponse(format!("invalid document URL {}: {}", url, e)))?;
        let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

        let direct_error = match self.fetch_direct(&parsed).await {
            Ok(doc) => {
                debug!("Fetched {} bytes directly from {}", doc.bytes.len(), host);
                return Ok(doc);
            }
            Err(err) => err,
        };

        if self.is_allowed(&host) {
            warn!("Direct fetch from allow-listed host {} failed: {}", host, direct_error);
            return Err(direct_error);
        }

        if let Some(proxy) = &self.proxy_url {
            match self.fetch_via_proxy(proxy, &parsed).await {
                Ok(doc) => {
                    debug!("Fetched {} bytes via proxy for {}", doc.bytes.len(), host);
                    return Ok(doc);
                }
                Err(err) => warn!("Proxy fetch for {} failed: {}", host, err),
            }
        }

        Err(SourceError::AccessRestricted {
            host,
            guidance: UPLOAD_GUIDANCE.to_string(),
        })
    }
}
