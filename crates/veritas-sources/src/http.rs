//! Shared HTTP client settings and response helpers

use crate::SourceError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("veritas/", env!("CARGO_PKG_VERSION"));

/// Client settings shared by all adapters
///
/// No timeout is applied unless configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout
    pub timeout: Option<Duration>,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest` client from these settings
    pub fn client(&self) -> Result<reqwest::Client, SourceError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| SourceError::NetworkUnavailable(format!("HTTP client setup failed: {}", e)))
    }
}

/// Strip trailing slashes so paths can be appended with `/`
pub(crate) fn trim_base(base_url: impl Into<String>) -> String {
    let base = base_url.into();
    base.trim_end_matches('/').to_string()
}

/// Turn a non-success status into an error, passing successes through
pub(crate) async fn ensure_success(response: Response, what: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(what.to_string()));
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SourceError::NetworkUnavailable(format!(
        "HTTP {} for {}: {}",
        status,
        what,
        truncate(&body, 200)
    )))
}

/// `Content-Type` header of a response, if present and readable
pub(crate) fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_have_no_timeout() {
        let settings = HttpSettings::default();
        assert!(settings.timeout.is_none());
        assert!(settings.user_agent.starts_with("veritas/"));
        assert!(settings.client().is_ok());
    }

    #[test]
    fn test_with_timeout() {
        let settings = HttpSettings::default().with_timeout(Duration::from_secs(5));
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
        assert!(settings.client().is_ok());
    }

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("https://api.example.org///"), "https://api.example.org");
        assert_eq!(trim_base("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
