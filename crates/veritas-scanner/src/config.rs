//! Configuration for the Scanner

use serde::{Deserialize, Serialize};

/// Configuration for the evidence scanner
///
/// Marker lists are ordered by priority: earlier markers win when several
/// occur in the same text. The order is used exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Labels that introduce the expected module digest, highest priority first
    pub digest_markers: Vec<String>,

    /// Labels that introduce the expected argument digest, highest priority first
    pub arg_digest_markers: Vec<String>,

    /// Labels that introduce a commit identifier
    pub commit_markers: Vec<String>,

    /// Characters searched before a marker occurrence
    pub window_before: usize,

    /// Characters searched after a marker occurrence
    pub window_after: usize,

    /// File extensions that identify a URL as a document reference
    pub document_extensions: Vec<String>,

    /// Maximum input text length (characters)
    pub max_text_length: usize,
}

impl ScannerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.window_before == 0 && self.window_after == 0 {
            return Err("window_before and window_after cannot both be 0".to_string());
        }
        if self.digest_markers.is_empty() {
            return Err("digest_markers must not be empty".to_string());
        }
        if let Some(blank) = self
            .digest_markers
            .iter()
            .chain(&self.arg_digest_markers)
            .chain(&self.commit_markers)
            .find(|m| m.trim().is_empty())
        {
            return Err(format!("marker {:?} is blank", blank));
        }
        Ok(())
    }
}

impl Default for ScannerConfig {
    /// Default configuration with the standard marker priority
    fn default() -> Self {
        Self {
            digest_markers: strings(&[
                "wasm module hash",
                "module hash",
                "wasm hash",
                "wasm sha256",
                "expected hash",
                "sha256",
                "sha-256",
                "hash",
            ]),
            arg_digest_markers: strings(&[
                "arg hash",
                "argument hash",
                "args hash",
                "arg_hash",
                "argument sha256",
            ]),
            commit_markers: strings(&["git commit", "commit"]),
            window_before: 600,
            window_after: 1200,
            document_extensions: strings(&["pdf", "md", "txt", "json", "csv", "docx", "html"]),
            max_text_length: 200_000,
        }
    }
}

impl ScannerConfig {
    /// Strict preset: narrow windows, only explicit module labels
    pub fn strict() -> Self {
        Self {
            digest_markers: strings(&["wasm module hash", "module hash", "wasm hash"]),
            window_before: 200,
            window_after: 400,
            ..Self::default()
        }
    }

    /// Lenient preset: wide windows for long, loosely formatted summaries
    pub fn lenient() -> Self {
        Self {
            window_before: 1500,
            window_after: 3000,
            max_text_length: 1_000_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
