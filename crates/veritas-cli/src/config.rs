//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use veritas_scanner::ScannerConfig;
use veritas_sources::HttpSettings;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Repository assumed when a command names only a commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repository: Option<String>,

    /// Service endpoints
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Document download settings
    #[serde(default)]
    pub documents: DocumentSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Summary scanner tuning
    #[serde(default)]
    pub scanner: ScannerConfig,
}

/// Endpoints of the services queried during an audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Proposal registry base URL
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Dashboard base URL; no secondary digests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,

    /// Primary commit status service base URL
    #[serde(default = "default_commit_status")]
    pub commit_status: String,

    /// Fallback source-host API base URL
    #[serde(default = "default_github_api")]
    pub github_api: String,
}

/// Where documents may be downloaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Hosts known to allow direct download
    #[serde(default)]
    pub allowed_hosts: Vec<String>,

    /// Proxy used for other hosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// HTTP timeout in seconds; none when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".veritas").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.scanner.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// HTTP client settings derived from this configuration.
    pub fn http_settings(&self) -> HttpSettings {
        let settings = HttpSettings::default();
        match self.settings.timeout_secs {
            Some(secs) => settings.with_timeout(Duration::from_secs(secs)),
            None => settings,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            dashboard: None,
            commit_status: default_commit_status(),
            github_api: default_github_api(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            timeout_secs: None,
        }
    }
}

fn default_registry() -> String {
    "http://localhost:8080".to_string()
}

fn default_commit_status() -> String {
    "http://localhost:8080".to_string()
}

fn default_github_api() -> String {
    veritas_sources::commit::GITHUB_API_BASE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
