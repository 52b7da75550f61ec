//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audit action error
    #[error(transparent)]
    Audit(#[from] veritas_audit::AuditError),

    /// External service error
    #[error(transparent)]
    Source(#[from] veritas_sources::SourceError),

    /// Summary scanning error
    #[error(transparent)]
    Scanner(#[from] veritas_scanner::ScannerError),

    /// Byte decoding error
    #[error(transparent)]
    Codec(#[from] veritas_codec::CodecError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
