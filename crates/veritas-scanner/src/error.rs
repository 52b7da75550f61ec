//! Error types for the Scanner

use thiserror::Error;

/// Errors that can occur while scanning proposal text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScannerError {
    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
