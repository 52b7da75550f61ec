//! Error types for byte codecs

use thiserror::Error;

/// Errors raised while decoding user-supplied byte representations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed hex input
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Unparsable escaped-blob literal
    #[error("Malformed blob at offset {offset}: {reason}")]
    MalformedBlob {
        /// Character offset of the offending escape
        offset: usize,
        /// What was wrong
        reason: String,
    },
}
