//! Veritas Codec
//!
//! Byte-level building blocks for digest verification:
//!
//! - [`hex_codec`]: hex text to bytes and back
//! - [`blob`]: escaped blob literals printed by canister tooling
//! - [`digest`]: SHA-256 and case-insensitive digest comparison
//!
//! All functions are pure; nothing here performs I/O.
//!
//! # Example
//!
//! ```
//! use veritas_codec::{blob, digest, hex_codec};
//!
//! let bytes = blob::parse(r"DIDL\00\00").unwrap();
//! let computed = digest::digest(&bytes);
//! assert!(digest::matches(Some(&computed), Some(&digest::digest(&hex_codec::decode("4449444c0000").unwrap()))));
//! ```

#![warn(missing_docs)]

pub mod blob;
pub mod digest;
mod error;
pub mod hex_codec;

pub use error::CodecError;
pub use veritas_domain::is_digest_hex as is_sha256_hex;
