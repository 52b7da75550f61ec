//! Hash command implementation.

use super::read_text;
use crate::cli::{HashArgs, InputKindArg};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use veritas_codec::{blob, digest, hex_codec, is_sha256_hex};
use veritas_scanner::detect_structured_syntax;

/// Execute the hash command.
pub async fn execute_hash(args: HashArgs, formatter: &Formatter) -> Result<()> {
    if let Some(expected) = &args.expected {
        if !is_sha256_hex(expected) {
            return Err(CliError::InvalidInput(format!(
                "Expected digest must be 64 hex characters, got '{}'",
                expected
            )));
        }
    }

    let bytes = match args.kind {
        InputKindArg::File => {
            let path = args.file.as_deref().or(args.input.as_deref()).ok_or_else(|| {
                CliError::InvalidInput("A file path is required with --kind file".to_string())
            })?;
            std::fs::read(path)?
        }
        kind => {
            let input = match &args.input {
                Some(input) => input.clone(),
                None => trim_line_ending(read_text(args.file.as_deref())?),
            };
            if kind == InputKindArg::Text && detect_structured_syntax(&input) {
                eprintln!(
                    "{}",
                    formatter.warning("Input looks like a structured value; hashing it as plain text")
                );
            }
            decode(kind, &input)?
        }
    };

    let computed = digest::digest(&bytes);
    let matched = digest::matches(Some(&computed), args.expected.as_deref());
    let source = format!("{:?} ({} bytes)", args.kind, bytes.len()).to_lowercase();

    println!(
        "{}",
        formatter.format_digest(&source, &computed, args.expected.as_deref(), matched)?
    );
    Ok(())
}

/// Bytes denoted by `input` under `kind`
pub fn decode(kind: InputKindArg, input: &str) -> Result<Vec<u8>> {
    match kind {
        InputKindArg::Text => Ok(input.as_bytes().to_vec()),
        InputKindArg::Hex => Ok(hex_codec::decode(input)?),
        InputKindArg::Blob => Ok(blob::payload_from_tool_output(input).and_then(blob::parse)?),
        InputKindArg::File => Err(CliError::InvalidInput(
            "File input is read as raw bytes".to_string(),
        )),
    }
}

/// Drop the line ending shells append to piped input
fn trim_line_ending(mut text: String) -> String {
    let trimmed = text.trim_end_matches(['\r', '\n']).len();
    text.truncate(trimmed);
    text
}
