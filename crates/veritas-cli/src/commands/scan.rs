//! Scan command implementation.

use super::read_text;
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use veritas_scanner::{EvidenceScanner, ScannerConfig, SummaryEvidence};

/// Execute the scan command.
pub async fn execute_scan(args: ScanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_text(args.file.as_deref())?;
    let scanner_config = args.preset.map(ScannerConfig::from).unwrap_or_else(|| config.scanner.clone());
    let evidence = scan_text(&text, scanner_config)?;

    println!("{}", formatter.format_scan(&evidence)?);
    if evidence.structured_syntax {
        eprintln!(
            "{}",
            formatter.info("Summary embeds a structured value; arguments may need encoding before hashing")
        );
    }
    Ok(())
}

/// Scan `text` with a scanner built from `config`.
pub fn scan_text(text: &str, config: ScannerConfig) -> Result<SummaryEvidence> {
    Ok(EvidenceScanner::new(config)?.scan(text)?)
}
