//! Fetch command implementation.

use super::{load_proposal, proposal_id, session};
use crate::cli::FetchArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tracing::info;

/// Execute the fetch command.
pub async fn execute_fetch(args: FetchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let id = proposal_id(args.id)?;
    let mut session = session(config)?;
    load_proposal(&mut session, config, id, args.no_dashboard).await?;

    let evidence = session
        .evidence()
        .ok_or_else(|| CliError::InvalidInput(format!("Proposal {} not loaded", id)))?;
    info!("Fetched proposal {} ({})", id, evidence.kind);

    println!("{}", formatter.format_evidence(evidence)?);
    if formatter.format() == OutputFormat::Table && !session.documents().is_empty() {
        println!("{}", formatter.format_documents(session.documents())?);
    }
    Ok(())
}
