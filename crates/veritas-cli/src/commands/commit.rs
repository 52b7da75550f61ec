//! Commit command implementation.

use super::commit_verifier;
use crate::cli::CommitArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the commit command.
pub async fn execute_commit(args: CommitArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let repository = resolve_repository(args.repository, config)?;
    let verifier = commit_verifier(config)?;

    let result = verifier.verify(&repository, &args.commit).await;
    println!("{}", formatter.format_commit(&result)?);
    Ok(())
}

/// Repository from the command line, else the configured default
fn resolve_repository(explicit: Option<String>, config: &Config) -> Result<String> {
    explicit
        .or_else(|| config.default_repository.clone())
        .ok_or_else(|| {
            CliError::InvalidInput(
                "No repository given; pass --repository or set default_repository".to_string(),
            )
        })
}
