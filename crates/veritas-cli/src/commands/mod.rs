//! Command implementations.

pub mod audit;
pub mod commit;
pub mod config;
pub mod fetch;
pub mod hash;
pub mod scan;

pub use self::audit::execute_audit;
pub use self::commit::execute_commit;
pub use self::config::execute_config;
pub use self::fetch::execute_fetch;
pub use self::hash::execute_hash;
pub use self::scan::execute_scan;

use crate::config::Config;
use crate::error::{CliError, Result};
use std::io::Read;
use veritas_audit::{AuditSession, CommitVerifier};
use veritas_domain::ProposalId;
use veritas_scanner::EvidenceScanner;
use veritas_sources::{
    CommitStatusClient, DashboardClient, GithubCommitClient, HttpDocumentFetcher, RegistryClient,
};

/// Commit verifier wired to the configured services.
pub type HttpCommitVerifier = CommitVerifier<CommitStatusClient, GithubCommitClient>;

pub(crate) fn proposal_id(value: u64) -> Result<ProposalId> {
    ProposalId::new(value)
        .ok_or_else(|| CliError::InvalidInput("Proposal id must be a positive integer".to_string()))
}

pub(crate) fn session(config: &Config) -> Result<AuditSession> {
    Ok(AuditSession::new(EvidenceScanner::new(config.scanner.clone())?))
}

pub(crate) fn registry(config: &Config) -> Result<RegistryClient> {
    Ok(RegistryClient::new(
        &config.endpoints.registry,
        &config.http_settings(),
    )?)
}

/// Dashboard client, unless disabled or not configured.
pub(crate) fn dashboard(config: &Config, disabled: bool) -> Result<Option<DashboardClient>> {
    match (&config.endpoints.dashboard, disabled) {
        (Some(url), false) => Ok(Some(DashboardClient::new(url, &config.http_settings())?)),
        _ => Ok(None),
    }
}

pub(crate) fn commit_verifier(config: &Config) -> Result<HttpCommitVerifier> {
    let settings = config.http_settings();
    let primary = CommitStatusClient::new(&config.endpoints.commit_status, &settings)?;
    let fallback = GithubCommitClient::with_base_url(&config.endpoints.github_api, &settings)?;
    Ok(CommitVerifier::new(primary, fallback))
}

pub(crate) fn document_fetcher(config: &Config) -> Result<HttpDocumentFetcher> {
    let fetcher = HttpDocumentFetcher::new(&config.http_settings())?
        .with_allowed_hosts(config.documents.allowed_hosts.iter().cloned());
    Ok(match &config.documents.proxy_url {
        Some(proxy) => fetcher.with_proxy(proxy.clone()),
        None => fetcher,
    })
}

/// Read a whole file, or stdin when no path is given.
pub(crate) fn read_text(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Load proposal `id` into `session` from the configured services.
pub(crate) async fn load_proposal(
    session: &mut AuditSession,
    config: &Config,
    id: ProposalId,
    no_dashboard: bool,
) -> Result<()> {
    let registry = registry(config)?;
    match dashboard(config, no_dashboard)? {
        Some(dashboard) => {
            session
                .load_proposal_with_hints(&registry, &dashboard, id)
                .await?;
        }
        None => {
            session.load_proposal(&registry, id).await?;
        }
    }
    Ok(())
}
