//! Two-tier commit existence check
//!
//! The check is a small state machine:
//!
//! ```text
//! Unchecked → PrimaryPending ─ exists ─────────────────────────→ Resolved
//!                   └─ missing / error → PrimaryFailed → FallbackPending → Resolved
//! ```
//!
//! Tiers run strictly in sequence. The fallback is queried exactly once and
//! only after the primary has answered "missing" or failed; nothing is
//! retried.

use std::fmt::Display;
use tracing::{debug, info};
use veritas_domain::traits::CommitLookup;
use veritas_domain::{CommitCheckResult, CommitTier};

/// Shortest accepted commit prefix
pub const MIN_COMMIT_LEN: usize = 7;

/// Full commit identifier length
pub const MAX_COMMIT_LEN: usize = 40;

/// States of one commit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitCheckState {
    /// Nothing asked yet
    Unchecked,

    /// Waiting on the primary service
    PrimaryPending,

    /// Primary reported the commit missing or could not be reached
    PrimaryFailed {
        /// What the primary said
        detail: String,
    },

    /// Waiting on the fallback service
    FallbackPending {
        /// What the primary said
        primary_detail: String,
    },

    /// Final answer
    Resolved(CommitCheckResult),
}

impl CommitCheckState {
    /// Whether the check has finished
    pub fn is_resolved(&self) -> bool {
        matches!(self, CommitCheckState::Resolved(_))
    }
}

/// Checks commit existence with a primary and a fallback lookup
pub struct CommitVerifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> CommitVerifier<P, F>
where
    P: CommitLookup,
    F: CommitLookup,
    P::Error: Display,
    F::Error: Display,
{
    /// Create a verifier from two lookup services
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// The primary lookup service
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// The fallback lookup service
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Check whether `commit` exists in `repository` (`owner/repo`)
    ///
    /// Malformed input resolves immediately as not found without querying
    /// either service.
    pub async fn verify(&self, repository: &str, commit: &str) -> CommitCheckResult {
        let repository = repository.trim();
        let commit = commit.trim().to_ascii_lowercase();

        if let Err(problem) = validate_target(repository, &commit) {
            debug!("Rejected commit target {}@{}: {}", repository, commit, problem);
            return resolved(repository, &commit, false, CommitTier::Primary, problem);
        }

        let mut state = CommitCheckState::Unchecked;
        loop {
            state = match state {
                CommitCheckState::Resolved(result) => {
                    info!("{}", result.status_line());
                    return result;
                }
                other => self.step(other, repository, &commit).await,
            };
        }
    }

    /// Advance the state machine by one transition
    async fn step(&self, state: CommitCheckState, repository: &str, commit: &str) -> CommitCheckState {
        match state {
            CommitCheckState::Unchecked => CommitCheckState::PrimaryPending,

            CommitCheckState::PrimaryPending => match self.primary.lookup(repository, commit).await {
                Ok(outcome) if outcome.exists => CommitCheckState::Resolved(resolved(
                    repository,
                    commit,
                    true,
                    CommitTier::Primary,
                    outcome.status,
                )),
                Ok(outcome) => CommitCheckState::PrimaryFailed {
                    detail: outcome.status,
                },
                Err(err) => CommitCheckState::PrimaryFailed {
                    detail: format!("primary lookup failed: {}", err),
                },
            },

            CommitCheckState::PrimaryFailed { detail } => {
                debug!("Primary lookup negative ({}); trying fallback", detail);
                CommitCheckState::FallbackPending {
                    primary_detail: detail,
                }
            }

            CommitCheckState::FallbackPending { primary_detail } => {
                let (exists, detail) = match self.fallback.lookup(repository, commit).await {
                    Ok(outcome) => (outcome.exists, outcome.status),
                    Err(err) => (false, format!("fallback lookup failed: {}", err)),
                };
                CommitCheckState::Resolved(resolved(
                    repository,
                    commit,
                    exists,
                    CommitTier::Fallback,
                    format!("{} (primary: {})", detail, primary_detail),
                ))
            }

            resolved @ CommitCheckState::Resolved(_) => resolved,
        }
    }
}

fn resolved(
    repository: &str,
    commit: &str,
    exists: bool,
    tier: CommitTier,
    detail: impl Into<String>,
) -> CommitCheckResult {
    CommitCheckResult {
        repository: repository.to_string(),
        commit: commit.to_string(),
        exists,
        tier,
        detail: detail.into(),
    }
}

/// Check `owner/repo` shape and a 7 to 40 character hex commit
pub fn validate_target(repository: &str, commit: &str) -> Result<(), String> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    match repository.split_once('/') {
        Some((owner, repo)) if valid_part(owner) && valid_part(repo) => {}
        _ => return Err(format!("invalid repository '{}': expected owner/repo", repository)),
    }

    if !(MIN_COMMIT_LEN..=MAX_COMMIT_LEN).contains(&commit.len())
        || !commit.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(format!(
            "invalid commit '{}': expected {} to {} hex characters",
            commit, MIN_COMMIT_LEN, MAX_COMMIT_LEN
        ));
    }
    Ok(())
}
