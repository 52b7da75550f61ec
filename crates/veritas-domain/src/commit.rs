//! Commit check results

use std::fmt;

/// Prefix of every successful status line
pub const SUCCESS_INDICATOR: &str = "✅";

/// Prefix of every failed status line
pub const FAILURE_INDICATOR: &str = "❌";

/// Lookup tier that produced a commit check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitTier {
    /// Primary commit-lookup service
    Primary,

    /// Secondary, browser-reachable lookup service
    Fallback,
}

impl CommitTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitTier::Primary => "primary",
            CommitTier::Fallback => "fallback",
        }
    }
}

impl fmt::Display for CommitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single commit lookup service reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitLookupOutcome {
    /// Whether the commit exists in the repository
    pub exists: bool,

    /// Short status text from the service
    pub status: String,
}

/// Final, one-shot result of checking a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitCheckResult {
    /// Repository checked (`owner/repo`)
    pub repository: String,

    /// Commit identifier checked
    pub commit: String,

    /// Whether the commit was found
    pub exists: bool,

    /// Tier that produced the answer
    pub tier: CommitTier,

    /// Human-readable detail
    pub detail: String,
}

impl CommitCheckResult {
    /// Render the user-visible status line
    ///
    /// Successful results start with [`SUCCESS_INDICATOR`].
    pub fn status_line(&self) -> String {
        let indicator = if self.exists {
            SUCCESS_INDICATOR
        } else {
            FAILURE_INDICATOR
        };
        format!(
            "{} {}@{} ({}): {}",
            indicator, self.repository, self.commit, self.tier, self.detail
        )
    }
}
