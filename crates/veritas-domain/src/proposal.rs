//! Proposal evidence - everything known about one fetched proposal

use crate::digest::is_digest_hex;
use std::fmt;

/// Identifier of a governance proposal
///
/// Proposal identifiers are strictly positive; zero is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId(u64);

impl ProposalId {
    /// Create a proposal id, rejecting zero
    ///
    /// # Examples
    ///
    /// ```
    /// use veritas_domain::ProposalId;
    ///
    /// assert!(ProposalId::new(134_039).is_some());
    /// assert!(ProposalId::new(0).is_none());
    /// ```
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Get the raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProposalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|e| format!("Invalid proposal id '{}': {}", s, e))?;
        Self::new(value).ok_or_else(|| "Proposal id must be a positive integer".to_string())
    }
}

/// Classification of a proposal by the action it performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProposalKind {
    /// Upgrade or reinstall of a protocol-managed canister
    ProtocolCanisterManagement,

    /// Generic code installation into a canister
    InstallCode,

    /// Election of a new replica / OS version
    ElectReplicaVersion,

    /// Text-only motion, no artifacts
    Motion,

    /// Anything not recognised
    #[default]
    Unknown,
}

impl ProposalKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalKind::ProtocolCanisterManagement => "protocol-canister-management",
            ProposalKind::InstallCode => "install-code",
            ProposalKind::ElectReplicaVersion => "elect-replica-version",
            ProposalKind::Motion => "motion",
            ProposalKind::Unknown => "unknown",
        }
    }

    /// Classify an upstream action or topic label
    ///
    /// Matching ignores case and punctuation, so `"InstallCode"`,
    /// `"install_code"` and `"Install Code"` are the same label.
    pub fn from_action(action: &str) -> Self {
        let normalized: String = action
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "protocolcanistermanagement" | "nnscanisterupgrade" | "upgradeprotocolcanister" => {
                ProposalKind::ProtocolCanisterManagement
            }
            "installcode" | "nnscanisterinstall" => ProposalKind::InstallCode,
            "electreplicaversion"
            | "updateelectedreplicaversions"
            | "reviseelectedguestosversions"
            | "reviseelectedhostosversions"
            | "icosversionelection" => ProposalKind::ElectReplicaVersion,
            "motion" => ProposalKind::Motion,
            _ => ProposalKind::Unknown,
        }
    }

    /// Whether proposals of this kind carry a binary artifact to rebuild
    pub fn has_artifact(&self) -> bool {
        !matches!(self, ProposalKind::Motion)
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source supplied an expected digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestProvenance {
    /// The proposal registry itself
    Registry,

    /// The secondary dashboard digest source
    Dashboard,

    /// Scanned out of the free-form summary text
    SummaryHeuristic,
}

impl DigestProvenance {
    /// Stable tag for display and serialization
    pub fn tag(&self) -> &'static str {
        match self {
            DigestProvenance::Registry => "registry",
            DigestProvenance::Dashboard => "dashboard",
            DigestProvenance::SummaryHeuristic => "summary-heuristic",
        }
    }
}

impl fmt::Display for DigestProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A document referenced by the proposal summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Display name (usually the file name)
    pub name: String,

    /// Where the document can be fetched
    pub url: Option<String>,

    /// Expected SHA-256 digest, if the summary states one
    pub expected_hash: Option<String>,
}

/// Proposal data as returned by the upstream evidence source
///
/// Optional upstream fields are already unwrapped into `Option` by the
/// boundary adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRecord {
    /// Proposal identifier
    pub id: ProposalId,

    /// Proposal title
    pub title: Option<String>,

    /// Raw summary text
    pub summary: String,

    /// Action or topic label used for classification
    pub action: Option<String>,

    /// Repository hint extracted upstream
    pub repository_hint: Option<String>,

    /// Commit hint extracted upstream
    pub commit_hint: Option<String>,

    /// Expected module digest reported by the registry
    pub expected_digest: Option<String>,

    /// Expected argument digest reported by the registry
    pub expected_arg_digest: Option<String>,
}

impl ProposalRecord {
    /// Create a record with only the required fields set
    pub fn new(id: ProposalId, summary: impl Into<String>) -> Self {
        Self {
            id,
            title: None,
            summary: summary.into(),
            action: None,
            repository_hint: None,
            commit_hint: None,
            expected_digest: None,
            expected_arg_digest: None,
        }
    }
}

/// Digests reported by a secondary digest source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestHints {
    /// Expected module digest
    pub wasm_hash: Option<String>,

    /// Expected argument digest
    pub arg_hash: Option<String>,
}

/// Everything known about one fetched proposal
///
/// Created once per fetch. Digest fields are filled progressively: a later
/// source may only fill a field left empty, never overwrite one already set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalEvidence {
    /// Proposal identifier
    pub id: ProposalId,

    /// Proposal title
    pub title: Option<String>,

    /// Raw summary text
    pub summary: String,

    /// Proposal classification
    pub kind: ProposalKind,

    /// Source repository (`owner/repo`)
    pub repository: Option<String>,

    /// Source commit identifier
    pub commit: Option<String>,

    /// Referenced documents, in order of appearance
    pub documents: Vec<DocumentRef>,

    /// Artifact path hint (e.g. a `.wasm.gz` path)
    pub artifact_path: Option<String>,

    /// Extracted URLs, deduplicated in first-seen order
    pub urls: Vec<String>,

    expected_digest: Option<String>,
    digest_provenance: Option<DigestProvenance>,
    expected_arg_digest: Option<String>,
    arg_digest_provenance: Option<DigestProvenance>,
}

impl ProposalEvidence {
    /// Create evidence with nothing extracted yet
    pub fn new(id: ProposalId, summary: impl Into<String>) -> Self {
        Self {
            id,
            title: None,
            summary: summary.into(),
            kind: ProposalKind::Unknown,
            repository: None,
            commit: None,
            documents: Vec::new(),
            artifact_path: None,
            urls: Vec::new(),
            expected_digest: None,
            digest_provenance: None,
            expected_arg_digest: None,
            arg_digest_provenance: None,
        }
    }

    /// Expected top-level (module) digest, if known
    pub fn expected_digest(&self) -> Option<&str> {
        self.expected_digest.as_deref()
    }

    /// Source that supplied the expected digest
    pub fn digest_provenance(&self) -> Option<DigestProvenance> {
        self.digest_provenance
    }

    /// Expected argument digest, if known
    pub fn expected_arg_digest(&self) -> Option<&str> {
        self.expected_arg_digest.as_deref()
    }

    /// Source that supplied the expected argument digest
    pub fn arg_digest_provenance(&self) -> Option<DigestProvenance> {
        self.arg_digest_provenance
    }

    /// Offer an expected module digest from `provenance`
    ///
    /// Returns `true` if the offer was taken. Offers that are not a 64-hex
    /// digest, and offers made after a digest is already set, are ignored.
    pub fn offer_expected_digest(
        &mut self,
        digest: Option<&str>,
        provenance: DigestProvenance,
    ) -> bool {
        offer(
            &mut self.expected_digest,
            &mut self.digest_provenance,
            digest,
            provenance,
        )
    }

    /// Offer an expected argument digest from `provenance`
    ///
    /// Same fill-once rule as [`ProposalEvidence::offer_expected_digest`].
    pub fn offer_arg_digest(&mut self, digest: Option<&str>, provenance: DigestProvenance) -> bool {
        offer(
            &mut self.expected_arg_digest,
            &mut self.arg_digest_provenance,
            digest,
            provenance,
        )
    }

    /// Documents whose expected hash makes them verifiable
    pub fn verifiable_documents(&self) -> impl Iterator<Item = &DocumentRef> {
        self.documents
            .iter()
            .filter(|d| d.expected_hash.as_deref().is_some_and(is_digest_hex))
    }
}

fn offer(
    slot: &mut Option<String>,
    provenance_slot: &mut Option<DigestProvenance>,
    digest: Option<&str>,
    provenance: DigestProvenance,
) -> bool {
    if slot.is_some() {
        return false;
    }
    let Some(value) = digest.map(str::trim).filter(|d| is_digest_hex(d)) else {
        return false;
    };
    *slot = Some(value.to_ascii_lowercase());
    *provenance_slot = Some(provenance);
    true
}
