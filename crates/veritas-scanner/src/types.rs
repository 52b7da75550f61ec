//! Result types for summary scanning

use veritas_domain::DocumentRef;

/// Everything the scanner could extract from one summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryEvidence {
    /// URLs in first-seen order, deduplicated
    pub urls: Vec<String>,

    /// Source repository (`owner/repo`)
    pub repository: Option<String>,

    /// Source commit identifier
    pub commit: Option<String>,

    /// Artifact path hint
    pub artifact_path: Option<String>,

    /// Referenced documents with any stated digest
    pub documents: Vec<DocumentRef>,

    /// Expected module digest found near a digest marker
    pub expected_digest: Option<String>,

    /// Expected argument digest found near an argument marker
    pub expected_arg_digest: Option<String>,

    /// Whether the summary embeds a structured interface value
    pub structured_syntax: bool,
}

impl SummaryEvidence {
    /// Whether nothing useful was found
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
            && self.repository.is_none()
            && self.commit.is_none()
            && self.artifact_path.is_none()
            && self.documents.is_empty()
            && self.expected_digest.is_none()
            && self.expected_arg_digest.is_none()
    }
}
