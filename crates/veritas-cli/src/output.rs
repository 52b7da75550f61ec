//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use veritas_domain::{
    ArgumentEvidence, ChecklistState, CommitCheckResult, DocEvidence, MatchResult,
    ProposalEvidence,
};
use veritas_scanner::SummaryEvidence;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the evidence extracted for a proposal.
    pub fn format_evidence(&self, evidence: &ProposalEvidence) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&evidence_json(evidence))?),
            OutputFormat::Quiet => Ok(evidence.expected_digest().unwrap_or_default().to_string()),
            OutputFormat::Table => {
                let provenance = |p: Option<veritas_domain::DigestProvenance>| {
                    p.map(|p| format!(" ({})", p.tag())).unwrap_or_default()
                };
                let rows = [
                    ("Proposal", evidence.id.to_string()),
                    ("Title", or_dash(evidence.title.as_deref())),
                    ("Kind", evidence.kind.to_string()),
                    ("Repository", or_dash(evidence.repository.as_deref())),
                    ("Commit", or_dash(evidence.commit.as_deref())),
                    ("Artifact", or_dash(evidence.artifact_path.as_deref())),
                    (
                        "Expected digest",
                        format!(
                            "{}{}",
                            or_dash(evidence.expected_digest()),
                            provenance(evidence.digest_provenance())
                        ),
                    ),
                    (
                        "Argument digest",
                        format!(
                            "{}{}",
                            or_dash(evidence.expected_arg_digest()),
                            provenance(evidence.arg_digest_provenance())
                        ),
                    ),
                    ("Documents", evidence.documents.len().to_string()),
                    ("URLs", evidence.urls.len().to_string()),
                ];
                Ok(key_value_table(&rows))
            }
        }
    }

    /// Format the result of scanning raw summary text.
    pub fn format_scan(&self, scan: &SummaryEvidence) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&scan_json(scan))?),
            OutputFormat::Quiet => Ok(scan.expected_digest.clone().unwrap_or_default()),
            OutputFormat::Table => {
                if scan.is_empty() {
                    return Ok(self.colorize("No evidence found.", "yellow"));
                }
                let rows = [
                    ("Repository", or_dash(scan.repository.as_deref())),
                    ("Commit", or_dash(scan.commit.as_deref())),
                    ("Artifact", or_dash(scan.artifact_path.as_deref())),
                    ("Expected digest", or_dash(scan.expected_digest.as_deref())),
                    ("Argument digest", or_dash(scan.expected_arg_digest.as_deref())),
                    ("Structured syntax", yes_no(scan.structured_syntax).to_string()),
                    ("Documents", scan.documents.len().to_string()),
                    ("URLs", scan.urls.join("\n")),
                ];
                Ok(key_value_table(&rows))
            }
        }
    }

    /// Format document verification state.
    pub fn format_documents(&self, documents: &[DocEvidence]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let docs: Vec<Value> = documents.iter().map(document_json).collect();
                Ok(serde_json::to_string_pretty(&docs)?)
            }
            OutputFormat::Quiet => Ok(documents
                .iter()
                .map(|d| format!("{} {}", d.match_result.as_str(), d.name))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if documents.is_empty() {
                    return Ok(self.colorize("No documents referenced.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Name", "Expected", "Computed", "Result"]);
                for (index, doc) in documents.iter().enumerate() {
                    let result = match (&doc.error, doc.match_result) {
                        (Some(err), MatchResult::Unknown) => format!("error: {}", err),
                        _ => self.match_label(doc.match_result),
                    };
                    builder.push_record([
                        index.to_string(),
                        doc.name.clone(),
                        short_digest(doc.expected_hash.as_deref()),
                        short_digest(doc.computed_hash.as_deref()),
                        result,
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format one argument verification attempt.
    pub fn format_argument(&self, argument: &ArgumentEvidence) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&argument_json(argument))?),
            OutputFormat::Quiet => Ok(argument.computed_digest.clone().unwrap_or_default()),
            OutputFormat::Table => {
                let rows = [
                    ("Input kind", argument.input_kind.as_str().to_string()),
                    ("Expected", or_dash(argument.expected_digest.as_deref())),
                    ("Computed", or_dash(argument.computed_digest.as_deref())),
                    ("Matched", self.flag(argument.matched)),
                    ("Note", or_dash(argument.error.as_deref())),
                ];
                Ok(key_value_table(&rows))
            }
        }
    }

    /// Format a standalone digest computation.
    pub fn format_digest(
        &self,
        source: &str,
        computed: &str,
        expected: Option<&str>,
        matched: bool,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "source": source,
                "computed_digest": computed,
                "expected_digest": expected,
                "matched": expected.map(|_| matched),
            }))?),
            OutputFormat::Quiet => Ok(computed.to_string()),
            OutputFormat::Table => {
                let mut rows = vec![
                    ("Source", source.to_string()),
                    ("Computed", computed.to_string()),
                ];
                if let Some(expected) = expected {
                    rows.push(("Expected", expected.to_string()));
                    rows.push(("Matched", self.flag(matched)));
                }
                Ok(key_value_table(&rows))
            }
        }
    }

    /// Format a commit check result.
    pub fn format_commit(&self, result: &CommitCheckResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&commit_json(result))?),
            OutputFormat::Quiet => Ok(result.exists.to_string()),
            OutputFormat::Table => {
                let color = if result.exists { "green" } else { "red" };
                Ok(self.colorize(&result.status_line(), color))
            }
        }
    }

    /// Format the readiness checklist.
    pub fn format_checklist(&self, checklist: &ChecklistState) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: serde_json::Map<String, Value> = checklist
                    .items()
                    .iter()
                    .map(|(label, value)| (label.to_string(), Value::Bool(*value)))
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "items": items,
                    "completed": checklist.completed(),
                    "total": checklist.total(),
                }))?)
            }
            OutputFormat::Quiet => Ok(format!("{}/{}", checklist.completed(), checklist.total())),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Check", "Status"]);
                for (label, value) in checklist.items() {
                    builder.push_record([label.to_string(), self.flag(value)]);
                }
                let summary = format!(
                    "{}/{} checks complete",
                    checklist.completed(),
                    checklist.total()
                );
                Ok(format!("{}\n{}", styled(builder), summary))
            }
        }
    }

    /// Format a full audit report as one JSON document.
    pub fn audit_report_json(
        &self,
        evidence: &ProposalEvidence,
        documents: &[DocEvidence],
        arguments: &[&ArgumentEvidence],
        commit: Option<&CommitCheckResult>,
        checklist: &ChecklistState,
    ) -> Result<String> {
        let report = json!({
            "evidence": evidence_json(evidence),
            "documents": documents.iter().map(document_json).collect::<Vec<_>>(),
            "arguments": arguments.iter().map(|a| argument_json(a)).collect::<Vec<_>>(),
            "commit": commit.map(commit_json),
            "checklist": {
                "items": checklist
                    .items()
                    .iter()
                    .map(|(label, value)| json!({ "check": label, "ok": value }))
                    .collect::<Vec<_>>(),
                "completed": checklist.completed(),
                "total": checklist.total(),
            },
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn flag(&self, value: bool) -> String {
        if value {
            self.colorize("✓", "green")
        } else {
            self.colorize("✗", "red")
        }
    }

    fn match_label(&self, result: MatchResult) -> String {
        match result {
            MatchResult::Match => self.colorize("match", "green"),
            MatchResult::Mismatch => self.colorize("mismatch", "red"),
            MatchResult::Unknown => self.colorize("unknown", "yellow"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn key_value_table(rows: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, value) in rows {
        builder.push_record([key.to_string(), value.clone()]);
    }
    styled(builder)
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// First and last eight characters of a digest
fn short_digest(value: Option<&str>) -> String {
    match value {
        Some(d) if d.len() > 20 => format!("{}…{}", &d[..8], &d[d.len() - 8..]),
        Some(d) => d.to_string(),
        None => "-".to_string(),
    }
}

fn evidence_json(evidence: &ProposalEvidence) -> Value {
    json!({
        "id": evidence.id.value(),
        "title": evidence.title,
        "kind": evidence.kind.as_str(),
        "repository": evidence.repository,
        "commit": evidence.commit,
        "artifact_path": evidence.artifact_path,
        "expected_digest": evidence.expected_digest(),
        "digest_provenance": evidence.digest_provenance().map(|p| p.tag()),
        "expected_arg_digest": evidence.expected_arg_digest(),
        "arg_digest_provenance": evidence.arg_digest_provenance().map(|p| p.tag()),
        "documents": evidence
            .documents
            .iter()
            .map(|d| json!({ "name": d.name, "url": d.url, "expected_hash": d.expected_hash }))
            .collect::<Vec<_>>(),
        "urls": evidence.urls,
    })
}

fn scan_json(scan: &SummaryEvidence) -> Value {
    json!({
        "repository": scan.repository,
        "commit": scan.commit,
        "artifact_path": scan.artifact_path,
        "expected_digest": scan.expected_digest,
        "expected_arg_digest": scan.expected_arg_digest,
        "structured_syntax": scan.structured_syntax,
        "documents": scan
            .documents
            .iter()
            .map(|d| json!({ "name": d.name, "url": d.url, "expected_hash": d.expected_hash }))
            .collect::<Vec<_>>(),
        "urls": scan.urls,
    })
}

fn document_json(doc: &DocEvidence) -> Value {
    json!({
        "name": doc.name,
        "source_url": doc.source_url,
        "expected_hash": doc.expected_hash,
        "computed_hash": doc.computed_hash,
        "result": doc.match_result.as_str(),
        "error": doc.error,
        "preview": doc.preview,
    })
}

fn argument_json(argument: &ArgumentEvidence) -> Value {
    json!({
        "input_kind": argument.input_kind.as_str(),
        "expected_digest": argument.expected_digest,
        "computed_digest": argument.computed_digest,
        "matched": argument.matched,
        "note": argument.error,
    })
}

fn commit_json(result: &CommitCheckResult) -> Value {
    json!({
        "repository": result.repository,
        "commit": result.commit,
        "exists": result.exists,
        "tier": result.tier.as_str(),
        "detail": result.detail,
        "status": result.status_line(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_domain::{ArgumentInputKind, CommitTier, DocumentRef, ProposalId};

    const DIGEST: &str = "3a05ac8381a14de9d3ee620634d707ad201aa2b6eaffa2589908bd8123798681";

    fn evidence() -> ProposalEvidence {
        let mut evidence = ProposalEvidence::new(ProposalId::new(42).unwrap(), "summary");
        evidence.repository = Some("dfinity/ic".to_string());
        evidence.offer_expected_digest(Some(DIGEST), veritas_domain::DigestProvenance::Registry);
        evidence
    }

    fn document() -> DocEvidence {
        DocEvidence::from_ref(&DocumentRef {
            name: "audit.pdf".to_string(),
            url: Some("https://example.org/audit.pdf".to_string()),
            expected_hash: Some(DIGEST.to_string()),
        })
    }

    #[test]
    fn test_evidence_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_evidence(&evidence()).unwrap();
        assert!(output.contains("dfinity/ic"));
        assert!(output.contains("(registry)"));
    }

    #[test]
    fn test_evidence_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_evidence(&evidence()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["expected_digest"], DIGEST);
        assert_eq!(value["digest_provenance"], "registry");
    }

    #[test]
    fn test_evidence_quiet_is_digest() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_evidence(&evidence()).unwrap(), DIGEST);
    }

    #[test]
    fn test_documents_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut doc = document();
        doc.record_digest(DIGEST.to_string(), true, None);
        let output = formatter.format_documents(&[doc]).unwrap();
        assert!(output.contains("audit.pdf"));
        assert!(output.contains("match"));
        assert!(output.contains("3a05ac83…23798681"));
    }

    #[test]
    fn test_empty_documents() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_documents(&[]).unwrap();
        assert!(output.contains("No documents referenced"));
    }

    #[test]
    fn test_argument_quiet_is_computed_digest() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let argument = ArgumentEvidence::computed(
            ArgumentInputKind::Hex,
            "00",
            None,
            DIGEST.to_string(),
            false,
        );
        assert_eq!(formatter.format_argument(&argument).unwrap(), DIGEST);
    }

    #[test]
    fn test_commit_table_uses_status_line() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = CommitCheckResult {
            repository: "dfinity/ic".to_string(),
            commit: "abcdef1".to_string(),
            exists: true,
            tier: CommitTier::Primary,
            detail: "commit found".to_string(),
        };
        let output = formatter.format_commit(&result).unwrap();
        assert!(output.starts_with(veritas_domain::SUCCESS_INDICATOR));
        assert!(output.contains("dfinity/ic@abcdef1"));
    }

    #[test]
    fn test_checklist_formats() {
        let checklist = ChecklistState {
            fetched: true,
            expected_digest_known: true,
            ..Default::default()
        };

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_checklist(&checklist).unwrap(), "2/6");

        let table = Formatter::new(OutputFormat::Table, false);
        let output = table.format_checklist(&checklist).unwrap();
        assert!(output.contains("Proposal fetched"));
        assert!(output.contains("2/6 checks complete"));
    }

    #[test]
    fn test_audit_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .audit_report_json(&evidence(), &[document()], &[], None, &ChecklistState::default())
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["documents"][0]["result"], "unknown");
        assert!(value["commit"].is_null());
        assert_eq!(value["checklist"]["total"], 6);
    }

    #[test]
    fn test_digest_json_without_expected() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_digest("hex", DIGEST, None, false).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["computed_digest"], DIGEST);
        assert!(value["matched"].is_null());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
