//! Audit command implementation.

use super::{commit_verifier, document_fetcher, load_proposal, proposal_id, session};
use crate::cli::AuditArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fmt::Display;
use std::path::Path;
use tracing::{info, warn};
use veritas_audit::{AuditError, AuditSession, CommitVerifier};
use veritas_domain::traits::{CommitLookup, DocumentFetcher};
use veritas_domain::{ArgumentInputKind, UploadedFile};

/// Checks to run against a loaded proposal.
#[derive(Debug, Clone, Default)]
pub struct AuditPlan {
    /// Direct argument input
    pub argument: Option<(ArgumentInputKind, String)>,

    /// Escaped-blob tool output
    pub blob_output: Option<String>,

    /// Download every document with a URL
    pub fetch_documents: bool,

    /// Local files to compare against documents, by index
    pub uploads: Vec<(usize, UploadedFile)>,

    /// Run the commit existence check
    pub check_commit: bool,

    /// The auditor reproduced the artifact locally
    pub rebuilt: bool,
}

impl AuditPlan {
    /// Build a plan from command arguments, reading any referenced files.
    pub fn from_args(args: &AuditArgs) -> Result<Self> {
        let argument = if let Some(hex) = &args.arg_hex {
            Some((ArgumentInputKind::Hex, hex.clone()))
        } else if let Some(text) = &args.arg_text {
            Some((ArgumentInputKind::Text, text.clone()))
        } else {
            args.arg_candid
                .as_ref()
                .map(|candid| (ArgumentInputKind::CandidNeedsEncoding, candid.clone()))
        };

        let blob_output = match &args.arg_blob_file {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };

        let uploads = args
            .upload
            .iter()
            .map(|value| read_upload(value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            argument,
            blob_output,
            fetch_documents: args.documents,
            uploads,
            check_commit: !args.no_commit,
            rebuilt: args.rebuilt,
        })
    }
}

/// Execute the audit command.
pub async fn execute_audit(args: AuditArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let id = proposal_id(args.id)?;
    let plan = AuditPlan::from_args(&args)?;

    let mut session = session(config)?;
    load_proposal(&mut session, config, id, args.no_dashboard).await?;

    let fetcher = document_fetcher(config)?;
    let verifier = commit_verifier(config)?;
    let notes = run_checks(&mut session, &plan, &fetcher, &verifier).await?;

    print_report(&session, &notes, formatter)
}

/// Run the planned checks against an already loaded session.
///
/// Returns advisory notes for checks that could not run.
pub async fn run_checks<D, P, F>(
    session: &mut AuditSession,
    plan: &AuditPlan,
    fetcher: &D,
    verifier: &CommitVerifier<P, F>,
) -> Result<Vec<String>>
where
    D: DocumentFetcher,
    D::Error: Display,
    P: CommitLookup,
    F: CommitLookup,
    P::Error: Display,
    F::Error: Display,
{
    let mut notes = Vec::new();

    if let Some((kind, input)) = &plan.argument {
        session.verify_argument(*kind, input);
    }
    if let Some(output) = &plan.blob_output {
        session.verify_argument_blob(output);
    }

    if plan.fetch_documents {
        for index in 0..session.documents().len() {
            if session.documents()[index].source_url.is_some() {
                session.verify_document(index, fetcher).await?;
            }
        }
    }
    for (index, upload) in &plan.uploads {
        session.verify_document_upload(*index, upload)?;
    }

    if plan.check_commit {
        match session.check_commit(verifier).await {
            Ok(result) => info!("{}", result.status_line()),
            Err(AuditError::MissingCommitTarget) => {
                warn!("No repository and commit found; skipping commit check");
                notes.push("No repository and commit found in the proposal".to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }

    if plan.rebuilt {
        session.confirm_manual_rebuild();
    }

    Ok(notes)
}

fn print_report(session: &AuditSession, notes: &[String], formatter: &Formatter) -> Result<()> {
    let evidence = session
        .evidence()
        .ok_or(CliError::Audit(AuditError::NoProposalLoaded))?;
    let arguments: Vec<_> = session
        .direct_argument()
        .into_iter()
        .chain(session.blob_argument())
        .collect();
    let checklist = session.checklist();

    match formatter.format() {
        OutputFormat::Json => {
            println!(
                "{}",
                formatter.audit_report_json(
                    evidence,
                    session.documents(),
                    &arguments,
                    session.commit_result(),
                    &checklist,
                )?
            );
        }
        OutputFormat::Quiet => println!("{}", formatter.format_checklist(&checklist)?),
        OutputFormat::Table => {
            println!("{}", formatter.format_evidence(evidence)?);
            println!("{}", formatter.format_documents(session.documents())?);
            for argument in arguments {
                println!("{}", formatter.format_argument(argument)?);
            }
            if let Some(result) = session.commit_result() {
                println!("{}", formatter.format_commit(result)?);
            }
            for note in notes {
                println!("{}", formatter.warning(note));
            }
            println!("{}", formatter.format_checklist(&checklist)?);
        }
    }
    Ok(())
}

/// Parse `INDEX=PATH` and read the file.
fn read_upload(value: &str) -> Result<(usize, UploadedFile)> {
    let (index, path) = parse_upload_arg(value)?;
    let bytes = std::fs::read(path)?;
    let filename = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let content_type = content_type_for(&filename).map(str::to_string);
    Ok((
        index,
        UploadedFile {
            bytes,
            filename,
            content_type,
        },
    ))
}

fn parse_upload_arg(value: &str) -> Result<(usize, &str)> {
    let invalid = || {
        CliError::InvalidInput(format!(
            "Invalid upload '{}'. Expected 'INDEX=PATH'",
            value
        ))
    };
    let (index, path) = value.split_once('=').ok_or_else(invalid)?;
    let index = index.trim().parse().map_err(|_| invalid())?;
    if path.is_empty() {
        return Err(invalid());
    }
    Ok((index, path))
}

/// Content type guessed from a file extension
fn content_type_for(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "txt" | "md" => Some("text/plain"),
        "json" => Some("application/json"),
        "html" | "htm" => Some("text/html"),
        "pdf" => Some("application/pdf"),
        "gz" | "wasm" => Some("application/octet-stream"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_domain::{MatchResult, ProposalId, ProposalRecord};
    use veritas_sources::{MockCommitLookup, MockDocumentFetcher, MockEvidenceSource};

    /// SHA-256 of `audit report v1`
    const DOC_HASH: &str = "3a05ac8381a14de9d3ee620634d707ad201aa2b6eaffa2589908bd8123798681";
    /// SHA-256 of the bytes `44 49 44 4c 00 00`
    const ARG_HASH: &str = "0fee102bd16b053022b69f2c65fd5e2f41d150ce9c214ac8731cfaf496ebda4e";
    const COMMIT: &str = "ac971e7b4c851b89b312bee812f6de542ed907c5";
    const DOC_URL: &str = "https://example.org/reviews/audit.txt";

    async fn loaded(summary: String) -> AuditSession {
        let id = ProposalId::new(9).unwrap();
        let mut record = ProposalRecord::new(id, summary);
        record.expected_arg_digest = Some(ARG_HASH.to_string());
        let source = MockEvidenceSource::default().with_proposal(record);

        let mut session = AuditSession::default();
        session.load_proposal(&source, id).await.unwrap();
        session
    }

    fn summary_with_commit() -> String {
        format!(
            "Source: https://github.com/dfinity/ic/commit/{COMMIT}\nReview: {DOC_URL} {DOC_HASH}\n"
        )
    }

    #[tokio::test]
    async fn test_full_plan_completes_checklist() {
        let mut session = loaded(summary_with_commit()).await;
        let fetcher = MockDocumentFetcher::default().with_document(DOC_URL, b"audit report v1".to_vec());
        let verifier = CommitVerifier::new(
            MockCommitLookup::found("commit found"),
            MockCommitLookup::found("unused"),
        );
        let plan = AuditPlan {
            argument: Some((ArgumentInputKind::Hex, "4449444c0000".to_string())),
            fetch_documents: true,
            check_commit: true,
            rebuilt: true,
            ..Default::default()
        };

        let notes = run_checks(&mut session, &plan, &fetcher, &verifier).await.unwrap();

        assert!(notes.is_empty());
        assert_eq!(session.documents()[0].match_result, MatchResult::Match);
        assert_eq!(session.checklist().completed(), 5);
        assert_eq!(verifier.fallback().call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_commit_target_is_a_note() {
        let mut session = loaded("A motion without code.".to_string()).await;
        let verifier = CommitVerifier::new(MockCommitLookup::found("a"), MockCommitLookup::found("b"));
        let plan = AuditPlan {
            check_commit: true,
            ..Default::default()
        };

        let notes = run_checks(&mut session, &plan, &MockDocumentFetcher::default(), &verifier)
            .await
            .unwrap();

        assert_eq!(notes.len(), 1);
        assert!(!session.checklist().commit_verified);
        assert_eq!(verifier.primary().call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_out_of_range_is_an_error() {
        let mut session = loaded(summary_with_commit()).await;
        let verifier = CommitVerifier::new(MockCommitLookup::found("a"), MockCommitLookup::found("b"));
        let upload = UploadedFile {
            bytes: b"audit report v1".to_vec(),
            filename: "audit.txt".to_string(),
            content_type: Some("text/plain".to_string()),
        };
        let plan = AuditPlan {
            uploads: vec![(3, upload)],
            ..Default::default()
        };

        let result = run_checks(&mut session, &plan, &MockDocumentFetcher::default(), &verifier).await;
        assert!(matches!(
            result,
            Err(CliError::Audit(AuditError::DocumentIndex { index: 3, count: 1 }))
        ));
    }

    #[test]
    fn test_parse_upload_arg() {
        assert_eq!(parse_upload_arg("0=./audit.pdf").unwrap(), (0, "./audit.pdf"));
        assert_eq!(parse_upload_arg("2=C:=odd").unwrap(), (2, "C:=odd"));
        assert!(parse_upload_arg("audit.pdf").is_err());
        assert!(parse_upload_arg("x=audit.pdf").is_err());
        assert!(parse_upload_arg("1=").is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("REPORT.PDF"), Some("application/pdf"));
        assert_eq!(content_type_for("notes.md"), Some("text/plain"));
        assert_eq!(content_type_for("Makefile"), None);
    }

    #[test]
    fn test_plan_from_args_reads_upload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.txt");
        std::fs::write(&path, "audit report v1").unwrap();

        let args = AuditArgs {
            id: 1,
            no_dashboard: false,
            arg_hex: None,
            arg_text: Some("hello".to_string()),
            arg_candid: None,
            arg_blob_file: None,
            documents: false,
            upload: vec![format!("0={}", path.display())],
            no_commit: true,
            rebuilt: false,
        };

        let plan = AuditPlan::from_args(&args).unwrap();
        assert_eq!(plan.argument, Some((ArgumentInputKind::Text, "hello".to_string())));
        assert!(!plan.check_commit);
        assert_eq!(plan.uploads.len(), 1);
        assert_eq!(plan.uploads[0].1.filename, "audit.txt");
        assert_eq!(plan.uploads[0].1.content_type.as_deref(), Some("text/plain"));
    }
}
