//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use veritas_domain::ArgumentInputKind;
use veritas_scanner::ScannerConfig;

/// Veritas - verify governance proposal artifacts against their claims.
#[derive(Debug, Parser)]
#[command(name = "veritas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VERITAS_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a proposal and show the extracted evidence
    Fetch(FetchArgs),

    /// Run every available check on a proposal and show the checklist
    Audit(AuditArgs),

    /// Scan proposal text from a file or stdin without fetching
    Scan(ScanArgs),

    /// Compute the digest of argument bytes or a file
    Hash(HashArgs),

    /// Check that a commit exists in a repository
    Commit(CommitArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the fetch command.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Proposal id
    pub id: u64,

    /// Skip the dashboard digest lookup
    #[arg(long)]
    pub no_dashboard: bool,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Proposal id
    pub id: u64,

    /// Skip the dashboard digest lookup
    #[arg(long)]
    pub no_dashboard: bool,

    /// Argument bytes as hex
    #[arg(long, conflicts_with = "arg_text")]
    pub arg_hex: Option<String>,

    /// Argument as raw text (hashed as UTF-8)
    #[arg(long, conflicts_with = "arg_candid")]
    pub arg_text: Option<String>,

    /// Argument in structured interface syntax (needs external encoding)
    #[arg(long, conflicts_with = "arg_hex")]
    pub arg_candid: Option<String>,

    /// File holding escaped-blob tool output for the argument
    #[arg(long)]
    pub arg_blob_file: Option<String>,

    /// Download and verify every referenced document
    #[arg(long)]
    pub documents: bool,

    /// Verify a local file against a document: INDEX=PATH
    #[arg(long, value_name = "INDEX=PATH")]
    pub upload: Vec<String>,

    /// Skip the commit existence check
    #[arg(long)]
    pub no_commit: bool,

    /// Confirm that a local rebuild reproduced the expected digest
    #[arg(long)]
    pub rebuilt: bool,
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// File with proposal text (stdin when omitted)
    pub file: Option<String>,

    /// Scanner preset instead of the configured scanner
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Arguments for the hash command.
#[derive(Debug, Parser)]
pub struct HashArgs {
    /// Input value (read from --file or stdin when omitted)
    pub input: Option<String>,

    /// How to interpret the input
    #[arg(short, long, value_enum, default_value = "hex")]
    pub kind: InputKindArg,

    /// Read input from a file; with `--kind file` its bytes are hashed as-is
    #[arg(long)]
    pub file: Option<String>,

    /// Expected digest to compare against
    #[arg(short, long)]
    pub expected: Option<String>,
}

/// Arguments for the commit command.
#[derive(Debug, Parser)]
pub struct CommitArgs {
    /// Commit identifier (7 to 40 hex characters)
    pub commit: String,

    /// Repository as owner/repo (configured default when omitted)
    #[arg(short, long)]
    pub repository: Option<String>,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

/// Scanner preset argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// Default markers and windows
    Default,
    /// Module-hash markers only, narrow windows
    Strict,
    /// Wide windows for loosely formatted text
    Lenient,
}

/// Input kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputKindArg {
    /// UTF-8 text
    Text,
    /// Hex-encoded bytes
    Hex,
    /// Escaped-blob tool output
    Blob,
    /// Raw file bytes
    File,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for ScannerConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => ScannerConfig::default(),
            PresetArg::Strict => ScannerConfig::strict(),
            PresetArg::Lenient => ScannerConfig::lenient(),
        }
    }
}

impl InputKindArg {
    /// Argument input kind, if this is not a raw file
    pub fn argument_kind(self) -> Option<ArgumentInputKind> {
        match self {
            InputKindArg::Text => Some(ArgumentInputKind::Text),
            InputKindArg::Hex => Some(ArgumentInputKind::Hex),
            InputKindArg::Blob => Some(ArgumentInputKind::DfxBlob),
            InputKindArg::File => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_command() {
        let cli = Cli::parse_from([
            "veritas",
            "-vv",
            "audit",
            "134039",
            "--arg-hex",
            "4449444c0000",
            "--upload",
            "0=./audit.pdf",
            "--documents",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Audit(args) => {
                assert_eq!(args.id, 134039);
                assert_eq!(args.arg_hex.as_deref(), Some("4449444c0000"));
                assert_eq!(args.upload, vec!["0=./audit.pdf".to_string()]);
                assert!(args.documents);
                assert!(!args.rebuilt);
            }
            _ => panic!("Expected Audit command"),
        }
    }

    #[test]
    fn test_arg_hex_conflicts_with_text() {
        let result = Cli::try_parse_from([
            "veritas", "audit", "1", "--arg-hex", "00", "--arg-text", "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_defaults_to_hex() {
        let cli = Cli::parse_from(["veritas", "hash", "abcd"]);
        match cli.command {
            Command::Hash(args) => {
                assert_eq!(args.kind, InputKindArg::Hex);
                assert_eq!(args.input.as_deref(), Some("abcd"));
            }
            _ => panic!("Expected Hash command"),
        }
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::parse_from(["veritas", "commit", "abcdef1", "-r", "dfinity/ic", "--format", "json"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_input_kind_mapping() {
        assert_eq!(InputKindArg::Blob.argument_kind(), Some(ArgumentInputKind::DfxBlob));
        assert_eq!(InputKindArg::File.argument_kind(), None);
    }

    #[test]
    fn test_preset_conversion() {
        let config: ScannerConfig = PresetArg::Strict.into();
        assert_eq!(config, ScannerConfig::strict());
    }
}
