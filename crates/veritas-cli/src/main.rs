//! Veritas CLI - audit governance proposals from the command line.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use veritas_cli::commands;
use veritas_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> veritas_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Fetch(args) => commands::execute_fetch(args, &config, &formatter).await?,
        Command::Audit(args) => commands::execute_audit(args, &config, &formatter).await?,
        Command::Scan(args) => commands::execute_scan(args, &config, &formatter).await?,
        Command::Hash(args) => commands::execute_hash(args, &formatter).await?,
        Command::Commit(args) => commands::execute_commit(args, &config, &formatter).await?,
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter).await?
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
