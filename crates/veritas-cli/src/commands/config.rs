//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub async fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => init_config(path, force, formatter),
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Write a default configuration file unless one exists.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{}",
            formatter.warning(&format!(
                "{} already exists; use --force to overwrite",
                path.display()
            ))
        );
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_respects_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        init_config(&path, false, &formatter).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        std::fs::write(&path, "default_repository = \"dfinity/ic\"\n").unwrap();
        init_config(&path, false, &formatter).unwrap();
        let kept = Config::load_from(&path).unwrap();
        assert_eq!(kept.default_repository.as_deref(), Some("dfinity/ic"));

        init_config(&path, true, &formatter).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
