//! Path resolution for the config file.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, RollcallConfig};
use crate::errors::CliError;

/// Resolve the config file path.
///
/// `--config` wins; clap also fills it from `ROLLCALL_CONFIG`.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_config_path()
}

/// Load the config, falling back to defaults when no file exists at the
/// default location. An explicitly requested file must exist.
pub fn load_config(cli: &Cli) -> anyhow::Result<RollcallConfig> {
    let path = resolve_config_path(cli)?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "reading config");
        return read_config(&path);
    }

    if cli.config.is_some() {
        return Err(CliError::not_found(
            format!("Config file not found: {}", path.display()),
            missing_config_hint(&path),
        )
        .into());
    }

    tracing::debug!(path = %path.display(), "no config file, using defaults");
    Ok(RollcallConfig::default())
}

fn missing_config_hint(path: &Path) -> String {
    format!(
        "Hint: Run `rollcall --config {} init` to create it.",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_config_path_wins() {
        let cli = Cli::try_parse_from(["rollcall", "--config", "/tmp/custom.toml", "roster"])
            .unwrap();
        assert_eq!(
            resolve_config_path(&cli).unwrap(),
            PathBuf::from("/tmp/custom.toml")
        );
    }

    #[test]
    fn test_missing_explicit_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let cli = Cli::try_parse_from([
            "rollcall",
            "--config",
            path.to_str().unwrap(),
            "roster",
        ])
        .unwrap();

        let err = load_config(&cli).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().expect("typed error");
        assert_eq!(cli_err.exit_code(), crate::constants::exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_existing_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://example.test\"\n").unwrap();
        let cli = Cli::try_parse_from([
            "rollcall",
            "--config",
            path.to_str().unwrap(),
            "roster",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.server.base_url, "http://example.test");
    }
}
