pub mod commands;
pub mod output;

use crate::config::{default_config, load_config, Config};
use crate::error::ReportResult;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "catalog-report",
    version,
    about = "Render metadata catalog elements as tables, forms, reports and markdown",
    long_about = "catalog-report turns metadata elements returned by a catalog server into \
                  human or machine oriented output. Columns come from named report specs, \
                  which can be extended with JSON or TOML spec files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true, env = "CATALOG_REPORT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a JSON element or list of elements
    Render(commands::render::RenderArgs),

    /// List the registered report specs
    Specs(commands::specs::SpecsArgs),

    /// Print one report spec as JSON
    ShowSpec(commands::specs::ShowSpecArgs),
}

/// Load the config file if one was given, else the defaults.
///
/// Relative spec file paths in the file are taken relative to the file itself.
pub fn load_cli_config(path: Option<&Path>) -> ReportResult<Config> {
    let Some(path) = path else {
        return Ok(default_config());
    };

    let mut config = load_config(path)?;
    if let Some(dir) = path.parent() {
        for file in &mut config.registry.spec_files {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
    }
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "catalog-report",
            "-vv",
            "render",
            "elements.json",
            "--format",
            "dict",
            "--entity-type",
            "EngineAction",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_spec_files_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog-report.toml");
        std::fs::write(&path, "[registry]\nspec_files = [\"specs/extra.json\"]\n").unwrap();

        let config = load_cli_config(Some(&path)).unwrap();
        assert_eq!(config.registry.spec_files, vec![dir.path().join("specs/extra.json")]);
    }

    #[test]
    fn test_no_config_uses_defaults() {
        assert_eq!(load_cli_config(None).unwrap(), default_config());
    }
}
