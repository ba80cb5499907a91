use catalog_report::cli::{Cli, Commands};
use catalog_report::{Config, ReportError};
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let config = catalog_report::cli::load_cli_config(cli.config.as_deref());

    // CATALOG_REPORT_LOG, then -v, then [logging] level
    let log_level = std::env::var("CATALOG_REPORT_LOG").unwrap_or_else(|_| match cli.verbose {
        0 => config
            .as_ref()
            .map(|c| c.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(cli, config));

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<ReportError>() {
            Some(err) if err.is_configuration() => 2,
            Some(ReportError::Io(_)) => 3,
            Some(ReportError::Parse(_)) | Some(ReportError::Serialization(_)) => 4,
            Some(ReportError::Enrichment { .. }) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render(args) => catalog_report::cli::commands::render::run(args, &config),
        Commands::Specs(args) => catalog_report::cli::commands::specs::run(args, &config),
        Commands::ShowSpec(args) => catalog_report::cli::commands::specs::show(args, &config),
    }
}
