use super::build_registry;
use crate::cli::output::{header_row, standard_table};
use crate::config::Config;
use crate::error::ReportError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SpecsArgs {
    /// Additional spec file (JSON or TOML), may be repeated
    #[arg(long = "spec-file", value_name = "FILE")]
    pub spec_files: Vec<PathBuf>,

    /// Only list specs in this family
    #[arg(long)]
    pub family: Option<String>,
}

#[derive(Args)]
pub struct ShowSpecArgs {
    /// Spec name or alias
    pub name: String,

    /// Additional spec file (JSON or TOML), may be repeated
    #[arg(long = "spec-file", value_name = "FILE")]
    pub spec_files: Vec<PathBuf>,
}

pub fn run(args: SpecsArgs, config: &Config) -> anyhow::Result<()> {
    let registry = build_registry(config, &args.spec_files)?;

    let mut table = standard_table();
    table.set_header(header_row(&["Name", "Entity type", "Formats", "Columns", "Hook"]));

    for spec in registry.specs() {
        if let Some(family) = &args.family {
            if !spec.family.as_deref().is_some_and(|f| f.eq_ignore_ascii_case(family)) {
                continue;
            }
        }

        let formats: Vec<String> = spec.formats.iter().map(|v| v.types.join("/")).collect();
        let columns: Vec<String> = spec
            .formats
            .iter()
            .map(|v| v.columns.len().to_string())
            .collect();
        let hooks: Vec<&str> = spec
            .formats
            .iter()
            .filter_map(|v| v.enrichment_hook.as_deref())
            .collect();

        table.add_row(vec![
            spec.name.clone(),
            spec.entity_type.clone(),
            formats.join(", "),
            columns.join(", "),
            if hooks.is_empty() { "-".to_string() } else { hooks.join(", ") },
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub fn show(args: ShowSpecArgs, config: &Config) -> anyhow::Result<()> {
    let registry = build_registry(config, &args.spec_files)?;
    let spec = registry
        .get(&args.name)
        .ok_or_else(|| ReportError::Configuration(format!("No report spec named '{}'", args.name)))?;

    println!("{}", serde_json::to_string_pretty(spec.as_ref())?);
    Ok(())
}
