use super::build_registry;
use crate::cli::output::{header_row, section_header, standard_table, success, warning};
use crate::config::Config;
use crate::error::ReportError;
use crate::hooks::HookRegistry;
use crate::report::{OutputRenderer, RenderRequest, RenderStats};
use crate::spec::OutputFormat;
use clap::Args;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding one element or a list of elements ("-" for stdin)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output format (JSON, DICT, TABLE, FORM, REPORT, MD, LIST, MERMAID, HTML)
    #[arg(short, long, default_value = "TABLE")]
    pub format: OutputFormat,

    /// Entity type used to pick a report spec
    #[arg(short = 't', long, default_value = "Referenceable")]
    pub entity_type: String,

    /// Entity type tried when nothing matches --entity-type
    #[arg(long)]
    pub fallback_type: Option<String>,

    /// Report spec to use, by name or alias
    #[arg(short, long)]
    pub spec: Option<String>,

    /// Keep only elements whose filter field contains this text ("*" keeps all)
    #[arg(long)]
    pub filter: Option<String>,

    /// Additional spec file (JSON or TOML), may be repeated
    #[arg(long = "spec-file", value_name = "FILE")]
    pub spec_files: Vec<PathBuf>,

    /// Write the output here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print render counters to stderr
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: RenderArgs, config: &Config) -> anyhow::Result<()> {
    let registry = build_registry(config, &args.spec_files)?;
    let hooks = HookRegistry::new();
    if let Err(e) = hooks.validate(&registry) {
        warning(&format!("{}; renders using that spec will fail", e));
    }

    let payload = read_payload(&args.input)?;
    let renderer = OutputRenderer::new(Arc::new(registry), Arc::new(hooks), config.render.clone());

    let mut request = RenderRequest::new(args.entity_type.as_str(), args.format);
    if let Some(spec) = &args.spec {
        request = request.with_spec(spec.as_str());
    }
    if let Some(fallback) = &args.fallback_type {
        request = request.with_fallback_type(fallback.as_str());
    }
    if let Some(filter) = &args.filter {
        request = request.with_filter(filter.as_str());
    }

    let rendered = renderer.render_value(&payload, &request)?;
    let text = rendered.output.to_display_string()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            success(&format!(
                "Wrote {} elements as {} to {}",
                rendered.stats.elements_rendered,
                args.format,
                path.display()
            ));
        }
        None => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    if args.stats {
        print_stats(&rendered.stats);
    }
    Ok(())
}

fn read_payload(input: &Path) -> anyhow::Result<Value> {
    let contents = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)?
    };

    let payload = serde_json::from_str(&contents)
        .map_err(|e| ReportError::Parse(format!("{}: {}", input.display(), e)))?;
    Ok(payload)
}

fn print_stats(stats: &RenderStats) {
    section_header("Render statistics");

    let mut table = standard_table();
    table.set_header(header_row(&["Counter", "Value"]));
    table.add_row(vec![
        "Spec".to_string(),
        stats.spec_name.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Resolved by".to_string(),
        stats
            .resolution
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec!["Elements in".to_string(), stats.elements_in.to_string()]);
    table.add_row(vec!["Rendered".to_string(), stats.elements_rendered.to_string()]);
    table.add_row(vec!["Filtered out".to_string(), stats.filtered_out.to_string()]);
    table.add_row(vec!["Enriched".to_string(), stats.enriched.to_string()]);
    for (key, count) in &stats.missing_fields {
        table.add_row(vec![format!("Unset: {}", key), count.to_string()]);
    }
    eprintln!("{}", table);
}
