pub mod render;
pub mod specs;

use crate::config::Config;
use crate::spec::SpecRegistry;
use std::path::PathBuf;

/// Registry for a command: the configured specs plus any given on the command line
pub(crate) fn build_registry(config: &Config, extra_files: &[PathBuf]) -> anyhow::Result<SpecRegistry> {
    let mut registry = config.build_registry(None)?;
    for file in extra_files {
        let loaded = registry.load_file(file)?;
        tracing::debug!("Loaded {} specs from {}", loaded, file.display());
    }
    Ok(registry)
}
