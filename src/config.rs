//! Configuration for rendering, spec registries and logging

use crate::error::{ReportError, ReportResult};
use crate::spec::SpecRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// Text bound to columns nothing could populate
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    /// Column the render filter matches against
    #[serde(default = "default_filter_field")]
    pub filter_field: String,
    /// Fixed TABLE width so output does not depend on the terminal
    #[serde(default = "default_table_width")]
    pub table_width: u16,
    /// Replacement for newlines inside LIST cells
    #[serde(default = "default_list_newline")]
    pub list_newline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Start from the built-in spec set
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    /// Extra `.json`/`.toml` spec files, applied in order
    #[serde(default)]
    pub spec_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_sentinel() -> String { String::new() }
fn default_filter_field() -> String { "display_name".to_string() }
fn default_table_width() -> u16 { 120 }
fn default_list_newline() -> String { "<br>".to_string() }
fn default_include_builtin() -> bool { true }
fn default_log_level() -> String { "info".to_string() }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            filter_field: default_filter_field(),
            table_width: default_table_width(),
            list_newline: default_list_newline(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            spec_files: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Build the spec registry this configuration describes.
    ///
    /// Relative spec file paths are taken relative to `base_dir` when given.
    pub fn build_registry(&self, base_dir: Option<&Path>) -> ReportResult<SpecRegistry> {
        let mut registry = if self.registry.include_builtin {
            SpecRegistry::builtin()
        } else {
            SpecRegistry::new()
        };

        for file in &self.registry.spec_files {
            let path = match base_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            registry.load_file(&path)?;
        }

        if registry.default_spec().is_none() {
            tracing::warn!("Spec registry has no Default spec; unmatched renders will fail");
        }
        Ok(registry)
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> ReportResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| ReportError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> ReportResult<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ReportError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = default_config();
        assert_eq!(config.render.sentinel, "");
        assert_eq!(config.render.filter_field, "display_name");
        assert_eq!(config.render.table_width, 120);
        assert!(config.registry.include_builtin);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[render]
sentinel = "n/a"
"#,
        )
        .unwrap();
        assert_eq!(config.render.sentinel, "n/a");
        assert_eq!(config.render.list_newline, "<br>");
        assert!(config.registry.spec_files.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog-report.toml");

        let mut config = default_config();
        config.render.table_width = 80;
        config.registry.spec_files.push(PathBuf::from("specs.json"));
        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[render\nsentinel=").unwrap();

        assert!(matches!(load_config(&path), Err(ReportError::Configuration(_))));
    }

    #[test]
    fn test_build_registry_without_builtins() {
        let mut config = default_config();
        config.registry.include_builtin = false;
        let registry = config.build_registry(None).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_build_registry_loads_relative_spec_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("extra.json"),
            r#"[{"name": "Widgets", "entity_type": "Widget", "formats": [{"types": ["ALL"], "columns": [{"key": "guid"}]}]}]"#,
        )
        .unwrap();

        let mut config = default_config();
        config.registry.spec_files.push(PathBuf::from("extra.json"));
        let registry = config.build_registry(Some(dir.path())).unwrap();

        assert!(registry.get("Widgets").is_some());
        assert!(registry.default_spec().is_some());
    }
}
