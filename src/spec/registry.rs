/// Registry of named report specs
use super::builtin::builtin_specs;
use super::{resolver, FormatSpec, OutputFormat, ReportSpecRef, ResolvedSpec};
use crate::element::fold_name;
use crate::error::{ReportError, ReportResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Name of the spec every resolution falls back to
pub const DEFAULT_SPEC_NAME: &str = "Default";

/// On-disk layout of a spec file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SpecFile {
    Wrapped { specs: Vec<FormatSpec> },
    Bare(Vec<FormatSpec>),
}

impl SpecFile {
    fn into_specs(self) -> Vec<FormatSpec> {
        match self {
            SpecFile::Wrapped { specs } | SpecFile::Bare(specs) => specs,
        }
    }
}

/// Named, immutable report specs, in registration order.
///
/// Populated at startup and then only read. Lookups hand out `Arc`s so renders
/// never touch the registered template in place.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    specs: IndexMap<String, Arc<FormatSpec>>,
}

impl SpecRegistry {
    /// An empty registry (no Default spec)
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in spec set
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in builtin_specs() {
            registry.register(spec);
        }
        registry
    }

    /// Add a spec, replacing any spec with the same name.
    ///
    /// Returns the replaced spec.
    pub fn register(&mut self, spec: FormatSpec) -> Option<Arc<FormatSpec>> {
        let key = fold_name(&spec.name);
        let replaced = self.specs.insert(key, Arc::new(spec));
        if let Some(old) = &replaced {
            tracing::debug!("Replaced report spec '{}'", old.name);
        }
        replaced
    }

    /// Parse specs from JSON (a list, or `{"specs": [...]}`) and register them
    pub fn load_json_str(&mut self, contents: &str) -> ReportResult<usize> {
        let file: SpecFile = serde_json::from_str(contents)
            .map_err(|e| ReportError::Parse(format!("Failed to parse spec JSON: {}", e)))?;
        Ok(self.register_all(file.into_specs()))
    }

    /// Parse specs from TOML (`[[specs]]` tables) and register them
    pub fn load_toml_str(&mut self, contents: &str) -> ReportResult<usize> {
        let file: SpecFile = toml::from_str(contents)
            .map_err(|e| ReportError::Parse(format!("Failed to parse spec TOML: {}", e)))?;
        Ok(self.register_all(file.into_specs()))
    }

    /// Load a `.json` or `.toml` spec file, returning how many specs it held
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> ReportResult<usize> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let count = match extension.as_deref() {
            Some("json") => self.load_json_str(&contents)?,
            Some("toml") => self.load_toml_str(&contents)?,
            _ => {
                return Err(ReportError::Configuration(format!(
                    "Unsupported spec file type: {}",
                    path.display()
                )))
            }
        };
        tracing::info!("Loaded {} report specs from {}", count, path.display());
        Ok(count)
    }

    fn register_all(&mut self, specs: Vec<FormatSpec>) -> usize {
        let count = specs.len();
        for spec in specs {
            self.register(spec);
        }
        count
    }

    /// Look up a spec by name or alias
    pub fn get(&self, name: &str) -> Option<Arc<FormatSpec>> {
        if let Some(spec) = self.specs.get(&fold_name(name)) {
            return Some(Arc::clone(spec));
        }
        self.specs
            .values()
            .find(|spec| spec.answers_to(name))
            .cloned()
    }

    /// First spec targeting `entity_type` that has a variant for `format`
    pub fn find_for_entity_type(
        &self,
        entity_type: &str,
        format: OutputFormat,
    ) -> Option<Arc<FormatSpec>> {
        self.specs
            .values()
            .filter(|spec| !spec.answers_to(DEFAULT_SPEC_NAME))
            .find(|spec| spec.targets(entity_type) && spec.variant_index(format).is_some())
            .cloned()
    }

    pub fn default_spec(&self) -> Option<Arc<FormatSpec>> {
        self.specs.get(&fold_name(DEFAULT_SPEC_NAME)).cloned()
    }

    /// Resolve the single spec variant to render with; see [`resolver::resolve`]
    pub fn resolve(
        &self,
        report_spec: Option<&ReportSpecRef>,
        entity_type: Option<&str>,
        fallback_type: Option<&str>,
        format: OutputFormat,
    ) -> ReportResult<ResolvedSpec> {
        resolver::resolve(self, report_spec, entity_type, fallback_type, format)
    }

    pub fn specs(&self) -> impl Iterator<Item = &Arc<FormatSpec>> {
        self.specs.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.specs.values().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Column, FormatVariant};

    #[test]
    fn test_builtin_registry_has_default() {
        let registry = SpecRegistry::builtin();
        assert!(registry.default_spec().is_some());
        assert!(registry.len() >= 9);
    }

    #[test]
    fn test_lookup_by_name_and_alias() {
        let registry = SpecRegistry::builtin();
        assert_eq!(registry.get("tech types").unwrap().name, "Tech-Types");
        assert_eq!(registry.get("TechnologyType").unwrap().name, "Tech-Types");
        assert!(registry.get("no such spec").is_none());
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut registry = SpecRegistry::builtin();
        let before = registry.len();

        let replaced = registry.register(
            FormatSpec::new("collections", "Collection")
                .with_variant(FormatVariant::new(&["ALL"]).column(Column::new("guid"))),
        );

        assert!(replaced.is_some());
        assert_eq!(registry.len(), before);
        let spec = registry.get("Collections").unwrap();
        assert_eq!(spec.formats[0].columns.len(), 1);
    }

    #[test]
    fn test_find_for_entity_type_respects_format() {
        let mut registry = SpecRegistry::new();
        registry.register(
            FormatSpec::new("Narrow", "Widget").with_variant(FormatVariant::new(&["TABLE"])),
        );
        registry.register(
            FormatSpec::new("Wide", "Widget").with_variant(FormatVariant::new(&["ALL"])),
        );

        assert_eq!(
            registry.find_for_entity_type("widget", OutputFormat::Table).unwrap().name,
            "Narrow"
        );
        assert_eq!(
            registry.find_for_entity_type("Widget", OutputFormat::Md).unwrap().name,
            "Wide"
        );
        assert!(registry.find_for_entity_type("Gadget", OutputFormat::Md).is_none());
    }

    #[test]
    fn test_load_json_forms() {
        let mut registry = SpecRegistry::new();
        let bare = r#"[{"name": "A", "entity_type": "X", "formats": []}]"#;
        let wrapped = r#"{"specs": [{"name": "B", "target_type": "Y"}]}"#;

        assert_eq!(registry.load_json_str(bare).unwrap(), 1);
        assert_eq!(registry.load_json_str(wrapped).unwrap(), 1);
        assert_eq!(registry.names(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_load_toml() {
        let mut registry = SpecRegistry::new();
        let contents = r#"
[[specs]]
name = "Default"
entity_type = "Referenceable"

[[specs.formats]]
types = ["ALL"]
columns = [{ key = "guid", label = "GUID" }]
"#;
        assert_eq!(registry.load_toml_str(contents).unwrap(), 1);
        let default = registry.default_spec().unwrap();
        assert_eq!(default.formats[0].columns[0].heading(), "GUID");
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let mut registry = SpecRegistry::new();
        let err = registry.load_json_str("{not json").unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }
}
