//! Declarative report specs: which columns to render for an entity type and
//! output format.
//!
//! Specs are immutable once registered. The registry hands out `Arc`s and every
//! render builds its own column values from a spec's template.

mod builtin;
pub mod registry;
pub mod resolver;

pub use registry::{SpecRegistry, DEFAULT_SPEC_NAME};
pub use resolver::{resolve, ReportSpecRef, ResolutionSource, ResolvedSpec};

use crate::element::fold_name;
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format type that matches every output format
pub const ALL_FORMATS: &str = "ALL";

/// Output representation requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Elements returned untouched
    Json,
    /// One `{key: value}` object per element
    Dict,
    /// Boxed text table
    Table,
    /// Markdown form, one per element
    Form,
    /// Markdown report with a heading per element
    Report,
    /// Markdown detail sections
    Md,
    /// Markdown table
    List,
    /// Only the elements' pre-rendered diagrams
    Mermaid,
    /// Minimal HTML table document
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 9] = [
        OutputFormat::Json,
        OutputFormat::Dict,
        OutputFormat::Table,
        OutputFormat::Form,
        OutputFormat::Report,
        OutputFormat::Md,
        OutputFormat::List,
        OutputFormat::Mermaid,
        OutputFormat::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Dict => "DICT",
            OutputFormat::Table => "TABLE",
            OutputFormat::Form => "FORM",
            OutputFormat::Report => "REPORT",
            OutputFormat::Md => "MD",
            OutputFormat::List => "LIST",
            OutputFormat::Mermaid => "MERMAID",
            OutputFormat::Html => "HTML",
        }
    }

    /// Formats whose result is a single text blob
    pub fn is_text(&self) -> bool {
        !matches!(self, OutputFormat::Json | OutputFormat::Dict)
    }

    /// File extension for writing this format to disk
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Dict => "json",
            OutputFormat::Table => "txt",
            OutputFormat::Html => "html",
            _ => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownOutputFormat(s.to_string()))
    }
}

/// One declared column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// The only contract between spec and extractor
    pub key: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
}

impl Column {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            width: None,
        }
    }

    pub fn labeled(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key).with_label(label)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Label if present, else the key
    pub fn heading(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

/// How well a variant serves a requested format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VariantMatch {
    None,
    Wildcard,
    Exact,
}

/// A column set serving one or more output formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVariant {
    /// Output format names, or `"ALL"`
    pub types: Vec<String>,
    #[serde(default, alias = "attributes")]
    pub columns: Vec<Column>,
    /// Lookup key of an enrichment hook registered with the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_hook: Option<String>,
}

impl FormatVariant {
    pub fn new(types: &[&str]) -> Self {
        Self {
            types: types.iter().map(|t| t.to_string()).collect(),
            columns: Vec::new(),
            enrichment_hook: None,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn with_hook(mut self, hook: impl Into<String>) -> Self {
        self.enrichment_hook = Some(hook.into());
        self
    }

    pub fn serves(&self, format: OutputFormat) -> VariantMatch {
        let mut result = VariantMatch::None;
        for declared in &self.types {
            if declared.eq_ignore_ascii_case(format.as_str()) {
                return VariantMatch::Exact;
            }
            if declared.eq_ignore_ascii_case(ALL_FORMATS) {
                result = VariantMatch::Wildcard;
            }
        }
        result
    }
}

/// A named, per-entity-type report spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub name: String,
    #[serde(alias = "target_type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatVariant>,
}

impl FormatSpec {
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            aliases: Vec::new(),
            heading: None,
            description: None,
            family: None,
            formats: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_variant(mut self, variant: FormatVariant) -> Self {
        self.formats.push(variant);
        self
    }

    /// Index of the variant serving `format`; an exact type beats `ALL`,
    /// earlier variants beat later ones.
    pub fn variant_index(&self, format: OutputFormat) -> Option<usize> {
        let mut best: Option<(usize, VariantMatch)> = None;
        for (index, variant) in self.formats.iter().enumerate() {
            let quality = variant.serves(format);
            if quality == VariantMatch::None {
                continue;
            }
            if best.map_or(true, |(_, current)| quality > current) {
                best = Some((index, quality));
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn variant_for(&self, format: OutputFormat) -> Option<&FormatVariant> {
        self.variant_index(format).and_then(|i| self.formats.get(i))
    }

    /// Matches the spec's name or any alias
    pub fn answers_to(&self, name: &str) -> bool {
        let wanted = fold_name(name);
        fold_name(&self.name) == wanted || self.aliases.iter().any(|a| fold_name(a) == wanted)
    }

    pub fn targets(&self, entity_type: &str) -> bool {
        fold_name(&self.entity_type) == fold_name(entity_type)
    }

    /// Heading used by REPORT and HTML output
    pub fn report_heading(&self) -> String {
        self.heading
            .clone()
            .unwrap_or_else(|| format!("{} Report", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("json", OutputFormat::Json)]
    #[case("DICT", OutputFormat::Dict)]
    #[case(" Table ", OutputFormat::Table)]
    #[case("md", OutputFormat::Md)]
    #[case("Mermaid", OutputFormat::Mermaid)]
    fn test_output_format_parse(#[case] input: &str, #[case] expected: OutputFormat) {
        assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_output_format() {
        let err = "XML".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ReportError::UnknownOutputFormat(ref s) if s == "XML"));
    }

    #[test]
    fn test_exact_variant_beats_wildcard() {
        let spec = FormatSpec::new("Things", "Thing")
            .with_variant(FormatVariant::new(&["ALL"]).column(Column::new("guid")))
            .with_variant(FormatVariant::new(&["TABLE"]).column(Column::new("display_name")));

        assert_eq!(spec.variant_index(OutputFormat::Table), Some(1));
        assert_eq!(spec.variant_index(OutputFormat::Report), Some(0));
    }

    #[test]
    fn test_no_variant_for_format() {
        let spec = FormatSpec::new("Things", "Thing")
            .with_variant(FormatVariant::new(&["TABLE", "LIST"]));
        assert!(spec.variant_for(OutputFormat::Dict).is_none());
        assert!(spec.variant_for(OutputFormat::List).is_some());
    }

    #[test]
    fn test_name_and_alias_matching() {
        let spec = FormatSpec::new("Engine-Actions", "EngineAction").with_alias("Actions");
        assert!(spec.answers_to("engine actions"));
        assert!(spec.answers_to("ACTIONS"));
        assert!(!spec.answers_to("EngineAction"));
        assert!(spec.targets("engine_action"));
    }

    #[test]
    fn test_column_heading() {
        assert_eq!(Column::new("guid").heading(), "guid");
        assert_eq!(Column::labeled("guid", "GUID").heading(), "GUID");
    }

    #[test]
    fn test_spec_deserializes_with_aliases() {
        let spec: FormatSpec = serde_json::from_value(serde_json::json!({
            "name": "Collections",
            "target_type": "Collection",
            "formats": [{"types": ["ALL"], "attributes": [{"key": "display_name", "name": "Display Name"}]}]
        }))
        .unwrap();

        assert_eq!(spec.entity_type, "Collection");
        assert_eq!(spec.formats[0].columns[0].heading(), "Display Name");
    }
}
