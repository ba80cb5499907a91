//! Output rendering: drives the extraction pipeline over a list of elements and
//! serializes the result into the requested format.

pub mod json;
pub mod text;

use crate::config::RenderConfig;
use crate::element::{extract_header, to_snake_case, MetadataElement, ReferenceableHeader};
use crate::error::{ReportError, ReportResult};
use crate::extract::{augment, extractor_for, value_text, ColumnValues, Extractor};
use crate::hooks::{EnrichmentHook, HookRegistry, NamedHook};
use crate::spec::{OutputFormat, ReportSpecRef, ResolutionSource, ResolvedSpec, SpecRegistry};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Filter text that matches every element
pub const MATCH_ALL: &str = "*";

/// What to render and how
#[derive(Clone)]
pub struct RenderRequest<'a> {
    /// Entity type the caller is rendering (resolution step 3)
    pub entity_type: String,
    pub output_format: OutputFormat,
    pub report_spec: Option<ReportSpecRef>,
    /// Second-choice entity type (resolution step 4)
    pub fallback_type: Option<String>,
    /// Case-insensitive substring matched against the configured filter field
    pub filter: Option<String>,
    /// Overrides the extractor picked from the entity type
    pub extractor: Option<&'a dyn Extractor>,
    /// Overrides any hook the resolved spec declares
    pub enrichment_hook: Option<NamedHook>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(entity_type: impl Into<String>, output_format: OutputFormat) -> Self {
        Self {
            entity_type: entity_type.into(),
            output_format,
            report_spec: None,
            fallback_type: None,
            filter: None,
            extractor: None,
            enrichment_hook: None,
        }
    }

    pub fn with_spec(mut self, spec: impl Into<ReportSpecRef>) -> Self {
        self.report_spec = Some(spec.into());
        self
    }

    pub fn with_fallback_type(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_type = Some(fallback.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_extractor(mut self, extractor: &'a dyn Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_hook(mut self, name: impl Into<String>, hook: Arc<dyn EnrichmentHook>) -> Self {
        self.enrichment_hook = Some(NamedHook {
            name: name.into(),
            hook,
        });
        self
    }
}

/// One element after extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub guid: Option<String>,
    pub type_name: Option<String>,
    /// Heading used for the element in narrative formats
    pub title: String,
    /// Pre-rendered diagram carried by the element
    pub diagram: Option<String>,
    pub columns: ColumnValues,
}

/// Per-render counters; missing data stays tolerated, just visible
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderStats {
    pub elements_in: usize,
    pub elements_rendered: usize,
    pub filtered_out: usize,
    pub enriched: usize,
    /// Column key -> number of rendered elements on which it stayed unset
    pub missing_fields: BTreeMap<String, usize>,
    pub spec_name: Option<String>,
    pub resolution: Option<ResolutionSource>,
}

impl RenderStats {
    pub fn missing_total(&self) -> usize {
        self.missing_fields.values().sum()
    }
}

/// Final artifact of a render
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedOutput {
    /// The input elements, untouched
    Json(Vec<Value>),
    /// One `{key: value}` object per element
    Dict(Vec<IndexMap<String, Value>>),
    /// Tabular, markdown or HTML text
    Text(String),
}

impl RenderedOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderedOutput::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&[Value]> {
        match self {
            RenderedOutput::Json(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_dicts(&self) -> Option<&[IndexMap<String, Value>]> {
        match self {
            RenderedOutput::Dict(rows) => Some(rows),
            _ => None,
        }
    }

    /// Printable form: pretty JSON for structured output, the text otherwise
    pub fn to_display_string(&self) -> ReportResult<String> {
        match self {
            RenderedOutput::Json(elements) => Ok(serde_json::to_string_pretty(elements)?),
            RenderedOutput::Dict(rows) => Ok(serde_json::to_string_pretty(rows)?),
            RenderedOutput::Text(text) => Ok(text.clone()),
        }
    }
}

/// Output plus the counters gathered while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub output: RenderedOutput,
    pub stats: RenderStats,
}

/// Rows extracted for a resolved spec, before serialization
#[derive(Debug, Clone)]
pub struct RowSet {
    pub resolved: ResolvedSpec,
    pub rows: Vec<RenderedRow>,
    pub stats: RenderStats,
}

/// Turns metadata elements into the caller's chosen representation.
///
/// Holds the spec and hook registries read-only; a renderer can be shared and
/// reused across renders.
#[derive(Debug, Clone)]
pub struct OutputRenderer {
    registry: Arc<SpecRegistry>,
    hooks: Arc<HookRegistry>,
    config: RenderConfig,
}

impl Default for OutputRenderer {
    fn default() -> Self {
        Self::new(
            Arc::new(SpecRegistry::builtin()),
            Arc::new(HookRegistry::new()),
            RenderConfig::default(),
        )
    }
}

impl OutputRenderer {
    pub fn new(registry: Arc<SpecRegistry>, hooks: Arc<HookRegistry>, config: RenderConfig) -> Self {
        Self {
            registry,
            hooks,
            config,
        }
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a response payload holding one element or a list of them
    pub fn render_value(&self, payload: &Value, request: &RenderRequest<'_>) -> ReportResult<Rendered> {
        let elements = crate::element::elements_from_value(payload);
        self.render(&elements, request)
    }

    /// Render elements in input order.
    ///
    /// JSON output returns the elements untouched and skips the pipeline
    /// entirely (including the filter). A failing enrichment hook aborts the
    /// whole render.
    pub fn render(&self, elements: &[Value], request: &RenderRequest<'_>) -> ReportResult<Rendered> {
        if request.output_format == OutputFormat::Json {
            let stats = RenderStats {
                elements_in: elements.len(),
                elements_rendered: elements.len(),
                ..RenderStats::default()
            };
            return Ok(Rendered {
                output: json::passthrough(elements),
                stats,
            });
        }

        let RowSet {
            resolved,
            rows,
            stats,
        } = self.render_rows(elements, request)?;

        let output = if request.output_format == OutputFormat::Dict {
            json::dict_rows(&rows, &self.config.sentinel)
        } else {
            let context = text::TextContext {
                resolved: &resolved,
                rows: &rows,
                config: &self.config,
                entity_type: &request.entity_type,
            };
            RenderedOutput::Text(text::render_text(request.output_format, &context)?)
        };

        Ok(Rendered { output, stats })
    }

    /// Resolve the spec and run extraction for every element, without serializing
    pub fn render_rows(&self, elements: &[Value], request: &RenderRequest<'_>) -> ReportResult<RowSet> {
        let resolved = self.registry.resolve(
            request.report_spec.as_ref(),
            Some(request.entity_type.as_str()),
            request.fallback_type.as_deref(),
            request.output_format,
        )?;

        let hook = match &request.enrichment_hook {
            Some(hook) => Some(hook.clone()),
            None => self.hooks.resolve(&resolved)?,
        };

        let mut stats = RenderStats {
            elements_in: elements.len(),
            spec_name: Some(resolved.spec().name.clone()),
            resolution: Some(resolved.source()),
            ..RenderStats::default()
        };
        let filter = request
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty() && *f != MATCH_ALL)
            .map(str::to_lowercase);

        let declared = resolved.columns().len();
        let mut appended: IndexSet<String> = IndexSet::new();
        let mut rows = Vec::with_capacity(elements.len());
        for value in elements {
            let element = MetadataElement::from_value(value);
            let header = extract_header(&element);

            let mut columns = ColumnValues::from_template(resolved.columns());
            columns.bind_header(&header);
            let extractor = request
                .extractor
                .unwrap_or_else(|| extractor_for(&request.entity_type, &element));
            extractor.extract(&element, &mut columns);
            augment(&element, &mut columns);

            if let Some(named) = &hook {
                let extra = named.hook.enrich(&element, &columns).map_err(|source| {
                    tracing::warn!(
                        "Enrichment hook '{}' failed for element {:?}: {}",
                        named.name,
                        element.guid(),
                        source
                    );
                    ReportError::Enrichment {
                        hook: named.name.clone(),
                        source,
                    }
                })?;
                for (key, value) in extra {
                    columns.insert(&to_snake_case(&key), value);
                }
                stats.enriched += 1;
            }
            appended.extend(columns.iter().skip(declared).map(|c| c.key.clone()));

            if let Some(needle) = &filter {
                if !self.matches_filter(needle, &element, &header, &columns) {
                    stats.filtered_out += 1;
                    continue;
                }
            }

            rows.push(RenderedRow {
                guid: header.guid.clone(),
                type_name: header.type_name.clone(),
                title: header
                    .title()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Element {}", rows.len() + 1)),
                diagram: element.diagram().map(str::to_string),
                columns,
            });
        }

        // Every row carries the same columns, hook-added ones included
        let appended: Vec<String> = appended.into_iter().collect();
        for row in &mut rows {
            row.columns.align_appended(declared, &appended);
            for key in row.columns.unset_keys() {
                *stats.missing_fields.entry(key.to_string()).or_insert(0) += 1;
            }
        }

        stats.elements_rendered = rows.len();
        tracing::debug!(
            "Rendered {} of {} elements with spec '{}' ({}) as {}; {} filtered out, {} unset fields {:?}",
            stats.elements_rendered,
            stats.elements_in,
            resolved.spec().name,
            resolved.source(),
            request.output_format,
            stats.filtered_out,
            stats.missing_total(),
            stats.missing_fields
        );

        Ok(RowSet {
            resolved,
            rows,
            stats,
        })
    }

    fn matches_filter(
        &self,
        needle: &str,
        element: &MetadataElement,
        header: &ReferenceableHeader,
        columns: &ColumnValues,
    ) -> bool {
        let field = self.config.filter_field.as_str();
        let header_values = header.column_values();
        let header_value = |key: &str| {
            header_values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v)
        };

        let candidate = columns
            .get(field)
            .or_else(|| element.lookup(field))
            .or_else(|| header_value(field))
            .or_else(|| header_value("qualified_name"));

        match candidate {
            Some(value) => value_text(Some(value), "").to_lowercase().contains(needle),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Column, FormatSpec, FormatVariant};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn engine_action(guid: &str, name: &str) -> Value {
        json!({
            "elementHeader": {"guid": guid, "type": {"typeName": "EngineAction"}},
            "properties": {"displayName": name, "requestType": "Survey"},
            "completionGuards": ["OK"]
        })
    }

    #[test]
    fn test_json_passthrough() {
        let renderer = OutputRenderer::default();
        let elements = vec![engine_action("g1", "a"), json!({"odd": true})];
        let rendered = renderer
            .render(&elements, &RenderRequest::new("EngineAction", OutputFormat::Json))
            .unwrap();
        assert_eq!(rendered.output.as_json(), Some(elements.as_slice()));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let renderer = OutputRenderer::default();
        let elements = vec![engine_action("g1", "Nightly Survey"), engine_action("g2", "Cleanup")];
        let request = RenderRequest::new("EngineAction", OutputFormat::Dict).with_filter("SURVEY");

        let rendered = renderer.render(&elements, &request).unwrap();
        let rows = rendered.output.as_dicts().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("guid"), Some(&json!("g1")));
        assert_eq!(rendered.stats.filtered_out, 1);
    }

    #[test]
    fn test_wildcard_filter_matches_all() {
        let renderer = OutputRenderer::default();
        let elements = vec![engine_action("g1", "a"), engine_action("g2", "b")];
        let request = RenderRequest::new("EngineAction", OutputFormat::Dict).with_filter("*");
        let rendered = renderer.render(&elements, &request).unwrap();
        assert_eq!(rendered.stats.elements_rendered, 2);
    }

    #[test]
    fn test_stats_count_missing_fields() {
        let renderer = OutputRenderer::default();
        let elements = vec![engine_action("g1", "a")];
        let rendered = renderer
            .render(&elements, &RenderRequest::new("EngineAction", OutputFormat::Dict))
            .unwrap();

        let stats = rendered.stats;
        assert_eq!(stats.spec_name.as_deref(), Some("Engine-Actions"));
        assert_eq!(stats.resolution, Some(ResolutionSource::EntityType));
        assert_eq!(stats.missing_fields.get("action_status"), Some(&1));
        assert!(stats.missing_fields.get("guid").is_none());
    }

    #[test]
    fn test_failing_hook_aborts_render() {
        let renderer = OutputRenderer::default();
        let failing: Arc<dyn EnrichmentHook> = Arc::new(
            |_: &MetadataElement, _: &ColumnValues| -> anyhow::Result<serde_json::Map<String, Value>> {
                anyhow::bail!("server unavailable")
            },
        );
        let request =
            RenderRequest::new("EngineAction", OutputFormat::Table).with_hook("detail", failing);

        let err = renderer
            .render(&[engine_action("g1", "a")], &request)
            .unwrap_err();
        match err {
            ReportError::Enrichment { hook, source } => {
                assert_eq!(hook, "detail");
                assert_eq!(source.to_string(), "server unavailable");
            }
            other => panic!("Expected Enrichment error, got {:?}", other),
        }
    }

    #[test]
    fn test_hook_values_are_merged() {
        let renderer = OutputRenderer::default();
        let hook: Arc<dyn EnrichmentHook> = Arc::new(
            |element: &MetadataElement, _: &ColumnValues| -> anyhow::Result<serde_json::Map<String, Value>> {
                let mut extra = serde_json::Map::new();
                extra.insert("actionStatus".to_string(), json!("WAITING"));
                extra.insert("detailFetched".to_string(), json!(element.guid().is_some()));
                Ok(extra)
            },
        );
        let request = RenderRequest::new("EngineAction", OutputFormat::Dict).with_hook("detail", hook);

        let rendered = renderer.render(&[engine_action("g1", "a")], &request).unwrap();
        let row = &rendered.output.as_dicts().unwrap()[0];
        assert_eq!(row.get("action_status"), Some(&json!("WAITING")));
        assert_eq!(row.get("detail_fetched"), Some(&json!(true)));
        assert_eq!(rendered.stats.enriched, 1);
    }

    #[test]
    fn test_hook_columns_shared_by_every_row() {
        let renderer = OutputRenderer::default();
        let hook: Arc<dyn EnrichmentHook> = Arc::new(
            |element: &MetadataElement, _: &ColumnValues| -> anyhow::Result<serde_json::Map<String, Value>> {
                let mut extra = serde_json::Map::new();
                if element.guid() == Some("b") {
                    extra.insert("extra".to_string(), json!("E"));
                }
                Ok(extra)
            },
        );
        let spec = FormatSpec::new("Guids", "Thing")
            .with_variant(FormatVariant::new(&["ALL"]).column(Column::new("guid")));
        let elements = vec![
            json!({"elementHeader": {"guid": "a"}}),
            json!({"elementHeader": {"guid": "b"}}),
        ];

        let list = RenderRequest::new("Thing", OutputFormat::List)
            .with_spec(spec.clone())
            .with_hook("detail", hook.clone());
        let rendered = renderer.render(&elements, &list).unwrap();
        let text = rendered.output.as_text().unwrap();
        let cells: Vec<usize> = text
            .lines()
            .filter(|line| line.starts_with('|'))
            .map(|line| line.matches('|').count())
            .collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|&n| n == 3), "ragged rows in\n{}", text);
        assert!(text.to_lowercase().contains("extra"));
        assert_eq!(rendered.stats.missing_fields.get("extra"), Some(&1));

        let dict = RenderRequest::new("Thing", OutputFormat::Dict)
            .with_spec(spec)
            .with_hook("detail", hook);
        let rendered = renderer.render(&elements, &dict).unwrap();
        let rows = rendered.output.as_dicts().unwrap();
        let keys: Vec<Vec<&String>> = rows.iter().map(|row| row.keys().collect()).collect();
        assert_eq!(keys[0], keys[1]);
        assert_eq!(rows[0].get("extra"), Some(&json!("")));
        assert_eq!(rows[1].get("extra"), Some(&json!("E")));
    }
}
