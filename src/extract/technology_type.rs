//! Technology type detail: catalog templates and governance processes.
//!
//! Both collections are lists of related elements, each carrying a
//! `specification` block of parameter-like lists. They are rendered two ways:
//! markdown bullets for text output, and a raw structured form for callers that
//! want data rather than text.

use super::columns::{populate, ColumnValues};
use super::parameters::{specification_lists, write_specification_block, ParameterEntry};
use super::relationships::related_name;
use super::Extractor;
use crate::element::MetadataElement;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

pub const CATALOG_TEMPLATES: &str = "catalog_templates";
pub const CATALOG_TEMPLATES_RAW: &str = "catalog_templates_raw";
pub const GOVERNANCE_PROCESSES: &str = "governance_processes";
pub const GOVERNANCE_PROCESSES_RAW: &str = "governance_processes_raw";

const TEMPLATE_SOURCES: &[&str] = &["catalog_templates"];
const PROCESS_SOURCES: &[&str] = &["governance_processes", "governance_action_processes"];

/// One related element with its specification lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecifiedElement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub specification: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TechnologyTypeExtractor;

impl Extractor for TechnologyTypeExtractor {
    fn name(&self) -> &'static str {
        "technology_type"
    }

    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues) {
        populate(element, columns);

        let templates = specified_elements(element, TEMPLATE_SOURCES, "Template");
        let processes = specified_elements(element, PROCESS_SOURCES, "Process");

        for (column, sources) in [
            (CATALOG_TEMPLATES, TEMPLATE_SOURCES),
            (GOVERNANCE_PROCESSES, PROCESS_SOURCES),
        ] {
            match markdown(element, sources) {
                Ok(text) => {
                    columns.set(column, Value::String(text));
                }
                Err(e) => tracing::warn!(
                    "Could not format {} for element {:?}: {}",
                    column,
                    element.guid(),
                    e
                ),
            }
        }
        columns.set(CATALOG_TEMPLATES_RAW, json!(templates));
        columns.set(GOVERNANCE_PROCESSES_RAW, json!(processes));
    }
}

fn source_items<'a>(element: &'a MetadataElement, sources: &[&str]) -> &'a [Value] {
    element
        .lookup_any(sources)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn specification_of(item: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    item.get("specification").unwrap_or(&EMPTY)
}

fn item_name(item: &Value, fallback: &str, index: usize) -> String {
    related_name(item).unwrap_or_else(|| format!("{} {}", fallback, index + 1))
}

/// Markdown for a nested collection; empty when the element has none
pub fn markdown(element: &MetadataElement, sources: &[&str]) -> Result<String, fmt::Error> {
    let items = source_items(element, sources);
    let blocks = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut block = String::new();
            write_specification_block(
                &mut block,
                &item_name(item, "Entry", index),
                specification_of(item),
            )?;
            Ok(block)
        })
        .collect::<Result<Vec<String>, fmt::Error>>()?;
    Ok(blocks.join("\n"))
}

/// Structured form of a nested collection
pub fn specified_elements(
    element: &MetadataElement,
    sources: &[&str],
    fallback: &str,
) -> Vec<SpecifiedElement> {
    source_items(element, sources)
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let guid = item
                .get("relatedElement")
                .and_then(|r| r.get("elementHeader"))
                .and_then(|h| h.get("guid"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let specification = specification_lists(specification_of(item))
                .into_iter()
                .map(|(kind, entries): (String, Vec<ParameterEntry>)| (kind, json!(entries)))
                .collect();
            SpecifiedElement {
                name: item_name(item, fallback, index),
                guid,
                specification,
            }
        })
        .collect()
}
