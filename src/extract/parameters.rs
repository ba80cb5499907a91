/// Parameter-style lists (template placeholders, request parameters) as
/// structured entries and markdown bullet blocks
use crate::element::humanize;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{self, Write};

const NAME_KEYS: &[&str] = &[
    "placeholderPropertyName",
    "name",
    "parameterName",
    "requestParameterName",
    "actionTargetName",
    "displayName",
];
const TYPE_KEYS: &[&str] = &["dataType", "placeholderPropertyType", "type"];
const EXAMPLE_KEYS: &[&str] = &["example", "exampleValue"];

/// One parameter-like entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ParameterEntry {
    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let name = first_text(object, NAME_KEYS)?;
        Some(Self {
            name,
            data_type: first_text(object, TYPE_KEYS),
            description: first_text(object, &["description"]),
            required: first_text(object, &["required"]),
            example: first_text(object, EXAMPLE_KEYS),
        })
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a parameter list.
///
/// Accepts a list of objects, or a map of name to description/object. Entries
/// without a recognizable name are dropped.
pub fn parse_parameters(value: &Value) -> Vec<ParameterEntry> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(ParameterEntry::from_object)
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(name, detail)| match detail {
                Value::Object(inner) => ParameterEntry {
                    name: name.clone(),
                    ..ParameterEntry::from_object(inner).unwrap_or_default()
                },
                Value::String(text) => ParameterEntry {
                    name: name.clone(),
                    description: Some(text.clone()).filter(|t| !t.is_empty()),
                    ..ParameterEntry::default()
                },
                _ => ParameterEntry {
                    name: name.clone(),
                    ..ParameterEntry::default()
                },
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Parameter lists carried in a `specification` block, keyed by list kind
pub fn specification_lists(specification: &Value) -> Vec<(String, Vec<ParameterEntry>)> {
    let Some(map) = specification.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, value)| value.is_array())
        .map(|(kind, value)| (kind.clone(), parse_parameters(value)))
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

/// Markdown bullets for a parameter list, indented by `depth` levels
pub fn write_parameter_bullets(
    out: &mut String,
    entries: &[ParameterEntry],
    depth: usize,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for entry in entries {
        writeln!(out, "{}* Name: {}", indent, entry.name)?;
        let fields = [
            ("Type", &entry.data_type),
            ("Description", &entry.description),
            ("Required", &entry.required),
            ("Example", &entry.example),
        ];
        for (label, field) in fields {
            if let Some(text) = field {
                writeln!(out, "{}  * {}: {}", indent, label, text)?;
            }
        }
    }
    Ok(())
}

/// A bold title followed by one sub-list per specification list kind
pub fn write_specification_block(out: &mut String, title: &str, specification: &Value) -> fmt::Result {
    writeln!(out, "**{}**", title)?;
    for (kind, entries) in specification_lists(specification) {
        writeln!(out, "* _{}_", humanize(&kind))?;
        write_parameter_bullets(out, &entries, 1)?;
    }
    Ok(())
}
