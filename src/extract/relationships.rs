/// Relationship flattening and diagram pass-through
use super::columns::ColumnValues;
use crate::element::{is_relationship_shaped, MetadataElement};
use serde_json::Value;

/// Column key that receives an element's pre-rendered diagram
pub const DIAGRAM_COLUMN: &str = "mermaid";

const NAME_KEYS: &[&str] = &["displayName", "qualifiedName", "name"];

/// Copy the element's diagram and flatten the relationship collections the
/// spec asks for.
///
/// A relationship is "required" when its canonical key is a declared column.
/// Collections nested in the properties container are taken before top-level
/// ones. Relationships nobody declared are dropped from the output. Columns an
/// extractor already bound are left alone.
pub fn augment(element: &MetadataElement, columns: &mut ColumnValues) {
    if let Some(diagram) = element.diagram() {
        columns.set_if_unset(DIAGRAM_COLUMN, Value::String(diagram.to_string()));
    }

    for (key, value) in element.properties().iter().chain(element.extras()) {
        if !is_relationship_shaped(value) || !columns.is_declared(key) || columns.is_set(key) {
            continue;
        }
        columns.set(key, Value::String(join_related_names(value)));
    }
}

/// Comma-joined names of the related elements in a relationship collection
pub fn join_related_names(value: &Value) -> String {
    let names: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(related_name).collect(),
        other => related_name(other).into_iter().collect(),
    };
    names.join(", ")
}

/// Best name for one relationship entry or related element.
///
/// Looks at the related element's properties, then its guid, then the entry
/// itself; plain strings are their own name.
pub fn related_name(item: &Value) -> Option<String> {
    if let Some(text) = item.as_str() {
        return Some(text.to_string());
    }

    let target = item.get("relatedElement").unwrap_or(item);
    let properties = target.get("properties").unwrap_or(target);

    NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .or_else(|| {
            target
                .get("elementHeader")
                .and_then(|h| h.get("guid"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
}
