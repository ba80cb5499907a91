//! Metadata elements as decoded from the governance platform.
//!
//! The upstream server is inconsistent about where a field lands: the same
//! property may sit in `properties` or `elementProperties`, under a camelCase or
//! snake_case key, or directly on the element. [`MetadataElement::from_value`]
//! absorbs that once at ingestion so the extractors read a single canonical path.

pub mod header;
pub mod keys;

pub use header::{extract_header, ReferenceableHeader};
pub use keys::{fold_name, humanize, to_camel_case, to_snake_case};

use serde_json::{Map, Value};

/// Key of the header block every element carries
pub const HEADER_KEY: &str = "elementHeader";
/// Primary properties container
pub const PROPERTIES_KEY: &str = "properties";
/// Alternate properties container used by some endpoints
pub const ALTERNATE_PROPERTIES_KEY: &str = "elementProperties";

/// Canonical keys under which a pre-rendered diagram may be found
const DIAGRAM_KEYS: &[&str] = &["mermaid_graph", "mermaid"];

/// One catalog entity, normalized for rendering.
///
/// Read-only once built. `properties` and `extras` are keyed by snake_case;
/// values below the first level are left exactly as the server sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataElement {
    raw: Value,
    header: Map<String, Value>,
    properties: Map<String, Value>,
    extras: Map<String, Value>,
}

impl MetadataElement {
    /// Normalize a decoded JSON element.
    ///
    /// Never fails: anything that is not an object yields an element with an
    /// empty header and no properties.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::debug!("element is not a JSON object; rendering it as empty");
            return Self {
                raw: value.clone(),
                header: Map::new(),
                properties: Map::new(),
                extras: Map::new(),
            };
        };

        let header = object
            .get(HEADER_KEY)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        // Primary container wins when both carry the same field
        let mut properties = Map::new();
        for container in [PROPERTIES_KEY, ALTERNATE_PROPERTIES_KEY] {
            if let Some(map) = object.get(container).and_then(Value::as_object) {
                for (key, value) in map {
                    let canonical = to_snake_case(key);
                    if !properties.contains_key(&canonical) {
                        properties.insert(canonical, value.clone());
                    }
                }
            }
        }

        let mut extras = Map::new();
        for (key, value) in object {
            if matches!(
                key.as_str(),
                HEADER_KEY | PROPERTIES_KEY | ALTERNATE_PROPERTIES_KEY
            ) {
                continue;
            }
            let canonical = to_snake_case(key);
            if !extras.contains_key(&canonical) {
                extras.insert(canonical, value.clone());
            }
        }

        Self {
            raw: value.clone(),
            header,
            properties,
            extras,
        }
    }

    /// The element exactly as it was decoded
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Top-level fields other than the header and properties containers
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    pub fn guid(&self) -> Option<&str> {
        self.header.get("guid").and_then(Value::as_str)
    }

    pub fn type_name(&self) -> Option<&str> {
        self.header
            .get("type")
            .and_then(|t| t.get("typeName"))
            .and_then(Value::as_str)
    }

    /// A property by canonical key; JSON nulls count as absent
    pub fn property(&self, key: &str) -> Option<&Value> {
        present(self.properties.get(key))
    }

    /// A top-level field by canonical key; JSON nulls count as absent
    pub fn extra(&self, key: &str) -> Option<&Value> {
        present(self.extras.get(key))
    }

    /// Look in properties first, then the element's top level
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.property(key).or_else(|| self.extra(key))
    }

    /// First present value among several candidate keys, in order
    pub fn lookup_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.lookup(key))
    }

    /// Pre-rendered diagram text carried by the element, if any
    pub fn diagram(&self) -> Option<&str> {
        DIAGRAM_KEYS
            .iter()
            .find_map(|key| self.lookup(key))
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Normalize a response payload that may be a single element or a list of them
pub fn elements_from_value(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// True for values shaped like relationship collections: objects (or lists of
/// objects) that point at a related element.
pub fn is_relationship_shaped(value: &Value) -> bool {
    fn is_relationship(item: &Value) -> bool {
        item.get("relatedElement").is_some() || item.get("relationshipHeader").is_some()
    }

    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_relationship),
        Value::Object(_) => is_relationship(value),
        _ => false,
    }
}
