/// Referenceable fields common to every metadata element
use super::MetadataElement;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

/// The supertype fields every element carries regardless of subtype.
///
/// Missing fields stay `None`; callers bind the render sentinel in their place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceableHeader {
    pub guid: Option<String>,
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub type_name: Option<String>,
    /// Distinct classification names, in the order the server listed them
    pub classification_names: IndexSet<String>,
    pub version: Option<String>,
    pub created_by: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl ReferenceableHeader {
    /// Classification names joined for text output
    pub fn classifications_text(&self) -> String {
        self.classification_names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Best human-facing title for the element
    pub fn title(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.qualified_name.as_deref())
            .or(self.guid.as_deref())
    }

    /// Column key/value pairs this header can bind.
    ///
    /// Only present fields are returned; absent ones are left for the sentinel.
    pub fn column_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        let mut push = |key: &'static str, field: &Option<String>| {
            if let Some(text) = field {
                values.push((key, Value::String(text.clone())));
            }
        };
        push("guid", &self.guid);
        push("qualified_name", &self.qualified_name);
        push("display_name", &self.display_name);
        push("type_name", &self.type_name);
        push("version", &self.version);
        push("created_by", &self.created_by);
        push("create_time", &self.create_time);
        push("update_time", &self.update_time);

        if !self.classification_names.is_empty() {
            let joined = Value::String(self.classifications_text());
            values.push(("classifications", joined.clone()));
            values.push(("classification_names", joined));
        }
        values
    }
}

/// Pull the referenceable fields out of an element's header block
pub fn extract_header(element: &MetadataElement) -> ReferenceableHeader {
    let header = element.header();
    let versions = header.get("versions");

    let classification_names = header
        .get("classifications")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|c| c.get("classificationName").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ReferenceableHeader {
        guid: element.guid().map(str::to_string),
        qualified_name: text_of(element.property("qualified_name")),
        display_name: text_of(element.lookup_any(&["display_name", "name"])),
        type_name: element.type_name().map(str::to_string),
        classification_names,
        version: text_of(versions.and_then(|v| v.get("version"))),
        created_by: text_of(versions.and_then(|v| v.get("createdBy"))),
        create_time: text_of(versions.and_then(|v| v.get("createTime"))),
        update_time: text_of(versions.and_then(|v| v.get("updateTime"))),
    }
}

/// Render a scalar as text; containers and nulls yield `None`
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_extract_full_header() {
        let element = MetadataElement::from_value(&json!({
            "elementHeader": {
                "guid": "1234",
                "type": {"typeName": "Collection"},
                "classifications": [
                    {"classificationName": "Anchors"},
                    {"classificationName": "Folder"},
                    {"classificationName": "Anchors"}
                ],
                "versions": {"createdBy": "erinoverview", "version": 3, "createTime": "2025-01-01"}
            },
            "properties": {"qualifiedName": "Collection::Sales", "displayName": "Sales"}
        }));

        let header = extract_header(&element);
        assert_eq!(header.guid.as_deref(), Some("1234"));
        assert_eq!(header.type_name.as_deref(), Some("Collection"));
        assert_eq!(header.qualified_name.as_deref(), Some("Collection::Sales"));
        assert_eq!(header.display_name.as_deref(), Some("Sales"));
        assert_eq!(header.classifications_text(), "Anchors, Folder");
        assert_eq!(header.version.as_deref(), Some("3"));
        assert_eq!(header.created_by.as_deref(), Some("erinoverview"));
        assert_eq!(header.title(), Some("Sales"));
    }

    #[test]
    fn test_missing_fields_do_not_fail() {
        let header = extract_header(&MetadataElement::from_value(&json!({})));
        assert_eq!(header, ReferenceableHeader::default());
        assert!(header.column_values().is_empty());
        assert!(header.title().is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let element = MetadataElement::from_value(&json!({
            "elementHeader": {"guid": "g"},
            "properties": {"name": "short-name"}
        }));
        assert_eq!(extract_header(&element).display_name.as_deref(), Some("short-name"));
    }

    #[test]
    fn test_malformed_classifications_are_skipped() {
        let element = MetadataElement::from_value(&json!({
            "elementHeader": {"classifications": [{"other": 1}, "junk", {"classificationName": "Ok"}]}
        }));
        let header = extract_header(&element);
        assert_eq!(header.classifications_text(), "Ok");
    }

    #[test]
    fn test_column_values_include_classifications() {
        let element = MetadataElement::from_value(&json!({
            "elementHeader": {"guid": "g", "classifications": [{"classificationName": "Anchors"}]}
        }));
        let values = extract_header(&element).column_values();
        assert!(values.contains(&("guid", json!("g"))));
        assert!(values.contains(&("classifications", json!("Anchors"))));
    }
}
