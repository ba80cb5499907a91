/// Engine action status, request and guard normalization
use super::columns::{populate, ColumnValues};
use super::relationships::join_related_names;
use super::Extractor;
use crate::element::MetadataElement;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineActionExtractor;

impl Extractor for EngineActionExtractor {
    fn name(&self) -> &'static str {
        "engine_action"
    }

    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues) {
        populate(element, columns);

        let scalars: [(&str, &[&str]); 5] = [
            ("action_status", &["action_status", "activity_status", "status"]),
            ("process_name", &["process_name", "governance_action_process_name"]),
            ("request_type", &["request_type", "governance_request_type"]),
            ("governance_engine_name", &["governance_engine_name", "engine_name"]),
            ("requester", &["requester_user_id", "requested_by"]),
        ];
        for (column, candidates) in scalars {
            if let Some(value) = element.lookup_any(candidates) {
                columns.set(column, value.clone());
            }
        }

        for column in ["received_guards", "completion_guards"] {
            if let Some(guards) = element.lookup(column).and_then(guard_text) {
                columns.set(column, Value::String(guards));
            }
        }

        if let Some(targets) = element.lookup("action_targets") {
            columns.set("action_targets", Value::String(join_related_names(targets)));
        }
    }
}

/// Guard lists as one comma-joined string
fn guard_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Column;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn columns() -> ColumnValues {
        let keys = [
            "action_status",
            "process_name",
            "request_type",
            "received_guards",
            "completion_guards",
            "action_targets",
        ];
        ColumnValues::from_template(&keys.map(Column::new))
    }

    #[test]
    fn test_guards_at_either_depth_and_casing() {
        let element = MetadataElement::from_value(&json!({
            "elementHeader": {"guid": "ea1"},
            "properties": {"received_guards": ["set-up-complete", "ready"]},
            "completionGuards": ["OK"]
        }));
        let mut values = columns();
        EngineActionExtractor.extract(&element, &mut values);

        assert_eq!(values.get("received_guards"), Some(&json!("set-up-complete, ready")));
        assert_eq!(values.get("completion_guards"), Some(&json!("OK")));
    }

    #[test]
    fn test_status_and_process_normalized() {
        let element = MetadataElement::from_value(&json!({
            "properties": {"activityStatus": "COMPLETED", "requestType": "Survey"},
            "processName": "Daily::Survey",
            "actionTargets": [
                {"relatedElement": {"properties": {"displayName": "Server A"}}},
                {"relatedElement": {"properties": {"displayName": "Server B"}}}
            ]
        }));
        let mut values = columns();
        EngineActionExtractor.extract(&element, &mut values);

        assert_eq!(values.get("action_status"), Some(&json!("COMPLETED")));
        assert_eq!(values.get("process_name"), Some(&json!("Daily::Survey")));
        assert_eq!(values.get("request_type"), Some(&json!("Survey")));
        assert_eq!(values.get("action_targets"), Some(&json!("Server A, Server B")));
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let element = MetadataElement::from_value(&json!({"elementHeader": {"guid": "ea2"}}));
        let mut values = columns();
        EngineActionExtractor.extract(&element, &mut values);
        assert_eq!(values.unset_keys().count(), values.len());
    }

    #[test]
    fn test_empty_guard_list_is_empty_text() {
        let element = MetadataElement::from_value(&json!({"receivedGuards": []}));
        let mut values = columns();
        EngineActionExtractor.extract(&element, &mut values);
        assert_eq!(values.get("received_guards"), Some(&json!("")));
    }
}
