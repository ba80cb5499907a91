/// Governance action types and processes
use super::columns::{populate, ColumnValues};
use super::parameters::{parse_parameters, write_parameter_bullets};
use super::relationships::related_name;
use super::Extractor;
use crate::element::MetadataElement;
use serde_json::Value;

const STATUS_KEYS: &[&str] = &["process_status", "element_status", "status"];
const STEP_LIST_KEYS: &[&str] = &["process_steps", "steps", "next_steps"];
const PARAMETER_KEYS: &[&str] = &["supported_request_parameters", "request_parameters"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GovernanceActionExtractor;

impl Extractor for GovernanceActionExtractor {
    fn name(&self) -> &'static str {
        "governance_action"
    }

    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues) {
        populate(element, columns);

        if let Some(status) = element.lookup_any(STATUS_KEYS) {
            columns.set("process_status", status.clone());
        }

        if let Some(count) = step_count(element) {
            columns.set("step_count", Value::from(count));
        }

        if let Some(first) = element
            .lookup_any(&["first_step", "first_process_step"])
            .and_then(related_name)
        {
            columns.set("first_step", Value::String(first));
        }

        if let Some(parameters) = element.lookup_any(PARAMETER_KEYS) {
            let mut text = String::new();
            match write_parameter_bullets(&mut text, &parse_parameters(parameters), 0) {
                Ok(()) => {
                    columns.set("supported_request_parameters", Value::String(text));
                }
                Err(e) => tracing::warn!(
                    "Could not format request parameters for element {:?}: {}",
                    element.guid(),
                    e
                ),
            }
        }
    }
}

/// Declared step count when it is a whole number, else the length of whichever
/// step list is present
fn step_count(element: &MetadataElement) -> Option<u64> {
    element
        .lookup("step_count")
        .and_then(|declared| match declared {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .or_else(|| {
            element
                .lookup_any(STEP_LIST_KEYS)
                .and_then(Value::as_array)
                .map(|steps| steps.len() as u64)
        })
}
