//! Structured outputs: JSON passthrough and per-element dictionaries

use super::{RenderedOutput, RenderedRow};
use serde_json::Value;

/// The input elements exactly as received
pub fn passthrough(elements: &[Value]) -> RenderedOutput {
    RenderedOutput::Json(elements.to_vec())
}

/// One ordered `{column key: value}` map per row, unset columns bound to `sentinel`
pub fn dict_rows(rows: &[RenderedRow], sentinel: &str) -> RenderedOutput {
    RenderedOutput::Dict(rows.iter().map(|row| row.columns.to_map(sentinel)).collect())
}
