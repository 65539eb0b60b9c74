//! Scalar extraction from statement result payloads.
//!
//! The platform has returned the same logical value in several shapes over
//! time. Each known shape gets one extractor; they are tried in a fixed order
//! and the first one that yields a value wins.

use gate_core::{GateError, Result};
use serde_json::Value;

/// Reads a count from one payload shape, or `None` if the shape is absent.
pub type Extractor = fn(&Value) -> Option<u64>;

/// Known result shapes, highest priority first.
pub const RESULT_EXTRACTORS: &[(&str, Extractor)] = &[
    ("result", top_level_result),
    ("result.data_array", inline_data_array),
    ("response.result", nested_response_result),
    ("results.data", legacy_results_data),
];

/// Extracts the scalar count from a statement result payload.
///
/// # Errors
///
/// Returns `GateError::Protocol` when no known shape is present.
pub fn extract_count(payload: &Value) -> Result<u64> {
    RESULT_EXTRACTORS
        .iter()
        .find_map(|(_, extractor)| extractor(payload))
        .ok_or_else(|| {
            let tried: Vec<&str> = RESULT_EXTRACTORS.iter().map(|(path, _)| *path).collect();
            GateError::protocol(format!(
                "no count found in statement result (tried: {})",
                tried.join(", ")
            ))
        })
}

/// `{"result": [[150]]}`
pub fn top_level_result(payload: &Value) -> Option<u64> {
    first_row_value(payload.get("result")?)
}

/// `{"result": {"data_array": [["150"]]}}`
pub fn inline_data_array(payload: &Value) -> Option<u64> {
    first_row_value(payload.get("result")?.get("data_array")?)
}

/// `{"response": {"result": [[150]]}}`
pub fn nested_response_result(payload: &Value) -> Option<u64> {
    first_row_value(payload.get("response")?.get("result")?)
}

/// `{"results": {"data": [[150]]}}`
pub fn legacy_results_data(payload: &Value) -> Option<u64> {
    first_row_value(payload.get("results")?.get("data")?)
}

fn first_row_value(rows: &Value) -> Option<u64> {
    let row = rows.as_array()?.first()?;
    match row {
        Value::Array(cells) => cells.first().and_then(scalar),
        // A single-column row keyed by column name.
        Value::Object(columns) => columns
            .get("c")
            .or_else(|| columns.values().next())
            .and_then(scalar),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
