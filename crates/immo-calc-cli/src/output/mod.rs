pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a leaf value as plain text.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The first array of objects in `result` that reads as a year-by-year or
/// itemised schedule.
pub(crate) fn schedule_rows(result: &Value) -> Option<&Vec<Value>> {
    ["rows", "items", "units"]
        .iter()
        .find_map(|key| match result.get(*key) {
            Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => Some(rows),
            _ => None,
        })
}
