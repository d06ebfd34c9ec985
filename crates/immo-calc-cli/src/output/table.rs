use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, schedule_rows};

/// Render the envelope as tables: headline fields first, then one table per
/// schedule (amortization rows, projection rows, cost items, ...).
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(result) => print_section(None, result),
        None => print_section(None, value),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_section(title: Option<&str>, value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", format_scalar(value));
        return;
    };

    if let Some(title) = title {
        println!("\n{}", title);
    }
    print_fields(map);

    if let Some(rows) = schedule_rows(value) {
        print_rows(rows);
    }

    // One level of nesting: valuation, year_one, amortization, projection ...
    for (key, nested) in map {
        if nested.is_object() && title.is_none() {
            print_section(Some(key), nested);
        }
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut any = false;
    for (key, val) in map {
        if is_leaf(val) {
            builder.push_record([key.as_str(), &format_scalar(val)]);
            any = true;
        }
    }
    if any {
        println!("{}", Table::from(builder));
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first
        .iter()
        .filter(|(_, v)| is_leaf(v))
        .map(|(k, _)| k.clone())
        .collect();

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(format_scalar).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn is_leaf(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}
