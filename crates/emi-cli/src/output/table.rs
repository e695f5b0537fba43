use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables, one per nested section.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_section("result", result);
                print_envelope_notes(map);
            } else {
                print_section("", value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", scalar_text(value)),
    }
}

/// Scalars of an object go into one Field/Value table; nested objects and
/// arrays become their own titled sections.
fn print_section(title: &str, value: &Value) {
    let Value::Object(map) = value else {
        if let Value::Array(arr) = value {
            print_title(title);
            print_array_table(arr);
        } else {
            println!("{}", scalar_text(value));
        }
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut has_scalars = false;
    for (key, val) in map {
        if !val.is_object() && !val.is_array() {
            builder.push_record([key.clone(), scalar_text(val)]);
            has_scalars = true;
        }
    }
    if has_scalars {
        print_title(title);
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        if val.is_object() || val.is_array() {
            let nested = if title.is_empty() {
                key.clone()
            } else {
                format!("{title}.{key}")
            };
            print_section(&nested, val);
        }
    }
}

fn print_title(title: &str) {
    if !title.is_empty() {
        println!("\n[{title}]");
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}
