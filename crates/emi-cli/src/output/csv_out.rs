use serde_json::Value;
use std::io;

use super::scalar_text;

/// Write output as CSV to stdout. Arrays of objects become one row per
/// element; anything else is flattened to `field,value` pairs with dotted
/// field paths.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let written = match body {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let mut pairs = Vec::new();
            flatten("", body, &mut pairs);
            wtr.write_record(["field", "value"])
                .and_then(|_| {
                    pairs
                        .iter()
                        .try_for_each(|(k, v)| wtr.write_record([k.as_str(), v.as_str()]))
                })
        }
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

fn write_rows(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    rows: &[Value],
) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return rows
            .iter()
            .try_for_each(|item| wtr.write_record([scalar_text(item)]));
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

/// Schedule entry arrays are summarized by their length to keep the pair
/// listing readable; use `--entries` for the rows themselves.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        Value::Array(arr) => out.push((format!("{prefix}.len"), arr.len().to_string())),
        _ => out.push((prefix.to_string(), scalar_text(value))),
    }
}
