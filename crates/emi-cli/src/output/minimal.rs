use serde_json::Value;

use super::scalar_text;

/// Headline figures, most specific first: savings when a plan was applied,
/// otherwise the baseline EMI.
const PRIORITY_PATHS: [&[&str]; 4] = [
    &["savings", "interest_saved"],
    &["baseline", "emi"],
    &["emi"],
    &["interest_saved"],
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(found) = lookup(result, path).filter(|v| !v.is_null()) {
            println!("{}", scalar_text(found));
            return;
        }
    }

    match result {
        Value::Array(rows) => println!("{}", rows.len()),
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar_text(val));
            }
        }
        other => println!("{}", scalar_text(other)),
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}
