//! Flat key/value rendering of serializable reports.
//!
//! Nested objects become dotted keys (`parameters.lambda`), arrays use their
//! position (`volatility_clusters.0.start`). Useful for tabular output of a
//! report that is otherwise emitted as JSON.
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// # Errors
/// Any `serde_json` serialization error of `report`.
pub fn to_flat_map<T: Serialize>(report: &T) -> serde_json::Result<BTreeMap<String, Value>> {
    let mut out = BTreeMap::new();
    flatten(String::new(), serde_json::to_value(report)?, &mut out);
    Ok(out)
}

fn flatten(prefix: String, value: Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(child(&prefix, &k), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.into_iter().enumerate() {
                flatten(child(&prefix, &i.to_string()), v, out);
            }
        }
        leaf => {
            out.insert(prefix, leaf);
        }
    }
}

fn child(prefix: &str, key: &str) -> String {
    if prefix.is_empty() { key.to_string() } else { format!("{prefix}.{key}") }
}
