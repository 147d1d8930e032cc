//! Payload normalization for create/update requests

use serde_json::{Map, Value};

/// Numeric ID of a foreign-key value.
///
/// Accepts a bare number, a select option `{ value: <number> }`, or a record
/// with an `id` field (numeric or numeric string).
pub fn entity_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Object(o) => {
            if let Some(v) = o.get("value").and_then(Value::as_i64) {
                return Some(v);
            }
            match o.get("id") {
                Some(Value::Number(n)) => n.as_i64(),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Build a request payload, sending foreign-key fields as IDs.
///
/// FK fields that resolve to an ID are replaced by it; FK fields holding
/// `null` or `""` are sent as `null`; anything else in an FK field is dropped.
/// Non-FK fields pass through unchanged.
pub fn build_payload(data: &Map<String, Value>, id_fields: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, val) in data {
        if id_fields.contains(&key.as_str()) {
            if let Some(id) = entity_id(val) {
                out.insert(key.clone(), Value::from(id));
            } else if val.is_null() || val.as_str() == Some("") {
                out.insert(key.clone(), Value::Null);
            }
        } else {
            out.insert(key.clone(), val.clone());
        }
    }
    out
}
