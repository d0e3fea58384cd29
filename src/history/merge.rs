//! Recursive key-wise merge for partial slide updates.

use serde_json::{Map, Value};

/// Merge a partial update into an existing JSON value, returning a new
/// value.
///
/// For every key in `patch`: if both the existing value and the new value
/// are objects, merge recursively; otherwise the new value replaces the
/// old one wholesale. Arrays are replaced, not merged element-wise.
/// Neither input is mutated.
pub fn deep_merge(original: &Value, patch: &Value) -> Value {
    match (original, patch) {
        (Value::Object(orig), Value::Object(upd)) => {
            let mut merged: Map<String, Value> = orig.clone();
            for (key, new_value) in upd {
                match (merged.get(key), new_value) {
                    (Some(Value::Object(_)), Value::Object(_)) => {
                        let combined = deep_merge(&merged[key], new_value);
                        merged.insert(key.clone(), combined);
                    }
                    _ => {
                        merged.insert(key.clone(), new_value.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}
