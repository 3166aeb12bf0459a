//! Recursive deep update used for smoke-test overlays.

use serde_json::{Map, Value};

/// Deep update `target` with `source`.
///
/// Mappings merge key by key, recursing when both sides hold a mapping.
/// Anything else in `source` (lists, scalars, null) replaces the target value wholesale.
pub fn deep_update(target: &Value, source: &Value) -> Value {
    match source {
        Value::Object(source_map) => {
            let mut result = match target {
                Value::Object(target_map) => target_map.clone(),
                _ => Map::new(),
            };
            for (key, value) in source_map {
                let updated = match result.get(key) {
                    Some(existing) if value.is_object() => deep_update(existing, value),
                    _ => value.clone(),
                };
                result.insert(key.clone(), updated);
            }
            Value::Object(result)
        }
        _ => source.clone(),
    }
}
