//! YAML and JSON data handling utilities.

use cmkits_types::{KitError, Result};
use serde::Serialize;
use serde_json::Value;

/// Load YAML from string.
pub fn load_yaml(content: &str) -> Result<Value> {
    serde_yaml::from_str(content).map_err(KitError::Yaml)
}

/// Parse JSON that a human may have edited: comments and trailing commas are
/// tolerated.
pub fn parse_permissive_json(content: &str) -> Result<Value> {
    json5::from_str(content)
        .map_err(|e| KitError::Other(format!("Failed to parse JSON: {}", e)))
}

/// Serialize as pretty JSON with two-space indentation.
pub fn to_pretty_json(data: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(KitError::Json)
}

/// Deep merge two values.
/// Recursively merges objects, with overlay values taking precedence.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay_val) => overlay_val,
    }
}
