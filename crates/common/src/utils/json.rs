//! Entity identifier helpers

use gridsave_domain::Entity;
use serde_json::Value;

/// Render an identifier value as a URL path segment.
///
/// Returns `None` for values that cannot identify an entity: `null`, empty
/// strings, booleans, arrays and objects.
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identifier stored under `id_property`, if the entity carries a usable one.
pub fn entity_id(entity: &Entity, id_property: &str) -> Option<String> {
    entity.get(id_property).and_then(id_to_string)
}
