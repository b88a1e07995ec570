//! Response envelope extraction
//!
//! Collection endpoints answer `{ "entities": [...] , ... }`. Single-entity
//! operations read the first element; counts live in application metadata.

use gridsave_domain::{Entity, GridSaveError, Result};
use serde_json::Value;

fn entities_array(body: &Value) -> Result<&Vec<Value>> {
    body.get("entities")
        .and_then(Value::as_array)
        .ok_or_else(|| GridSaveError::Decode("response has no 'entities' array".to_string()))
}

fn to_entity(value: &Value) -> Result<Entity> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| GridSaveError::Decode(format!("entity is not an object: {value}")))
}

/// All entities of the envelope.
pub(crate) fn entities(body: &Value) -> Result<Vec<Entity>> {
    entities_array(body)?.iter().map(to_entity).collect()
}

/// First entity of the envelope, `None` when the array is empty.
pub(crate) fn first_entity(body: &Value) -> Result<Option<Entity>> {
    entities_array(body)?.first().map(to_entity).transpose()
}

/// `entities[0].metadata.collections[<collection>].count`
pub(crate) fn collection_count(body: &Value, collection: &str) -> Result<u64> {
    entities_array(body)?
        .first()
        .and_then(|app| app.get("metadata"))
        .and_then(|metadata| metadata.get("collections"))
        .and_then(|collections| collections.get(collection))
        .and_then(|entry| entry.get("count"))
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            GridSaveError::Decode(format!("application metadata has no count for '{collection}'"))
        })
}
