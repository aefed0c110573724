//! Conversion between field lists and the schema record stored by the remote API.
//!
//! The API stores a model's fields as a JSON array of field records. Loading
//! sorts by `order` and reindexes, so a list saved with gaps or repeats comes
//! back dense.

use crate::{FieldDefinition, ModelError, ModelResult};
use serde_json::Value;

/// Reassigns `order` to `0..n` following the current slice order.
pub fn reindex(fields: &mut [FieldDefinition]) {
    for (position, field) in fields.iter_mut().enumerate() {
        field.order = position as u32;
    }
}

/// True if the `order` values are exactly `0..n` in slice order.
pub fn is_densely_ordered(fields: &[FieldDefinition]) -> bool {
    fields
        .iter()
        .enumerate()
        .all(|(position, field)| field.order as usize == position)
}

/// Serializes fields as the API's schema record: an array in `order` order.
pub fn fields_to_schema(fields: &[FieldDefinition]) -> ModelResult<Value> {
    let mut ordered: Vec<&FieldDefinition> = fields.iter().collect();
    ordered.sort_by_key(|f| f.order);
    Ok(serde_json::to_value(ordered)?)
}

/// Parses a schema record back into fields.
///
/// Accepts either the bare array or an object carrying it under `"fields"`.
/// The result is sorted by `order` (ties keep record order), reindexed, and
/// has `options` normalized to the field type.
pub fn fields_from_schema(schema: &Value) -> ModelResult<Vec<FieldDefinition>> {
    let records = match schema {
        Value::Array(_) => schema,
        Value::Object(map) => map.get("fields").ok_or_else(|| {
            ModelError::InvalidSchema("schema object has no \"fields\" array".to_string())
        })?,
        other => {
            return Err(ModelError::InvalidSchema(format!(
                "expected an array of fields, got {}",
                json_kind(other)
            )));
        }
    };

    let mut fields: Vec<FieldDefinition> = serde_json::from_value(records.clone())?;
    fields.sort_by_key(|f| f.order);
    reindex(&mut fields);
    for field in &mut fields {
        field.normalize_options();
    }
    Ok(fields)
}

/// Describes a JSON value's kind for messages ("string", "array", ...).
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
