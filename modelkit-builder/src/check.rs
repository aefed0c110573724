//! Schema-submit checks.
//!
//! These run before a model is sent to the remote API. The first problem
//! found is reported.

use crate::error::{SchemaError, SchemaResult};
use modelkit_model::{FieldDefinition, ModelDefinition, ModelType, is_valid_identifier};
use std::collections::HashSet;

fn require(value: &str, what: impl Into<String>) -> SchemaResult<()> {
    if value.trim().is_empty() {
        return Err(SchemaError::EmptyRequiredMetadata { what: what.into() });
    }
    Ok(())
}

/// Checks a field list: at least one field, every field named with a valid
/// identifier and labelled, no name used twice.
pub fn check_fields(fields: &[FieldDefinition]) -> SchemaResult<()> {
    if fields.is_empty() {
        return Err(SchemaError::NoFieldsDefined);
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        require(&field.name, format!("name of field #{}", index + 1))?;
        if !is_valid_identifier(&field.name) {
            return Err(SchemaError::InvalidFieldName {
                name: field.name.clone(),
            });
        }
        require(&field.label, format!("label of field '{}'", field.name))?;
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

/// Checks model metadata and its field list.
pub fn check_definition(model: &ModelDefinition) -> SchemaResult<()> {
    require(&model.name, "model name")?;
    if !is_valid_identifier(&model.name) {
        return Err(SchemaError::InvalidFieldName {
            name: model.name.clone(),
        });
    }
    require(&model.display_name, "model display name")?;

    if model.model_type == ModelType::Extension
        && model.target_model.as_deref().is_none_or(|t| t.trim().is_empty())
    {
        return Err(SchemaError::MissingTargetModel);
    }

    check_fields(&model.fields)
}
