use crate::FieldDefinition;
use modelkit_types::{EntryId, ModelId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record of user data conforming to a model's schema.
///
/// `data` is keyed by [`FieldDefinition::name`]. It is validated against the
/// model's schema at write time only; a later schema change does not touch
/// existing entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDataEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    pub dynamic_model: ModelId,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub display_value: String,
    /// Model version the data was last validated against. `None` for rows
    /// that arrived from the server without local validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl ModelDataEntry {
    /// Creates an unsaved, unpublished entry.
    pub fn new(dynamic_model: ModelId, data: Map<String, Value>) -> Self {
        Self {
            id: None,
            dynamic_model,
            data,
            is_published: false,
            display_value: String::new(),
            schema_version: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Extract a string value by field name.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Extract a boolean value by field name.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.data.get(field).and_then(Value::as_bool)
    }

    /// Extract a numeric value by field name.
    pub fn get_number(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(Value::as_f64)
    }

    /// The first non-blank textual value in field order, falling back to the
    /// entry id (or an empty string for an unsaved entry).
    pub fn derive_display_value(&self, fields: &[FieldDefinition]) -> String {
        let mut ordered: Vec<&FieldDefinition> = fields.iter().collect();
        ordered.sort_by_key(|f| f.order);

        ordered
            .into_iter()
            .filter(|f| f.field_type.capabilities().textual)
            .filter_map(|f| self.get_str(&f.name))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.map(|id| id.to_string()).unwrap_or_default())
    }

    /// Recomputes [`Self::display_value`] from the current data.
    pub fn refresh_display_value(&mut self, fields: &[FieldDefinition]) {
        self.display_value = self.derive_display_value(fields);
    }
}

/// Fills keys that are absent or `null` in `data` from the fields' default values.
pub fn apply_defaults(fields: &[FieldDefinition], data: &mut Map<String, Value>) {
    for field in fields {
        let Some(default) = &field.default_value else {
            continue;
        };
        let missing = data.get(&field.name).is_none_or(Value::is_null);
        if missing {
            data.insert(field.name.clone(), default.clone());
        }
    }
}
