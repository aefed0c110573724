use crate::FieldDefinition;
use modelkit_types::{ModelId, SiteId, Timestamp, UserId, VersionId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a model stands alone or augments an existing built-in entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    #[default]
    Standalone,
    Extension,
}

/// A tenant-scoped content type: ordered fields plus metadata.
///
/// `id`, `table_name` and the timestamps are assigned by the remote API and
/// are `None` on a draft that has never been saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ModelId>,
    /// Technical slug.
    pub name: String,
    pub display_name: String,
    pub site: SiteId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model_type: ModelType,
    /// Built-in entity an extension model augments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model: Option<String>,
    /// Owned exclusively by this model; edit through the schema builder.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default = "empty_object")]
    pub validation_rules: Value,
    #[serde(default = "empty_object")]
    pub ui_config: Value,
    #[serde(default = "initial_version")]
    pub version: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn initial_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl ModelDefinition {
    /// Creates an unsaved standalone model with no fields.
    pub fn draft(site: SiteId, name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            display_name: display_name.into(),
            site,
            description: String::new(),
            model_type: ModelType::Standalone,
            target_model: None,
            fields: Vec::new(),
            validation_rules: empty_object(),
            ui_config: empty_object(),
            version: initial_version(),
            is_active: true,
            table_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    /// Turns the draft into an extension of `target`.
    #[must_use]
    pub fn extending(mut self, target: impl Into<String>) -> Self {
        self.model_type = ModelType::Extension;
        self.target_model = Some(target.into());
        self
    }

    /// Fields in render order.
    pub fn ordered_fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Fields that contribute a column to the tabular view, in render order.
    pub fn list_fields(&self) -> Vec<&FieldDefinition> {
        self.ordered_fields()
            .into_iter()
            .filter(|f| f.show_in_list)
            .collect()
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Append-only audit record written by the remote API on each schema publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub id: VersionId,
    pub dynamic_model: ModelId,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version: Option<VersionId>,
    #[serde(default)]
    pub changes_description: String,
    #[serde(default)]
    pub is_rollback: bool,
    /// Schema as it was published.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    pub created_at: Timestamp,
}
