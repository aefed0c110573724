use modelkit_model::{FieldDefinition, ModelDataEntry, ModelDefinition};
use serde_json::{Map, Value};

/// Partial update of a saved model. Unset members keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub target_model: Option<Option<String>>,
    /// Full replacement field list, typically `SchemaBuilder::into_fields`.
    pub fields: Option<Vec<FieldDefinition>>,
    pub validation_rules: Option<Value>,
    pub ui_config: Option<Value>,
    pub is_active: Option<bool>,
}

impl ModelPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn target_model(mut self, target: Option<String>) -> Self {
        self.target_model = Some(target);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = Some(fields);
        self
    }

    #[must_use]
    pub fn validation_rules(mut self, rules: Value) -> Self {
        self.validation_rules = Some(rules);
        self
    }

    #[must_use]
    pub fn ui_config(mut self, config: Value) -> Self {
        self.ui_config = Some(config);
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// True when the patch replaces the field list.
    pub fn touches_schema(&self) -> bool {
        self.fields.is_some()
    }

    pub fn apply_to(self, model: &mut ModelDefinition) {
        if let Some(name) = self.name {
            model.name = name;
        }
        if let Some(display_name) = self.display_name {
            model.display_name = display_name;
        }
        if let Some(description) = self.description {
            model.description = description;
        }
        if let Some(target) = self.target_model {
            model.target_model = target;
        }
        if let Some(fields) = self.fields {
            model.fields = fields;
        }
        if let Some(rules) = self.validation_rules {
            model.validation_rules = rules;
        }
        if let Some(config) = self.ui_config {
            model.ui_config = config;
        }
        if let Some(is_active) = self.is_active {
            model.is_active = is_active;
        }
    }
}

/// Partial update of a data entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    /// Replaces the whole data record.
    pub data: Option<Map<String, Value>>,
    /// Merged over the data after `data` is applied. `null` clears a value.
    pub values: Map<String, Value>,
    pub is_published: Option<bool>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn replace_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    #[must_use]
    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    pub fn apply_to(self, entry: &mut ModelDataEntry) {
        if let Some(data) = self.data {
            entry.data = data;
        }
        for (key, value) in self.values {
            if value.is_null() {
                entry.data.remove(&key);
            } else {
                entry.data.insert(key, value);
            }
        }
        if let Some(is_published) = self.is_published {
            entry.is_published = is_published;
        }
    }
}
