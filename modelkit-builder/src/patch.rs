use modelkit_model::{FieldDefinition, FieldOption, FieldType, FieldValidation};
use serde_json::Value;

/// A partial update to a [`FieldDefinition`].
///
/// Unset members leave the field untouched. Members that are themselves
/// optional on the field use a nested `Option`, where `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    pub default_value: Option<Option<Value>>,
    pub help_text: Option<Option<String>>,
    pub placeholder: Option<Option<String>>,
    pub options: Option<Vec<FieldOption>>,
    pub validation: Option<Option<FieldValidation>>,
    pub show_in_list: Option<bool>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Option<Value>) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn help_text(mut self, help_text: Option<String>) -> Self {
        self.help_text = Some(help_text);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn validation(mut self, validation: Option<FieldValidation>) -> Self {
        self.validation = Some(validation);
        self
    }

    #[must_use]
    pub fn show_in_list(mut self, show: bool) -> Self {
        self.show_in_list = Some(show);
        self
    }

    /// Merges the patch into `field`, then brings `options` in line with the
    /// (possibly new) type.
    pub fn apply_to(self, field: &mut FieldDefinition) {
        if let Some(name) = self.name {
            field.name = name;
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(default_value) = self.default_value {
            field.default_value = default_value;
        }
        if let Some(help_text) = self.help_text {
            field.help_text = help_text;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(options) = self.options {
            field.options = Some(options);
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(show) = self.show_in_list {
            field.show_in_list = show;
        }
        field.normalize_options();
    }
}
