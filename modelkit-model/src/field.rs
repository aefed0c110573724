use crate::FieldType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One choice of a `select`, `multiselect`, `radio` or `checkbox` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Optional bounds on a field's value.
///
/// Bounds that make no sense for the field's value shape are ignored, never
/// reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Regular expression source, matched anywhere in the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldValidation {
    /// True when no bound is set.
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.min_value.is_none()
            && self.max_value.is_none()
            && self.pattern.is_none()
    }
}

/// One attribute of a model's schema.
///
/// Field definitions have no identity of their own: they are embedded in a
/// [`ModelDefinition`](crate::ModelDefinition) and only change while that
/// model is being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Identifier, unique within the model.
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Present iff the type is a choice type. An empty list means "no choices yet".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default = "default_true")]
    pub show_in_list: bool,
    /// Zero-based, dense position within the owning model.
    #[serde(default)]
    pub order: u32,
}

fn default_true() -> bool {
    true
}

impl FieldDefinition {
    /// Creates an optional field with `options` initialized to match the type.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        let options = field_type.is_choice().then(Vec::new);
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            default_value: None,
            help_text: None,
            placeholder: None,
            options,
            validation: None,
            show_in_list: true,
            order: 0,
        }
    }

    /// Shorthand for a `text` field.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Text)
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Sets the choices. Ignored for non-choice types.
    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        if self.field_type.is_choice() {
            self.options = Some(options);
        }
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    #[must_use]
    pub fn hidden_in_list(mut self) -> Self {
        self.show_in_list = false;
        self
    }

    /// Choices of a choice field, empty for everything else.
    pub fn option_list(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Brings `options` in line with the type: choice types always carry a
    /// list, other types never do.
    pub fn normalize_options(&mut self) {
        if self.field_type.is_choice() {
            self.options.get_or_insert_with(Vec::new);
        } else {
            self.options = None;
        }
    }
}
