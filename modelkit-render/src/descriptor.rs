use crate::sample::sample_value;
use modelkit_model::{ColumnFormat, FieldDefinition, FieldOption, FieldType, InputControl};
use serde::Serialize;
use serde_json::Value;

/// Everything a form needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDescriptor {
    pub field_name: String,
    pub label: String,
    pub field_type: FieldType,
    pub control: InputControl,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Empty unless the control offers choices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Whether the control hands the value off to file storage.
    pub accepts_files: bool,
    pub sample_value: Value,
    pub show_in_list: bool,
    pub column: ColumnFormat,
}

/// Maps a field to its render descriptor.
///
/// Total over every field type, including tags this build does not know,
/// which render as a text input.
pub fn describe(field: &FieldDefinition) -> RenderDescriptor {
    let caps = field.field_type.capabilities();
    let options = if caps.supports_options {
        field.option_list().to_vec()
    } else {
        Vec::new()
    };

    RenderDescriptor {
        field_name: field.name.clone(),
        label: field.label.clone(),
        field_type: field.field_type.clone(),
        control: caps.control,
        required: field.required,
        placeholder: field.placeholder.clone(),
        help_text: field.help_text.clone(),
        options,
        accepts_files: caps.supports_file_like,
        sample_value: sample_value(field),
        show_in_list: field.show_in_list,
        column: caps.column,
    }
}

/// Descriptors for all fields in `order`.
pub fn describe_all(fields: &[FieldDefinition]) -> Vec<RenderDescriptor> {
    let mut ordered: Vec<&FieldDefinition> = fields.iter().collect();
    ordered.sort_by_key(|f| f.order);
    ordered.into_iter().map(describe).collect()
}
