//! Fixed sample values for previews.
//!
//! Samples are keyed by input control, which the registry derives from the
//! field type. They never vary between calls; `row` only distinguishes rows
//! of a preview table.

use modelkit_model::{FieldDefinition, InputControl, RangeConstraint, ValueFormat};
use serde_json::{Value, json};

/// Sample value for `field` in preview row `row`.
///
/// A field's `default_value` wins over the built-in sample. Bounds apply only
/// where the registry says they do: length-constrained text is cut to
/// `max_length` (formatted text falls back to a short valid sample instead),
/// and numbers are clamped into `min_value..=max_value`.
pub fn sample_value_for_row(field: &FieldDefinition, row: usize) -> Value {
    if let Some(default) = &field.default_value {
        return default.clone();
    }

    let first_option = field.option_list().first().map(|o| o.value.clone());
    let suffix = if row == 0 {
        String::new()
    } else {
        format!(" {}", row + 1)
    };

    let value = match field.field_type.capabilities().control {
        InputControl::TextInput => json!(format!("Sample text{suffix}")),
        InputControl::TextArea => json!(format!("Sample paragraph of longer text{suffix}.")),
        InputControl::RichTextEditor => json!(format!("<p>Sample rich text{suffix}</p>")),
        InputControl::NumberInput => json!(42 + row as i64),
        InputControl::RatingStars => json!(4),
        InputControl::EmailInput => json!(format!("user{}@example.com", row + 1)),
        InputControl::UrlInput => json!("https://example.com"),
        InputControl::DatePicker => json!("2024-01-15"),
        InputControl::DateTimePicker => json!("2024-01-15T09:30:00Z"),
        InputControl::TimePicker => json!("09:30"),
        InputControl::Switch => json!(row % 2 == 0),
        InputControl::Select | InputControl::RadioGroup => {
            json!(first_option.unwrap_or_default())
        }
        InputControl::MultiSelect | InputControl::CheckboxGroup => {
            json!(first_option.into_iter().collect::<Vec<_>>())
        }
        InputControl::FileUpload => json!("https://example.com/files/sample.pdf"),
        InputControl::ImageUpload => json!("https://example.com/images/sample.png"),
        InputControl::GalleryUpload => json!([
            "https://example.com/images/sample-1.png",
            "https://example.com/images/sample-2.png"
        ]),
        InputControl::ColorPicker => json!("#3366FF"),
        InputControl::JsonEditor => json!("{\"key\": \"value\"}"),
    };

    fit_bounds(field, value)
}

/// Sample value used in a form preview.
pub fn sample_value(field: &FieldDefinition) -> Value {
    sample_value_for_row(field, 0)
}

/// Shortest built-in sample that still passes the format check.
fn compact_sample(format: ValueFormat) -> Option<&'static str> {
    match format {
        ValueFormat::Email => Some("a@b.co"),
        ValueFormat::Url => Some("http://a.co"),
        ValueFormat::Json => Some("{}"),
        _ => None,
    }
}

fn fit_bounds(field: &FieldDefinition, value: Value) -> Value {
    let Some(bounds) = &field.validation else {
        return value;
    };
    let caps = field.field_type.capabilities();
    match (caps.range_constrained, value) {
        (RangeConstraint::Length, Value::String(s)) => match bounds.max_length {
            Some(max) if s.chars().count() > max => match caps.format {
                ValueFormat::Plain => Value::String(s.chars().take(max).collect()),
                // Cutting would break the format; keep the full sample if nothing shorter fits.
                format => match compact_sample(format) {
                    Some(short) if short.chars().count() <= max => json!(short),
                    _ => Value::String(s),
                },
            },
            _ => Value::String(s),
        },
        (RangeConstraint::Length, Value::Array(mut items)) => {
            if let Some(max) = bounds.max_length {
                items.truncate(max);
            }
            Value::Array(items)
        }
        (RangeConstraint::Numeric, Value::Number(n)) => {
            let Some(mut x) = n.as_f64() else {
                return Value::Number(n);
            };
            if let Some(min) = bounds.min_value {
                x = x.max(min);
            }
            if let Some(max) = bounds.max_value {
                x = x.min(max);
            }
            if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
                json!(x as i64)
            } else {
                json!(x)
            }
        }
        (_, other) => other,
    }
}
