//! Value checks keyed by the registry's value shape and format.

use crate::error::ValidationErrorKind;
use modelkit_model::registry::{RATING_MAX, RATING_MIN};
use modelkit_model::{ValueFormat, ValueShape, json_kind};
use serde_json::Value;

/// A rejected value: the kind and a message without the field name.
pub(crate) type Rejection = (ValidationErrorKind, String);

/// A value that passed the shape check, reduced to what the bounds need.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Checked<'a> {
    Text(&'a str),
    Number(f64),
    List(usize),
    Other,
}

fn mismatch(expected: &str, value: &Value) -> Rejection {
    (
        ValidationErrorKind::TypeMismatch,
        format!("expected {expected}, got {}", json_kind(value)),
    )
}

fn is_reference(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Object(_))
}

/// Accepts a JSON number or a string holding a finite number.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Checks a present value against a value shape.
pub(crate) fn check_shape(shape: ValueShape, value: &Value) -> Result<Checked<'_>, Rejection> {
    match shape {
        ValueShape::Text => value
            .as_str()
            .map(Checked::Text)
            .ok_or_else(|| mismatch("a string", value)),
        ValueShape::Number => coerce_number(value)
            .map(Checked::Number)
            .ok_or_else(|| mismatch("a number", value)),
        ValueShape::Boolean => match value {
            Value::Bool(_) => Ok(Checked::Other),
            _ => Err(mismatch("true or false", value)),
        },
        ValueShape::StringList => match value {
            Value::Array(items) if items.iter().all(Value::is_string) => {
                Ok(Checked::List(items.len()))
            }
            Value::Array(_) => Err((
                ValidationErrorKind::TypeMismatch,
                "expected a list of strings".to_string(),
            )),
            _ => Err(mismatch("a list of strings", value)),
        },
        ValueShape::Reference => {
            if is_reference(value) {
                Ok(Checked::Other)
            } else {
                Err(mismatch("a file reference", value))
            }
        }
        ValueShape::ReferenceList => match value {
            Value::Array(items) if items.iter().all(is_reference) => {
                Ok(Checked::List(items.len()))
            }
            v if is_reference(v) => Ok(Checked::Other),
            _ => Err(mismatch("a file reference or a list of them", value)),
        },
    }
}

/// Checks the structural format of a value that already has the right shape.
pub(crate) fn check_format(format: ValueFormat, checked: Checked<'_>) -> Result<(), Rejection> {
    match (format, checked) {
        (ValueFormat::Email, Checked::Text(s)) if !is_email(s) => Err((
            ValidationErrorKind::TypeMismatch,
            "must be a valid email address".to_string(),
        )),
        (ValueFormat::Url, Checked::Text(s)) if url::Url::parse(s).is_err() => Err((
            ValidationErrorKind::TypeMismatch,
            "must be an absolute URL".to_string(),
        )),
        (ValueFormat::HexColor, Checked::Text(s)) if !is_hex_color(s) => Err((
            ValidationErrorKind::TypeMismatch,
            "must be a color like #1A2B3C".to_string(),
        )),
        (ValueFormat::Json, Checked::Text(s)) => serde_json::from_str::<Value>(s)
            .map(|_| ())
            .map_err(|e| (ValidationErrorKind::InvalidJson, format!("invalid JSON: {e}"))),
        (ValueFormat::Rating, Checked::Number(n)) if !(RATING_MIN..=RATING_MAX).contains(&n) => {
            Err((
                ValidationErrorKind::OutOfRange,
                format!("must be between {RATING_MIN} and {RATING_MAX}"),
            ))
        }
        _ => Ok(()),
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain.
pub(crate) fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let clean = |part: &str| {
        !part.is_empty() && !part.contains(|c: char| c == '@' || c.is_whitespace())
    };
    clean(local)
        && clean(domain)
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// `^#[0-9A-Fa-f]{6}$`
pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
