//! Compiles a field list into a [`RecordValidator`].
//!
//! Per field, in order: presence, then shape and format from the registry,
//! then the bounds from [`FieldValidation`] that apply to the field's range
//! constraint, then `pattern` for text values. The first failure of a field
//! is reported and the remaining checks for that field are skipped.
//!
//! A validator is immutable. Regenerate it whenever the schema changes.

use crate::checks::{Checked, Rejection, check_format, check_shape};
use crate::error::{ValidationErrorKind, ValidationIssue, ValidationReport, ValidationResult};
use modelkit_model::{
    FieldCapabilities, FieldDefinition, FieldValidation, RangeConstraint, json_kind,
};
use regex_lite::Regex;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug)]
enum Pattern {
    Compiled(Regex),
    Invalid { source: String, error: String },
}

#[derive(Debug)]
struct FieldRule {
    name: String,
    label: String,
    required: bool,
    capabilities: FieldCapabilities,
    bounds: FieldValidation,
    pattern: Option<Pattern>,
}

/// Validates data records against the schema it was generated from.
#[derive(Debug)]
pub struct RecordValidator {
    rules: Vec<FieldRule>,
}

/// Builds a validator for `fields`.
pub fn generate_validator(fields: &[FieldDefinition]) -> RecordValidator {
    let mut ordered: Vec<&FieldDefinition> = fields.iter().collect();
    ordered.sort_by_key(|f| f.order);

    let rules = ordered
        .into_iter()
        .map(|field| {
            let bounds = field.validation.clone().unwrap_or_default();
            let pattern = bounds.pattern.as_deref().map(|source| match Regex::new(source) {
                Ok(regex) => Pattern::Compiled(regex),
                Err(e) => Pattern::Invalid {
                    source: source.to_string(),
                    error: e.to_string(),
                },
            });
            FieldRule {
                name: field.name.clone(),
                label: if field.label.trim().is_empty() {
                    field.name.clone()
                } else {
                    field.label.clone()
                },
                required: field.required,
                capabilities: field.field_type.capabilities(),
                bounds,
                pattern,
            }
        })
        .collect();

    RecordValidator { rules }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl FieldRule {
    fn check(&self, value: Option<&Value>) -> Option<Rejection> {
        if is_absent(value) {
            return self.required.then(|| {
                (
                    ValidationErrorKind::RequiredFieldMissing,
                    format!("{} is required", self.label),
                )
            });
        }
        let value = value?;

        let checked = match check_shape(self.capabilities.value_shape, value) {
            Ok(checked) => checked,
            Err(rejection) => return Some(rejection),
        };
        if let Err(rejection) = check_format(self.capabilities.format, checked) {
            return Some(rejection);
        }
        if let Err(rejection) = self.check_bounds(checked) {
            return Some(rejection);
        }
        self.check_pattern(checked).err()
    }

    fn check_bounds(&self, checked: Checked<'_>) -> Result<(), Rejection> {
        let b = &self.bounds;
        match (self.capabilities.range_constrained, checked) {
            (RangeConstraint::Length, Checked::Text(s)) => {
                check_length(s.chars().count(), b, "characters")
            }
            (RangeConstraint::Length, Checked::List(n)) => check_length(n, b, "items"),
            (RangeConstraint::Numeric, Checked::Number(n)) => {
                if let Some(min) = b.min_value.filter(|min| n < *min) {
                    return Err((
                        ValidationErrorKind::OutOfRange,
                        format!("must be at least {min}"),
                    ));
                }
                if let Some(max) = b.max_value.filter(|max| n > *max) {
                    return Err((
                        ValidationErrorKind::OutOfRange,
                        format!("must be at most {max}"),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_pattern(&self, checked: Checked<'_>) -> Result<(), Rejection> {
        let (Some(pattern), Checked::Text(s)) = (&self.pattern, checked) else {
            return Ok(());
        };
        match pattern {
            Pattern::Compiled(regex) if regex.is_match(s) => Ok(()),
            Pattern::Compiled(regex) => Err((
                ValidationErrorKind::PatternMismatch,
                format!("must match {}", regex.as_str()),
            )),
            Pattern::Invalid { source, error } => Err((
                ValidationErrorKind::PatternMismatch,
                format!("pattern {source:?} is not a valid regular expression: {error}"),
            )),
        }
    }
}

fn check_length(len: usize, b: &FieldValidation, unit: &str) -> Result<(), Rejection> {
    if let Some(min) = b.min_length.filter(|min| len < *min) {
        return Err((
            ValidationErrorKind::OutOfRange,
            format!("must have at least {min} {unit}"),
        ));
    }
    if let Some(max) = b.max_length.filter(|max| len > *max) {
        return Err((
            ValidationErrorKind::OutOfRange,
            format!("must have at most {max} {unit}"),
        ));
    }
    Ok(())
}

impl RecordValidator {
    /// Validates one record. Keys not named by the schema are ignored.
    pub fn validate(&self, data: &Map<String, Value>) -> ValidationResult {
        let issues: Vec<ValidationIssue> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.check(data.get(&rule.name))
                    .map(|(kind, message)| ValidationIssue::new(&rule.name, kind, message))
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            debug!(issues = issues.len(), "record failed validation");
            Err(ValidationReport { issues })
        }
    }

    /// Validates a record given as an arbitrary JSON value. Anything other
    /// than an object is a single record-level type mismatch.
    pub fn validate_value(&self, data: &Value) -> ValidationResult {
        match data {
            Value::Object(map) => self.validate(map),
            other => Err(ValidationReport {
                issues: vec![ValidationIssue::new(
                    "",
                    ValidationErrorKind::TypeMismatch,
                    format!("expected a record object, got {}", json_kind(other)),
                )],
            }),
        }
    }

    /// Names of the fields this validator checks, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }
}
