//! Validation outcome types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required field is absent, `null` or an empty string.
    RequiredFieldMissing,
    /// The value has the wrong JSON shape or format for the field type.
    TypeMismatch,
    /// A `json` field holds a string that does not parse.
    InvalidJson,
    /// A string does not match the field's `pattern`.
    PatternMismatch,
    /// A number, length or rating falls outside its bounds.
    OutOfRange,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RequiredFieldMissing => "required field missing",
            Self::TypeMismatch => "type mismatch",
            Self::InvalidJson => "invalid JSON",
            Self::PatternMismatch => "pattern mismatch",
            Self::OutOfRange => "out of range",
        };
        f.write_str(s)
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field_name: String,
    pub kind: ValidationErrorKind,
    /// Human-readable explanation, suitable for showing next to the input.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field_name: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Every issue found in a record, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("record failed validation: {}", summarize(.issues))]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field_name, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// The issue reported for `field_name`, if any.
    pub fn issue_for(&self, field_name: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.field_name == field_name)
    }

    /// Kinds in report order, handy for assertions and summaries.
    pub fn kinds(&self) -> Vec<ValidationErrorKind> {
        self.issues.iter().map(|i| i.kind).collect()
    }
}

/// Outcome of validating one record.
pub type ValidationResult = Result<(), ValidationReport>;
