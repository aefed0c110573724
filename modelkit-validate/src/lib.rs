//! Record validation for ModelKit.
//!
//! [`generate_validator`] turns a model's field list into a
//! [`RecordValidator`]; the checks it applies come from the field type
//! registry in `modelkit-model`, the same table the renderer uses.
//!
//! ```
//! use modelkit_model::{FieldDefinition, FieldType};
//! use modelkit_validate::{ValidationErrorKind, generate_validator};
//! use serde_json::json;
//!
//! let fields = vec![FieldDefinition::new("email", "Email", FieldType::Email).required(true)];
//! let validator = generate_validator(&fields);
//!
//! assert!(validator.validate_value(&json!({"email": "a@b.com"})).is_ok());
//! let report = validator.validate_value(&json!({"email": "nope"})).unwrap_err();
//! assert_eq!(report.kinds(), vec![ValidationErrorKind::TypeMismatch]);
//! ```

mod checks;
mod error;
mod generator;

pub use error::{ValidationErrorKind, ValidationIssue, ValidationReport, ValidationResult};
pub use generator::{RecordValidator, generate_validator};
