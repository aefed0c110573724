//! Error types for schema authoring.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A schema problem detected locally, before any network round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields of the same model share a name.
    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    /// A name or label that must be set is empty.
    #[error("{what} must not be empty")]
    EmptyRequiredMetadata { what: String },

    /// A model must have at least one field to be saved.
    #[error("model has no fields")]
    NoFieldsDefined,

    /// A field or model name is not a valid identifier.
    #[error("invalid name '{name}': must start with a letter or underscore and contain only letters, digits and underscores")]
    InvalidFieldName { name: String },

    /// An extension model without a target.
    #[error("extension models must name a target model")]
    MissingTargetModel,

    /// Options were edited on a field whose type has none.
    #[error("field '{name}' does not take options")]
    NotAChoiceField { name: String },

    /// A field index past the end of the list.
    #[error("field index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}
