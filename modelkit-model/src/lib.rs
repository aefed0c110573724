//! Schema data model for ModelKit.
//!
//! Defines the types every other ModelKit crate builds on:
//! - [`FieldType`]: the closed set of field kinds, with a fail-open `Unknown` tag
//! - [`FieldCapabilities`]: the single registry table describing each kind
//! - [`FieldDefinition`] / [`ModelDefinition`]: a tenant-scoped schema
//! - [`ModelVersion`]: the append-only publish record
//! - [`ModelDataEntry`]: one record of data conforming to a schema
//!
//! All types serialize with the field names the remote API uses.

mod entry;
mod field;
mod field_type;
mod ident;
mod model;
pub mod registry;
mod schema;

pub use entry::{ModelDataEntry, apply_defaults};
pub use field::{FieldDefinition, FieldOption, FieldValidation};
pub use field_type::FieldType;
pub use ident::{is_valid_identifier, slugify};
pub use model::{ModelDefinition, ModelType, ModelVersion};
pub use registry::{
    ColumnFormat, FieldCapabilities, InputControl, RangeConstraint, ValueFormat, ValueShape,
    capabilities,
};
pub use schema::{fields_from_schema, fields_to_schema, is_densely_ordered, json_kind, reindex};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while converting schema records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
