//! Schema authoring for ModelKit.
//!
//! [`SchemaBuilder`] holds the field list of a model while it is being
//! edited and exposes the add/edit/remove/duplicate/move operations. The
//! [`check`] module runs the local checks that gate a save.

mod builder;
pub mod check;
mod error;
mod patch;

pub use builder::{COPY_LABEL_SUFFIX, COPY_NAME_SUFFIX, SchemaBuilder};
pub use check::{check_definition, check_fields};
pub use error::{SchemaError, SchemaResult};
pub use patch::FieldPatch;
