//! Rendering for ModelKit schemas.
//!
//! Every decision here is read from the field type registry in
//! `modelkit-model`: the input control and column format of a field come
//! from [`FieldType::capabilities`](modelkit_model::FieldType::capabilities).
//! This crate produces descriptors only; drawing them is left to the
//! embedding UI.
//!
//! ```
//! use modelkit_model::{FieldDefinition, FieldType, InputControl};
//! use modelkit_render::describe;
//!
//! let field = FieldDefinition::new("active", "Active", FieldType::Boolean);
//! assert_eq!(describe(&field).control, InputControl::Switch);
//! ```

mod column;
mod config;
mod descriptor;
mod preview;
mod sample;

pub use column::{Cell, Column, format_cell, list_columns, render_entry, render_row};
pub use config::RenderConfig;
pub use descriptor::{RenderDescriptor, describe, describe_all};
pub use preview::{Preview, TablePreview, generate_preview, preview_fields};
pub use sample::{sample_value, sample_value_for_row};
