use crate::column::{Cell, Column, format_cell, list_columns};
use crate::descriptor::{RenderDescriptor, describe_all};
use crate::sample::sample_value_for_row;
use crate::RenderConfig;
use modelkit_model::{FieldDefinition, ModelDefinition};
use serde::Serialize;

/// Sample table for a schema: its list columns filled with sample rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<Column>,
    pub sample_rows: Vec<Vec<Cell>>,
}

/// What a schema looks like before any data exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub form: Vec<RenderDescriptor>,
    pub table: TablePreview,
}

/// Builds a preview of an unsaved field list. Deterministic for a given
/// input.
pub fn preview_fields(fields: &[FieldDefinition], config: &RenderConfig) -> Preview {
    let mut listed: Vec<&FieldDefinition> = fields.iter().filter(|f| f.show_in_list).collect();
    listed.sort_by_key(|f| f.order);

    let sample_rows = (0..config.preview_rows)
        .map(|row| {
            listed
                .iter()
                .map(|f| format_cell(f, Some(&sample_value_for_row(f, row)), config))
                .collect()
        })
        .collect();

    Preview {
        form: describe_all(fields),
        table: TablePreview {
            columns: list_columns(fields),
            sample_rows,
        },
    }
}

/// Builds a preview of a model's current schema.
pub fn generate_preview(model: &ModelDefinition, config: &RenderConfig) -> Preview {
    preview_fields(&model.fields, config)
}
