//! List-view columns and cell formatting.

use crate::RenderConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use modelkit_model::{ColumnFormat, FieldDefinition, ModelDataEntry};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{self, Write};

static NULL: Value = Value::Null;

/// One column of a model's tabular view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub field_name: String,
    pub label: String,
    pub format: ColumnFormat,
}

/// A formatted table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Badge { label: String, positive: bool },
    /// Stand-in for a value that cannot be shown inline.
    Placeholder(String),
}

impl Cell {
    /// Displayed text.
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Placeholder(s) => s.as_str(),
            Cell::Badge { label, .. } => label.as_str(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Columns for the fields flagged `show_in_list`, in field order.
pub fn list_columns(fields: &[FieldDefinition]) -> Vec<Column> {
    let mut listed: Vec<&FieldDefinition> = fields.iter().filter(|f| f.show_in_list).collect();
    listed.sort_by_key(|f| f.order);
    listed
        .into_iter()
        .map(|f| Column {
            field_name: f.name.clone(),
            label: f.label.clone(),
            format: f.field_type.capabilities().column,
        })
        .collect()
}

/// Formats one value for the list view. `None` means the key is absent.
pub fn format_cell(field: &FieldDefinition, value: Option<&Value>, config: &RenderConfig) -> Cell {
    let value = value.unwrap_or(&NULL);
    match field.field_type.capabilities().column {
        ColumnFormat::YesNoBadge => match value {
            Value::Bool(b) => yes_no(*b, config),
            Value::Null => yes_no(false, config),
            other => plain(field, other, config),
        },
        ColumnFormat::Date => match value.as_str().and_then(|s| format_date(s, config)) {
            Some(text) => Cell::Text(text),
            None => plain(field, value, config),
        },
        ColumnFormat::DateTime => match value.as_str().and_then(|s| format_datetime(s, config)) {
            Some(text) => Cell::Text(text),
            None => plain(field, value, config),
        },
        ColumnFormat::Plain => plain(field, value, config),
    }
}

/// Formats an entry's data as a table row, one cell per listed field.
pub fn render_row(fields: &[FieldDefinition], data: &Map<String, Value>, config: &RenderConfig) -> Vec<Cell> {
    let mut listed: Vec<&FieldDefinition> = fields.iter().filter(|f| f.show_in_list).collect();
    listed.sort_by_key(|f| f.order);
    listed
        .into_iter()
        .map(|f| format_cell(f, data.get(&f.name), config))
        .collect()
}

/// Shorthand for [`render_row`] over an entry's data.
pub fn render_entry(fields: &[FieldDefinition], entry: &ModelDataEntry, config: &RenderConfig) -> Vec<Cell> {
    render_row(fields, &entry.data, config)
}

fn yes_no(b: bool, config: &RenderConfig) -> Cell {
    let label = if b { &config.yes_label } else { &config.no_label };
    Cell::Badge {
        label: label.clone(),
        positive: b,
    }
}

fn plain(field: &FieldDefinition, value: &Value, config: &RenderConfig) -> Cell {
    match value {
        Value::Object(_) => Cell::Placeholder(config.object_placeholder.clone()),
        Value::Array(items) => {
            if items.iter().any(Value::is_object) {
                return Cell::Placeholder(config.object_placeholder.clone());
            }
            let parts: Vec<String> = items.iter().map(|v| scalar(field, v)).collect();
            Cell::Text(parts.join(", "))
        }
        other => Cell::Text(scalar(field, other)),
    }
}

/// String coercion. Choice values show their option label when one matches.
fn scalar(field: &FieldDefinition, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => field
            .option_list()
            .iter()
            .find(|o| &o.value == s)
            .map_or_else(|| s.clone(), |o| o.label.clone()),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Renders a chrono formatter, `None` when the configured pattern is invalid.
fn render(item: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{item}").ok()?;
    Some(out)
}

fn format_date(raw: &str, config: &RenderConfig) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))?;
    render(date.format(&config.date_format))
}

fn format_datetime(raw: &str, config: &RenderConfig) -> Option<String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return render(dt.naive_utc().format(&config.datetime_format));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return render(dt.format(&config.datetime_format));
        }
    }
    format_date(raw, config)
}
