//! Commands behind the `modelkit` binary.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use modelkit_builder::check_definition;
use modelkit_model::{FieldType, ModelDefinition, apply_defaults};
use modelkit_render::{RenderConfig, generate_preview};
use modelkit_validate::generate_validator;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "modelkit")]
#[command(about = "Inspect, check and preview ModelKit schemas offline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the supported field types and their capabilities
    Types {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run the save-time schema checks on a model file
    Check { model: PathBuf },
    /// Validate a data file (one record or an array of records) against a model
    Validate {
        model: PathBuf,
        data: PathBuf,
        /// Do not fill absent values from field defaults first
        #[arg(long)]
        no_defaults: bool,
    },
    /// Print the form and table preview of a model as JSON
    Preview {
        model: PathBuf,
        /// Number of sample rows in the table preview
        #[arg(long, default_value_t = 3)]
        rows: usize,
        /// chrono format for date columns
        #[arg(long)]
        date_format: Option<String>,
    },
}

/// Runs a command, writing its report to `out`.
///
/// Returns `false` when the command ran but found problems (a failed check
/// or an invalid record); the binary turns that into a non-zero exit code.
pub fn run(command: Command, out: &mut dyn Write) -> Result<bool> {
    match command {
        Command::Types { json } => {
            write_types(out, json)?;
            Ok(true)
        }
        Command::Check { model } => {
            let model = load_model(&model)?;
            check(&model, out)
        }
        Command::Validate {
            model,
            data,
            no_defaults,
        } => {
            let model = load_model(&model)?;
            let records = load_records(&data)?;
            validate(&model, records, !no_defaults, out)
        }
        Command::Preview {
            model,
            rows,
            date_format,
        } => {
            let model = load_model(&model)?;
            let mut config = RenderConfig {
                preview_rows: rows,
                ..RenderConfig::default()
            };
            if let Some(format) = date_format {
                config.date_format = format;
            }
            let preview = generate_preview(&model, &config);
            writeln!(out, "{}", serde_json::to_string_pretty(&preview)?)?;
            Ok(true)
        }
    }
}

/// Reads a model definition from a JSON file.
pub fn load_model(path: &Path) -> Result<ModelDefinition> {
    debug!(path = %path.display(), "loading model");
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid model definition", path.display()))
}

/// Reads one record or an array of records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Map<String, Value>>> {
    debug!(path = %path.display(), "loading data");
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                _ => bail!("record #{} in {} is not an object", i + 1, path.display()),
            })
            .collect(),
        _ => bail!("{} must hold an object or an array of objects", path.display()),
    }
}

fn check(model: &ModelDefinition, out: &mut dyn Write) -> Result<bool> {
    match check_definition(model) {
        Ok(()) => {
            writeln!(
                out,
                "ok: model '{}' ({} fields)",
                model.name,
                model.fields.len()
            )?;
            Ok(true)
        }
        Err(err) => {
            writeln!(out, "error: {err}")?;
            Ok(false)
        }
    }
}

fn validate(
    model: &ModelDefinition,
    records: Vec<Map<String, Value>>,
    fill_defaults: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let validator = generate_validator(&model.fields);
    let mut all_valid = true;

    for (i, mut record) in records.into_iter().enumerate() {
        if fill_defaults {
            apply_defaults(&model.fields, &mut record);
        }
        match validator.validate(&record) {
            Ok(()) => writeln!(out, "record {}: ok", i + 1)?,
            Err(report) => {
                all_valid = false;
                writeln!(out, "record {}: {} issue(s)", i + 1, report.len())?;
                for issue in &report.issues {
                    writeln!(out, "  {}: {}: {}", issue.field_name, issue.kind, issue.message)?;
                }
            }
        }
    }
    Ok(all_valid)
}

/// One row of the `types` listing.
#[derive(Debug, Serialize)]
struct TypeRow {
    tag: String,
    value_shape: String,
    control: String,
    column: String,
    options: bool,
    file_like: bool,
    range: String,
}

/// Snake-case name of a unit enum variant, as serde writes it.
fn variant_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        _ => String::new(),
    }
}

fn write_types(out: &mut dyn Write, json: bool) -> Result<()> {
    let rows: Vec<TypeRow> = FieldType::known()
        .iter()
        .map(|ft| {
            let caps = ft.capabilities();
            TypeRow {
                tag: ft.to_string(),
                value_shape: variant_name(&caps.value_shape),
                control: variant_name(&caps.control),
                column: variant_name(&caps.column),
                options: caps.supports_options,
                file_like: caps.supports_file_like,
                range: variant_name(&caps.range_constrained),
            }
        })
        .collect();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<10} {:<15} {:<17} {:<13} {:<8} {:<9} RANGE",
        "TYPE", "SHAPE", "CONTROL", "COLUMN", "OPTIONS", "FILES"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<10} {:<15} {:<17} {:<13} {:<8} {:<9} {}",
            row.tag,
            row.value_shape,
            row.control,
            row.column,
            yes_no(row.options),
            yes_no(row.file_like),
            row.range
        )?;
    }
    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
