//! The schema builder: the only place a model's field list is mutated.
//!
//! Every structural operation ends with a reindex, so `order` is always
//! exactly `0..n` in list order. Duplicate names are tolerated transiently
//! (a freshly duplicated field may collide) and are rejected by
//! [`SchemaBuilder::check`] at submit time; renaming into a collision is
//! rejected immediately.

use crate::check::check_fields;
use crate::error::{SchemaError, SchemaResult};
use crate::patch::FieldPatch;
use modelkit_model::{FieldDefinition, FieldOption, FieldType, ModelDefinition, reindex, slugify};
use tracing::debug;

/// Suffix appended to the name of a duplicated field.
pub const COPY_NAME_SUFFIX: &str = "_copy";
/// Suffix appended to the label of a duplicated field.
pub const COPY_LABEL_SUFFIX: &str = " (Copy)";

/// In-progress field list of a model being authored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaBuilder {
    fields: Vec<FieldDefinition>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an existing field list, sorting by `order` and reindexing.
    pub fn from_fields(fields: Vec<FieldDefinition>) -> Self {
        let mut builder = Self::new();
        builder.replace_fields(fields);
        builder
    }

    /// Loads the fields of a saved model.
    pub fn for_model(model: &ModelDefinition) -> Self {
        Self::from_fields(model.fields.clone())
    }

    /// Replaces the whole list, e.g. when a saved definition is reopened.
    pub fn replace_fields(&mut self, mut fields: Vec<FieldDefinition>) {
        fields.sort_by_key(|f| f.order);
        for field in &mut fields {
            field.normalize_options();
        }
        reindex(&mut fields);
        self.fields = fields;
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDefinition> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<FieldDefinition> {
        self.fields
    }

    /// Writes the field list into `model`.
    pub fn apply_to(&self, model: &mut ModelDefinition) {
        model.fields = self.fields.clone();
    }

    /// Runs the schema-submit checks over the current list.
    pub fn check(&self) -> SchemaResult<()> {
        check_fields(&self.fields)
    }

    fn bounds(&self, index: usize) -> SchemaResult<()> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(SchemaError::IndexOutOfBounds {
                index,
                len: self.fields.len(),
            })
        }
    }

    fn name_taken(&self, name: &str, except: Option<usize>) -> bool {
        self.fields
            .iter()
            .enumerate()
            .any(|(i, f)| Some(i) != except && f.name == name)
    }

    // ── Structural operations ────────────────────────────────────

    /// Appends an optional `text` field with a fresh placeholder name.
    /// Returns its index.
    pub fn add_field(&mut self) -> usize {
        let mut n = self.fields.len() + 1;
        while self.name_taken(&format!("field_{n}"), None) {
            n += 1;
        }
        let field = FieldDefinition::new(format!("field_{n}"), format!("Field {n}"), FieldType::Text);
        self.push(field)
    }

    /// Appends a prepared field. Returns its index.
    pub fn push(&mut self, mut field: FieldDefinition) -> usize {
        field.normalize_options();
        self.fields.push(field);
        reindex(&mut self.fields);
        let index = self.fields.len() - 1;
        debug!(index, name = %self.fields[index].name, "added field");
        index
    }

    /// Merges `patch` into the field at `index`.
    ///
    /// A rename onto a name used by another field fails with
    /// [`SchemaError::DuplicateFieldName`] and leaves the list untouched. An
    /// empty name is filled in from the label when that yields a free name.
    pub fn edit_field(&mut self, index: usize, patch: FieldPatch) -> SchemaResult<()> {
        self.bounds(index)?;
        let current = &self.fields[index];
        let mut updated = current.clone();
        patch.apply_to(&mut updated);

        if updated.name.is_empty() {
            let proposed = slugify(&updated.label);
            if !proposed.is_empty() && !self.name_taken(&proposed, Some(index)) {
                updated.name = proposed;
            }
        }

        if updated.name != current.name && self.name_taken(&updated.name, Some(index)) {
            return Err(SchemaError::DuplicateFieldName { name: updated.name });
        }

        updated.order = current.order;
        debug!(index, name = %updated.name, "edited field");
        self.fields[index] = updated;
        Ok(())
    }

    /// Deletes the field at `index` and closes the gap.
    pub fn remove_field(&mut self, index: usize) -> SchemaResult<FieldDefinition> {
        self.bounds(index)?;
        let removed = self.fields.remove(index);
        reindex(&mut self.fields);
        debug!(index, name = %removed.name, "removed field");
        Ok(removed)
    }

    /// Appends a copy of the field at `index` with suffixed name and label.
    /// Returns the copy's index.
    pub fn duplicate_field(&mut self, index: usize) -> SchemaResult<usize> {
        self.bounds(index)?;
        let mut copy = self.fields[index].clone();
        copy.name.push_str(COPY_NAME_SUFFIX);
        copy.label.push_str(COPY_LABEL_SUFFIX);
        Ok(self.push(copy))
    }

    /// Moves the field at `from` so it ends up at position `to`.
    pub fn move_field(&mut self, from: usize, to: usize) -> SchemaResult<()> {
        self.bounds(from)?;
        self.bounds(to)?;
        if from != to {
            let field = self.fields.remove(from);
            self.fields.insert(to, field);
        }
        reindex(&mut self.fields);
        debug!(from, to, "moved field");
        Ok(())
    }

    /// Swaps the field with its predecessor. No-op on the first field.
    pub fn move_up(&mut self, index: usize) -> SchemaResult<()> {
        self.bounds(index)?;
        match index {
            0 => Ok(()),
            _ => self.move_field(index, index - 1),
        }
    }

    /// Swaps the field with its successor. No-op on the last field.
    pub fn move_down(&mut self, index: usize) -> SchemaResult<()> {
        self.bounds(index)?;
        if index + 1 == self.fields.len() {
            return Ok(());
        }
        self.move_field(index, index + 1)
    }

    // ── Choice options ───────────────────────────────────────────

    fn choice_field_mut(&mut self, index: usize) -> SchemaResult<&mut Vec<FieldOption>> {
        self.bounds(index)?;
        let field = &mut self.fields[index];
        if !field.field_type.is_choice() {
            return Err(SchemaError::NotAChoiceField {
                name: field.name.clone(),
            });
        }
        Ok(field.options.get_or_insert_with(Vec::new))
    }

    /// Appends a choice to the choice field at `index`.
    pub fn add_option(&mut self, index: usize, option: FieldOption) -> SchemaResult<()> {
        self.choice_field_mut(index)?.push(option);
        Ok(())
    }

    /// Removes choice `option_index` from the choice field at `index`.
    pub fn remove_option(&mut self, index: usize, option_index: usize) -> SchemaResult<FieldOption> {
        let options = self.choice_field_mut(index)?;
        if option_index >= options.len() {
            return Err(SchemaError::IndexOutOfBounds {
                index: option_index,
                len: options.len(),
            });
        }
        Ok(options.remove(option_index))
    }
}
