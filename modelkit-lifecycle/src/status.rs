//! Per-entity request state.
//!
//! Each model and entry moves `Idle -> Pending -> Idle | Failed`. Only one
//! request per entity may be in flight; a second one is rejected, not queued.

use modelkit_types::{EntryId, ModelId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identifies an entity the coordinator tracks requests for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EntityKey {
    Model(ModelId),
    Entry(EntryId),
    /// An unsaved model, keyed by its technical name.
    ModelDraft(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Model(id) => write!(f, "model {id}"),
            EntityKey::Entry(id) => write!(f, "entry {id}"),
            EntityKey::ModelDraft(name) => write!(f, "model draft '{name}'"),
        }
    }
}

/// Request state of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum EntityStatus {
    #[default]
    Idle,
    Pending,
    /// The last request failed with this message. Cleared by the next attempt.
    Failed { message: String },
}

impl EntityStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EntityStatus::Pending)
    }
}

/// Status table. Entities without an entry are idle.
#[derive(Debug, Default)]
pub(crate) struct StatusTable {
    entries: HashMap<EntityKey, EntityStatus>,
}

impl StatusTable {
    pub(crate) fn get(&self, key: &EntityKey) -> EntityStatus {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Marks `key` pending. Returns false if it already was.
    pub(crate) fn begin(&mut self, key: &EntityKey) -> bool {
        if self.get(key).is_pending() {
            return false;
        }
        self.entries.insert(key.clone(), EntityStatus::Pending);
        true
    }

    pub(crate) fn succeed(&mut self, key: &EntityKey) {
        self.entries.remove(key);
    }

    pub(crate) fn fail(&mut self, key: &EntityKey, message: impl Into<String>) {
        self.entries.insert(
            key.clone(),
            EntityStatus::Failed {
                message: message.into(),
            },
        );
    }
}
