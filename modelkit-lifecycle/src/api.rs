//! Remote API abstraction.
//!
//! Persistence, version history and cascading deletes belong to the remote
//! API. The coordinator talks to it only through [`ModelApi`], so any HTTP
//! client (or the in-memory [`mock::InMemoryApi`]) can sit behind it.

use crate::error::RemoteResult;
use async_trait::async_trait;
use modelkit_model::{ModelDataEntry, ModelDefinition, ModelVersion};
use modelkit_types::{EntryId, ModelId, SiteId};

/// CRUD endpoints for models, their versions and their data entries.
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// Lists the models owned by `site`.
    async fn list_models(&self, site: SiteId) -> RemoteResult<Vec<ModelDefinition>>;

    async fn get_model(&self, id: ModelId) -> RemoteResult<ModelDefinition>;

    /// Persists a new model and returns it with its id and version assigned.
    async fn create_model(&self, definition: &ModelDefinition) -> RemoteResult<ModelDefinition>;

    /// Replaces a model. The returned version is higher than the stored one
    /// iff the API published a new schema version.
    async fn update_model(
        &self,
        id: ModelId,
        definition: &ModelDefinition,
    ) -> RemoteResult<ModelDefinition>;

    /// Deletes a model together with its entries.
    async fn delete_model(&self, id: ModelId) -> RemoteResult<()>;

    async fn list_versions(&self, model: ModelId) -> RemoteResult<Vec<ModelVersion>>;

    async fn list_entries(&self, model: ModelId) -> RemoteResult<Vec<ModelDataEntry>>;

    async fn create_entry(&self, entry: &ModelDataEntry) -> RemoteResult<ModelDataEntry>;

    async fn update_entry(&self, id: EntryId, entry: &ModelDataEntry)
        -> RemoteResult<ModelDataEntry>;

    async fn delete_entry(&self, id: EntryId) -> RemoteResult<()>;
}

/// An in-memory API for tests and offline use.
pub mod mock {
    use super::*;
    use crate::error::RemoteError;
    use modelkit_types::{VersionId, now};
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Debug, Default)]
    struct Store {
        next_model: u64,
        next_entry: u64,
        next_version: u64,
        models: BTreeMap<ModelId, ModelDefinition>,
        entries: BTreeMap<EntryId, ModelDataEntry>,
        versions: Vec<ModelVersion>,
        fail_next: Option<RemoteError>,
        calls: usize,
    }

    impl Store {
        fn record_version(&mut self, model: &ModelDefinition, description: &str) {
            let Some(model_id) = model.id else {
                return;
            };
            let parent_version = self
                .versions
                .iter()
                .rev()
                .find(|v| v.dynamic_model == model_id)
                .map(|v| v.id);
            self.next_version += 1;
            self.versions.push(ModelVersion {
                id: VersionId::new(self.next_version),
                dynamic_model: model_id,
                version: model.version,
                parent_version,
                changes_description: description.to_string(),
                is_rollback: false,
                fields: model.fields.clone(),
                created_by: None,
                created_at: now(),
            });
        }
    }

    /// Stores everything in process memory.
    ///
    /// Every call first waits on [`gate`](Self::gate), so a test can hold
    /// the gate to keep a request in flight. [`fail_next`](Self::fail_next)
    /// makes the next call return an error.
    #[derive(Debug, Default)]
    pub struct InMemoryApi {
        store: Mutex<Store>,
        gate: tokio::sync::Mutex<()>,
    }

    impl InMemoryApi {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call waits for this lock before touching the store.
        pub fn gate(&self) -> &tokio::sync::Mutex<()> {
            &self.gate
        }

        /// Makes the next call fail with `error`.
        pub fn fail_next(&self, error: RemoteError) {
            self.store().fail_next = Some(error);
        }

        /// Number of calls received so far.
        pub fn calls(&self) -> usize {
            self.store().calls
        }

        /// A stored model, bypassing the call counter.
        pub fn stored_model(&self, id: ModelId) -> Option<ModelDefinition> {
            self.store().models.get(&id).cloned()
        }

        /// A stored entry, bypassing the call counter.
        pub fn stored_entry(&self, id: EntryId) -> Option<ModelDataEntry> {
            self.store().entries.get(&id).cloned()
        }

        /// Inserts a model as if another session had created it.
        pub fn seed_model(&self, mut definition: ModelDefinition) -> ModelDefinition {
            let mut store = self.store();
            store.next_model += 1;
            let id = ModelId::new(store.next_model);
            definition.id = Some(id);
            definition.version = definition.version.max(1);
            definition.table_name = Some(table_name(&definition));
            store.models.insert(id, definition.clone());
            store.record_version(&definition, "Initial version");
            definition
        }

        fn store(&self) -> MutexGuard<'_, Store> {
            self.store.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Waits for the gate, counts the call and consumes a pending failure.
        async fn enter(&self) -> RemoteResult<MutexGuard<'_, Store>> {
            let _gate = self.gate.lock().await;
            let mut store = self.store();
            store.calls += 1;
            match store.fail_next.take() {
                Some(error) => Err(error),
                None => Ok(store),
            }
        }
    }

    fn table_name(definition: &ModelDefinition) -> String {
        format!("dm_{}_{}", definition.site, definition.name)
    }

    #[async_trait]
    impl ModelApi for InMemoryApi {
        async fn list_models(&self, site: SiteId) -> RemoteResult<Vec<ModelDefinition>> {
            let store = self.enter().await?;
            Ok(store
                .models
                .values()
                .filter(|m| m.site == site)
                .cloned()
                .collect())
        }

        async fn get_model(&self, id: ModelId) -> RemoteResult<ModelDefinition> {
            let store = self.enter().await?;
            store
                .models
                .get(&id)
                .cloned()
                .ok_or_else(|| RemoteError::not_found(format_args!("model {id}")))
        }

        async fn create_model(&self, definition: &ModelDefinition) -> RemoteResult<ModelDefinition> {
            let mut store = self.enter().await?;
            let taken = store
                .models
                .values()
                .any(|m| m.site == definition.site && m.name == definition.name);
            if taken {
                return Err(RemoteError::new(format!(
                    "a model named '{}' already exists",
                    definition.name
                ))
                .with_status(409));
            }

            store.next_model += 1;
            let id = ModelId::new(store.next_model);
            let stamp = now();
            let mut saved = definition.clone();
            saved.id = Some(id);
            saved.version = 1;
            saved.table_name = Some(table_name(&saved));
            saved.created_at = Some(stamp);
            saved.updated_at = Some(stamp);

            store.models.insert(id, saved.clone());
            store.record_version(&saved, "Initial version");
            Ok(saved)
        }

        async fn update_model(
            &self,
            id: ModelId,
            definition: &ModelDefinition,
        ) -> RemoteResult<ModelDefinition> {
            let mut store = self.enter().await?;
            let Some(current) = store.models.get(&id).cloned() else {
                return Err(RemoteError::not_found(format_args!("model {id}")));
            };

            let schema_changed = current.fields != definition.fields;
            let mut saved = definition.clone();
            saved.id = Some(id);
            saved.table_name = current.table_name.clone();
            saved.created_at = current.created_at;
            saved.updated_at = Some(now());
            saved.version = if schema_changed {
                current.version + 1
            } else {
                current.version
            };

            store.models.insert(id, saved.clone());
            if schema_changed {
                store.record_version(&saved, "Schema updated");
            }
            Ok(saved)
        }

        async fn delete_model(&self, id: ModelId) -> RemoteResult<()> {
            let mut store = self.enter().await?;
            if store.models.remove(&id).is_none() {
                return Err(RemoteError::not_found(format_args!("model {id}")));
            }
            store.entries.retain(|_, e| e.dynamic_model != id);
            store.versions.retain(|v| v.dynamic_model != id);
            Ok(())
        }

        async fn list_versions(&self, model: ModelId) -> RemoteResult<Vec<ModelVersion>> {
            let store = self.enter().await?;
            Ok(store
                .versions
                .iter()
                .filter(|v| v.dynamic_model == model)
                .cloned()
                .collect())
        }

        async fn list_entries(&self, model: ModelId) -> RemoteResult<Vec<ModelDataEntry>> {
            let store = self.enter().await?;
            Ok(store
                .entries
                .values()
                .filter(|e| e.dynamic_model == model)
                .cloned()
                .collect())
        }

        async fn create_entry(&self, entry: &ModelDataEntry) -> RemoteResult<ModelDataEntry> {
            let mut store = self.enter().await?;
            if !store.models.contains_key(&entry.dynamic_model) {
                return Err(RemoteError::not_found(format_args!(
                    "model {}",
                    entry.dynamic_model
                )));
            }

            store.next_entry += 1;
            let id = EntryId::new(store.next_entry);
            let stamp = now();
            let mut saved = entry.clone();
            saved.id = Some(id);
            saved.schema_version = None;
            saved.created_at = Some(stamp);
            saved.updated_at = Some(stamp);

            store.entries.insert(id, saved.clone());
            Ok(saved)
        }

        async fn update_entry(
            &self,
            id: EntryId,
            entry: &ModelDataEntry,
        ) -> RemoteResult<ModelDataEntry> {
            let mut store = self.enter().await?;
            let Some(current) = store.entries.get(&id).cloned() else {
                return Err(RemoteError::not_found(format_args!("entry {id}")));
            };

            let mut saved = entry.clone();
            saved.id = Some(id);
            saved.dynamic_model = current.dynamic_model;
            saved.schema_version = None;
            saved.created_at = current.created_at;
            saved.updated_at = Some(now());

            store.entries.insert(id, saved.clone());
            Ok(saved)
        }

        async fn delete_entry(&self, id: EntryId) -> RemoteResult<()> {
            let mut store = self.enter().await?;
            store
                .entries
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| RemoteError::not_found(format_args!("entry {id}")))
        }
    }
}
