//! Lifecycle coordinator: remote writes plus the local caches they feed.
//!
//! Every mutating operation runs the same sequence: local checks, mark the
//! entity pending, call the API, then either update the cache and go idle or
//! record the failure and notify. Nothing in the cache changes before the API
//! has acknowledged the write.

use crate::api::ModelApi;
use crate::error::{LifecycleError, LifecycleResult, RemoteError, RemoteResult};
use crate::notify::{Notification, Notifier};
use crate::patch::{EntryPatch, ModelPatch};
use crate::status::{EntityKey, EntityStatus, StatusTable};
use modelkit_builder::{COPY_LABEL_SUFFIX, COPY_NAME_SUFFIX, SchemaBuilder, check_definition};
use modelkit_model::{ModelDataEntry, ModelDefinition, ModelVersion, apply_defaults};
use modelkit_types::{EntryId, ModelId, SiteId};
use modelkit_validate::generate_validator;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration for the lifecycle coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Tenant every model is created in and listed from.
    pub site: SiteId,
    /// Appended to a model's name when it is duplicated.
    pub copy_suffix: String,
    /// Send a success notification after each completed write.
    pub notify_success: bool,
    /// Validate entry data against the current schema before submitting it.
    pub validate_before_submit: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            site: SiteId::new(1),
            copy_suffix: COPY_NAME_SUFFIX.to_string(),
            notify_success: true,
            validate_before_submit: true,
        }
    }
}

impl CoordinatorConfig {
    /// Default configuration scoped to `site`.
    pub fn for_site(site: SiteId) -> Self {
        Self {
            site,
            ..Self::default()
        }
    }
}

/// Owns the model, entry and version caches and is the only writer to them.
pub struct LifecycleCoordinator {
    config: CoordinatorConfig,
    api: Arc<dyn ModelApi>,
    notifier: Arc<dyn Notifier>,
    models: RwLock<BTreeMap<ModelId, ModelDefinition>>,
    entries: RwLock<BTreeMap<EntryId, ModelDataEntry>>,
    versions: RwLock<HashMap<ModelId, Vec<ModelVersion>>>,
    status: RwLock<StatusTable>,
}

fn require_id<T>(id: Option<T>, what: &str) -> RemoteResult<T> {
    id.ok_or_else(|| RemoteError::new(format!("the API returned a {what} without an id")))
}

impl LifecycleCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        api: Arc<dyn ModelApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            api,
            notifier,
            models: RwLock::new(BTreeMap::new()),
            entries: RwLock::new(BTreeMap::new()),
            versions: RwLock::new(HashMap::new()),
            status: RwLock::new(StatusTable::default()),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // ── Status bookkeeping ───────────────────────────────────────

    /// Current request state of an entity.
    pub async fn status(&self, key: &EntityKey) -> EntityStatus {
        self.status.read().await.get(key)
    }

    async fn begin(&self, key: &EntityKey) -> LifecycleResult<()> {
        if self.status.write().await.begin(key) {
            debug!(entity = %key, "request started");
            Ok(())
        } else {
            debug!(entity = %key, "rejected, request already in flight");
            Err(LifecycleError::Busy {
                entity: key.clone(),
            })
        }
    }

    async fn finish(&self, key: &EntityKey) {
        self.status.write().await.succeed(key);
    }

    /// Passes a successful result through. A failure marks `key` failed,
    /// notifies, and becomes [`LifecycleError::Remote`].
    async fn settle<T>(
        &self,
        key: Option<&EntityKey>,
        title: &str,
        result: RemoteResult<T>,
    ) -> LifecycleResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(entity = ?key, error = %err, "{title}");
                if let Some(key) = key {
                    self.status.write().await.fail(key, err.message.clone());
                }
                self.notifier
                    .notify(Notification::error(title).with_message(err.message.clone()));
                Err(LifecycleError::Remote(err))
            }
        }
    }

    fn notify_success(&self, title: &str, message: impl Into<String>) {
        if self.config.notify_success {
            self.notifier
                .notify(Notification::success(title).with_message(message));
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Fetches the site's models and replaces the model cache with them.
    pub async fn load_models(&self) -> LifecycleResult<Vec<ModelDefinition>> {
        let result = self.api.list_models(self.config.site).await;
        let listed = self.settle(None, "Failed to load models", result).await?;

        let site = self.config.site;
        let mut models = self.models.write().await;
        models.clear();
        for model in listed.into_iter().filter(|m| m.site == site) {
            if let Some(id) = model.id {
                models.insert(id, model);
            }
        }
        debug!(count = models.len(), site = %site, "models loaded");
        Ok(models.values().cloned().collect())
    }

    /// Fetches one model into the cache.
    pub async fn load_model(&self, id: ModelId) -> LifecycleResult<ModelDefinition> {
        let result = self.api.get_model(id).await;
        let model = self.settle(None, "Failed to load model", result).await?;
        if model.site != self.config.site {
            return Err(LifecycleError::NotFound {
                entity: EntityKey::Model(id),
            });
        }
        self.models.write().await.insert(id, model.clone());
        Ok(model)
    }

    /// Fetches a model's entries, replacing the cached ones.
    pub async fn load_entries(&self, model_id: ModelId) -> LifecycleResult<Vec<ModelDataEntry>> {
        let result = self.api.list_entries(model_id).await;
        let listed = self.settle(None, "Failed to load entries", result).await?;

        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.dynamic_model != model_id);
        for entry in &listed {
            if let Some(id) = entry.id {
                entries.insert(id, entry.clone());
            }
        }
        debug!(model_id = %model_id, count = listed.len(), "entries loaded");
        Ok(listed)
    }

    /// Fetches a model's version history.
    pub async fn load_versions(&self, model_id: ModelId) -> LifecycleResult<Vec<ModelVersion>> {
        let result = self.api.list_versions(model_id).await;
        let listed = self.settle(None, "Failed to load versions", result).await?;
        self.versions
            .write()
            .await
            .insert(model_id, listed.clone());
        Ok(listed)
    }

    /// Cached models, by id.
    pub async fn models(&self) -> Vec<ModelDefinition> {
        self.models.read().await.values().cloned().collect()
    }

    pub async fn model(&self, id: ModelId) -> Option<ModelDefinition> {
        self.models.read().await.get(&id).cloned()
    }

    /// Cached entries of a model, by id.
    pub async fn entries(&self, model_id: ModelId) -> Vec<ModelDataEntry> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.dynamic_model == model_id)
            .cloned()
            .collect()
    }

    pub async fn entry(&self, id: EntryId) -> Option<ModelDataEntry> {
        self.entries.read().await.get(&id).cloned()
    }

    /// Cached version history; empty until [`Self::load_versions`] ran.
    pub async fn versions(&self, model_id: ModelId) -> Vec<ModelVersion> {
        self.versions
            .read()
            .await
            .get(&model_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn cached_model(&self, id: ModelId) -> LifecycleResult<ModelDefinition> {
        self.model(id).await.ok_or(LifecycleError::NotFound {
            entity: EntityKey::Model(id),
        })
    }

    async fn cached_entry(&self, id: EntryId) -> LifecycleResult<ModelDataEntry> {
        self.entry(id).await.ok_or(LifecycleError::NotFound {
            entity: EntityKey::Entry(id),
        })
    }

    // ── Models ───────────────────────────────────────────────────

    /// Checks and submits a new model. On success it is cached at version 1
    /// or whatever higher version the API assigned.
    pub async fn create(&self, mut definition: ModelDefinition) -> LifecycleResult<ModelDefinition> {
        definition.site = self.config.site;
        definition.fields = SchemaBuilder::from_fields(definition.fields).into_fields();
        check_definition(&definition)?;

        let key = EntityKey::ModelDraft(definition.name.clone());
        self.begin(&key).await?;

        let result = self
            .api
            .create_model(&definition)
            .await
            .and_then(|saved| require_id(saved.id, "model").map(|id| (id, saved)));
        let (id, mut saved) = self.settle(Some(&key), "Failed to create model", result).await?;
        saved.version = saved.version.max(1);

        self.models.write().await.insert(id, saved.clone());
        self.finish(&key).await;

        info!(model_id = %id, name = %saved.name, "model created");
        self.notify_success("Model created", saved.display_name.clone());
        Ok(saved)
    }

    /// Applies `patch` to the cached model, checks it and submits it.
    ///
    /// The cached version only moves when the API reports a higher one.
    /// Concurrent edits from other sessions are not detected: the last
    /// write wins at the API.
    pub async fn update(&self, id: ModelId, patch: ModelPatch) -> LifecycleResult<ModelDefinition> {
        let current = self.cached_model(id).await?;
        let mut candidate = current.clone();
        let touches_schema = patch.touches_schema();
        patch.apply_to(&mut candidate);
        // Metadata-only patches send the field list exactly as the API returned it.
        if touches_schema {
            candidate.fields = SchemaBuilder::from_fields(candidate.fields).into_fields();
        }
        check_definition(&candidate)?;
        debug!(model_id = %id, touches_schema, "submitting model update");

        let key = EntityKey::Model(id);
        self.begin(&key).await?;

        let result = self.api.update_model(id, &candidate).await;
        let mut saved = self.settle(Some(&key), "Failed to update model", result).await?;
        saved.id = Some(id);

        let bumped = saved.version > current.version;
        if !bumped {
            saved.version = current.version;
        }

        self.models.write().await.insert(id, saved.clone());
        if bumped {
            self.versions.write().await.remove(&id);
            info!(model_id = %id, version = saved.version, "schema version published");
        }
        self.finish(&key).await;

        self.notify_success("Model updated", saved.display_name.clone());
        Ok(saved)
    }

    /// Deletes a model. The API removes its entries; the cached ones are
    /// dropped once it has confirmed.
    pub async fn remove(&self, id: ModelId) -> LifecycleResult<()> {
        let current = self.cached_model(id).await?;
        let key = EntityKey::Model(id);
        self.begin(&key).await?;

        let result = self.api.delete_model(id).await;
        self.settle(Some(&key), "Failed to delete model", result).await?;

        self.models.write().await.remove(&id);
        self.entries
            .write()
            .await
            .retain(|_, e| e.dynamic_model != id);
        self.versions.write().await.remove(&id);
        self.finish(&key).await;

        info!(model_id = %id, "model deleted");
        self.notify_success("Model deleted", current.display_name);
        Ok(())
    }

    /// Submits a copy of a cached model under a suffixed name.
    pub async fn duplicate(&self, id: ModelId) -> LifecycleResult<ModelDefinition> {
        let source = self.cached_model(id).await?;

        let mut copy = ModelDefinition::draft(
            source.site,
            format!("{}{}", source.name, self.config.copy_suffix),
            format!("{}{}", source.display_name, COPY_LABEL_SUFFIX),
        )
        .with_fields(source.fields.clone());
        copy.description = source.description.clone();
        copy.model_type = source.model_type;
        copy.target_model = source.target_model.clone();
        copy.validation_rules = source.validation_rules.clone();
        copy.ui_config = source.ui_config.clone();
        copy.is_active = source.is_active;

        debug!(model_id = %id, name = %copy.name, "duplicating model");
        self.create(copy).await
    }

    // ── Entries ──────────────────────────────────────────────────

    /// Fills defaults, validates and submits a new entry for a cached model.
    pub async fn create_entry(
        &self,
        model_id: ModelId,
        mut data: Map<String, Value>,
    ) -> LifecycleResult<ModelDataEntry> {
        let model = self.cached_model(model_id).await?;
        apply_defaults(&model.fields, &mut data);
        if self.config.validate_before_submit {
            generate_validator(&model.fields).validate(&data)?;
        }

        let mut entry = ModelDataEntry::new(model_id, data);
        entry.refresh_display_value(&model.fields);

        let result = self
            .api
            .create_entry(&entry)
            .await
            .and_then(|saved| require_id(saved.id, "entry").map(|id| (id, saved)));
        let (id, mut saved) = self.settle(None, "Failed to create entry", result).await?;
        saved.schema_version = Some(model.version);

        self.entries.write().await.insert(id, saved.clone());
        info!(model_id = %model_id, entry_id = %id, "entry created");
        self.notify_success("Entry created", saved.display_value.clone());
        Ok(saved)
    }

    /// Applies `patch` to a cached entry, revalidates and submits it.
    pub async fn update_entry(&self, id: EntryId, patch: EntryPatch) -> LifecycleResult<ModelDataEntry> {
        let current = self.cached_entry(id).await?;
        let model = self.cached_model(current.dynamic_model).await?;

        let mut candidate = current.clone();
        patch.apply_to(&mut candidate);
        if self.config.validate_before_submit {
            generate_validator(&model.fields).validate(&candidate.data)?;
        }
        candidate.refresh_display_value(&model.fields);

        let key = EntityKey::Entry(id);
        self.begin(&key).await?;

        let result = self.api.update_entry(id, &candidate).await;
        let mut saved = self.settle(Some(&key), "Failed to update entry", result).await?;
        saved.id = Some(id);
        saved.schema_version = Some(model.version);

        self.entries.write().await.insert(id, saved.clone());
        self.finish(&key).await;

        debug!(entry_id = %id, "entry updated");
        self.notify_success("Entry updated", saved.display_value.clone());
        Ok(saved)
    }

    pub async fn delete_entry(&self, id: EntryId) -> LifecycleResult<()> {
        let current = self.cached_entry(id).await?;
        let key = EntityKey::Entry(id);
        self.begin(&key).await?;

        let result = self.api.delete_entry(id).await;
        self.settle(Some(&key), "Failed to delete entry", result).await?;

        self.entries.write().await.remove(&id);
        self.finish(&key).await;

        debug!(entry_id = %id, "entry deleted");
        self.notify_success("Entry deleted", current.display_value);
        Ok(())
    }

    // ── Schema staleness ─────────────────────────────────────────

    /// Cached entries not known to match the model's current schema version.
    pub async fn stale_entries(&self, model_id: ModelId) -> LifecycleResult<Vec<ModelDataEntry>> {
        let model = self.cached_model(model_id).await?;
        Ok(self
            .entries(model_id)
            .await
            .into_iter()
            .filter(|e| e.schema_version != Some(model.version))
            .collect())
    }

    /// Runs the current schema's validator over a cached entry. Nothing is
    /// written, locally or remotely.
    pub async fn revalidate_entry(&self, id: EntryId) -> LifecycleResult<()> {
        let entry = self.cached_entry(id).await?;
        let model = self.cached_model(entry.dynamic_model).await?;
        generate_validator(&model.fields).validate(&entry.data)?;
        Ok(())
    }
}
