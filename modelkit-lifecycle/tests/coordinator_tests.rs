use modelkit_builder::SchemaError;
use modelkit_lifecycle::api::mock::InMemoryApi;
use modelkit_lifecycle::{
    CoordinatorConfig, EntityKey, EntityStatus, EntryPatch, LifecycleCoordinator, LifecycleError,
    ModelApi, ModelPatch, RecordingNotifier, RemoteError, Severity,
};
use modelkit_model::{FieldDefinition, FieldType, ModelDefinition};
use modelkit_types::{EntryId, ModelId, SiteId};
use modelkit_validate::ValidationErrorKind;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::sync::Arc;

const SITE: SiteId = SiteId::new(7);

struct Harness {
    api: Arc<InMemoryApi>,
    notifier: Arc<RecordingNotifier>,
    coordinator: LifecycleCoordinator,
}

fn harness() -> Harness {
    harness_with(CoordinatorConfig::for_site(SITE))
}

fn harness_with(config: CoordinatorConfig) -> Harness {
    let api = Arc::new(InMemoryApi::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = LifecycleCoordinator::new(config, api.clone(), notifier.clone());
    Harness {
        api,
        notifier,
        coordinator,
    }
}

fn post_draft() -> ModelDefinition {
    ModelDefinition::draft(SITE, "post", "Post").with_fields(vec![
        FieldDefinition::text("title", "Title").required(true).with_order(0),
        FieldDefinition::new("views", "Views", FieldType::Number).with_order(1),
        FieldDefinition::new("published", "Published", FieldType::Boolean)
            .with_default(json!(false))
            .with_order(2),
    ])
}

fn data(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

async fn saved_post(h: &Harness) -> ModelId {
    let saved = h.coordinator.create(post_draft()).await.unwrap();
    h.notifier.take();
    saved.id.unwrap()
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn default_config() {
    let config = CoordinatorConfig::default();
    assert_eq!(config.copy_suffix, "_copy");
    assert!(config.notify_success);
    assert!(config.validate_before_submit);
    assert_eq!(CoordinatorConfig::for_site(SITE).site, SITE);
}

// ── Create ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_caches_model_at_version_one() {
    let h = harness();
    let saved = h.coordinator.create(post_draft()).await.unwrap();

    let id = saved.id.unwrap();
    assert_eq!(saved.version, 1);
    assert_eq!(saved.table_name.as_deref(), Some("dm_7_post"));
    assert_eq!(h.coordinator.model(id).await, Some(saved));
    assert_eq!(h.coordinator.status(&EntityKey::Model(id)).await, EntityStatus::Idle);

    let last = h.notifier.last().unwrap();
    assert_eq!(last.severity, Severity::Success);
    assert_eq!(last.title, "Model created");
    assert_eq!(last.message.as_deref(), Some("Post"));
}

#[tokio::test]
async fn create_assigns_configured_site() {
    let h = harness();
    let mut draft = post_draft();
    draft.site = SiteId::new(99);
    let saved = h.coordinator.create(draft).await.unwrap();
    assert_eq!(saved.site, SITE);
}

#[tokio::test]
async fn create_reindexes_fields() {
    let h = harness();
    let draft = ModelDefinition::draft(SITE, "post", "Post").with_fields(vec![
        FieldDefinition::text("b", "B").with_order(9),
        FieldDefinition::text("a", "A").with_order(3),
    ]);
    let saved = h.coordinator.create(draft).await.unwrap();
    let names: Vec<(&str, u32)> = saved.fields.iter().map(|f| (f.name.as_str(), f.order)).collect();
    assert_eq!(names, vec![("a", 0), ("b", 1)]);
}

#[tokio::test]
async fn schema_errors_never_reach_the_api() {
    let h = harness();

    let empty = ModelDefinition::draft(SITE, "post", "Post");
    assert_eq!(
        h.coordinator.create(empty).await.unwrap_err(),
        LifecycleError::Schema(SchemaError::NoFieldsDefined)
    );

    let dup = ModelDefinition::draft(SITE, "post", "Post").with_fields(vec![
        FieldDefinition::text("title", "Title").with_order(0),
        FieldDefinition::text("title", "Again").with_order(1),
    ]);
    assert_eq!(
        h.coordinator.create(dup).await.unwrap_err(),
        LifecycleError::Schema(SchemaError::DuplicateFieldName {
            name: "title".into()
        })
    );

    let unnamed = ModelDefinition::draft(SITE, "post", "").with_fields(post_draft().fields);
    assert!(matches!(
        h.coordinator.create(unnamed).await,
        Err(LifecycleError::Schema(SchemaError::EmptyRequiredMetadata { .. }))
    ));

    assert_eq!(h.api.calls(), 0);
    assert!(h.coordinator.models().await.is_empty());
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn create_failure_leaves_cache_and_notifies() {
    let h = harness();
    h.api.fail_next(RemoteError::new("database unavailable").with_status(503));

    let err = h.coordinator.create(post_draft()).await.unwrap_err();
    assert_eq!(
        err,
        LifecycleError::Remote(RemoteError::new("database unavailable").with_status(503))
    );
    assert!(h.coordinator.models().await.is_empty());

    let key = EntityKey::ModelDraft("post".into());
    assert_eq!(
        h.coordinator.status(&key).await,
        EntityStatus::Failed {
            message: "database unavailable".into()
        }
    );

    let last = h.notifier.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.title, "Failed to create model");
    assert_eq!(last.message.as_deref(), Some("database unavailable"));

    // A retry clears the failure.
    h.coordinator.create(post_draft()).await.unwrap();
    assert_eq!(h.coordinator.status(&key).await, EntityStatus::Idle);
}

#[tokio::test]
async fn success_notifications_can_be_disabled() {
    let h = harness_with(CoordinatorConfig {
        notify_success: false,
        ..CoordinatorConfig::for_site(SITE)
    });
    h.coordinator.create(post_draft()).await.unwrap();
    assert!(h.notifier.notifications().is_empty());
}

// ── Update ───────────────────────────────────────────────────────

#[tokio::test]
async fn metadata_update_keeps_version() {
    let h = harness();
    let id = saved_post(&h).await;

    let saved = h
        .coordinator
        .update(id, ModelPatch::new().display_name("Blog post"))
        .await
        .unwrap();
    assert_eq!(saved.display_name, "Blog post");
    assert_eq!(saved.version, 1);
    assert_eq!(h.coordinator.model(id).await.unwrap().display_name, "Blog post");
}

#[tokio::test]
async fn metadata_update_sends_loaded_fields_untouched() {
    let h = harness();
    let mut draft = post_draft();
    draft.fields[0].order = 5;
    draft.fields[1].order = 9;
    draft.fields[2].order = 12;
    let id = h.api.seed_model(draft).id.unwrap();
    let loaded = h.coordinator.load_model(id).await.unwrap();

    let saved = h
        .coordinator
        .update(id, ModelPatch::new().description("Long-form articles"))
        .await
        .unwrap();

    assert_eq!(saved.version, 1);
    assert_eq!(saved.fields, loaded.fields);
    assert_eq!(h.api.stored_model(id).unwrap().fields, loaded.fields);
}

#[tokio::test]
async fn field_patch_is_reindexed_before_submit() {
    let h = harness();
    let id = saved_post(&h).await;

    let mut fields = h.coordinator.model(id).await.unwrap().fields;
    fields.reverse();
    for f in &mut fields {
        f.order += 10;
    }
    let saved = h.coordinator.update(id, ModelPatch::new().fields(fields)).await.unwrap();

    let orders: Vec<u32> = saved.fields.iter().map(|f| f.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn schema_update_bumps_version_when_api_does() {
    let h = harness();
    let id = saved_post(&h).await;

    let mut fields = h.coordinator.model(id).await.unwrap().fields;
    fields.push(FieldDefinition::new("body", "Body", FieldType::RichText).with_order(3));

    let saved = h.coordinator.update(id, ModelPatch::new().fields(fields)).await.unwrap();
    assert_eq!(saved.version, 2);
    assert_eq!(h.coordinator.model(id).await.unwrap().version, 2);

    let versions = h.coordinator.load_versions(id).await.unwrap();
    assert_eq!(versions.iter().map(|v| v.version).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(versions[1].parent_version, Some(versions[0].id));
}

#[tokio::test]
async fn update_failure_keeps_cached_model() {
    let h = harness();
    let id = saved_post(&h).await;
    let before = h.coordinator.model(id).await.unwrap();

    h.api.fail_next(RemoteError::new("conflict").with_status(409));
    let err = h
        .coordinator
        .update(id, ModelPatch::new().display_name("Renamed"))
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::Remote(_)));
    assert_eq!(h.coordinator.model(id).await.unwrap(), before);
    assert_eq!(
        h.coordinator.status(&EntityKey::Model(id)).await,
        EntityStatus::Failed {
            message: "conflict".into()
        }
    );
}

#[tokio::test]
async fn update_rejects_invalid_schema_locally() {
    let h = harness();
    let id = saved_post(&h).await;
    let calls = h.api.calls();

    let err = h
        .coordinator
        .update(id, ModelPatch::new().fields(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err, LifecycleError::Schema(SchemaError::NoFieldsDefined));
    assert_eq!(h.api.calls(), calls);
}

#[tokio::test]
async fn extension_without_target_is_rejected() {
    let h = harness();
    let id = saved_post(&h).await;

    let mut draft = post_draft().extending("user");
    draft.name = "profile".into();
    h.coordinator.create(draft).await.unwrap();

    let err = h
        .coordinator
        .update(ModelId::new(id.get() + 1), ModelPatch::new().target_model(None))
        .await
        .unwrap_err();
    assert_eq!(err, LifecycleError::Schema(SchemaError::MissingTargetModel));
}

#[tokio::test]
async fn update_of_uncached_model_is_not_found() {
    let h = harness();
    let err = h
        .coordinator
        .update(ModelId::new(42), ModelPatch::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LifecycleError::NotFound {
            entity: EntityKey::Model(ModelId::new(42))
        }
    );
}

// ── Busy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn second_request_for_same_model_is_busy() {
    let h = harness();
    let id = saved_post(&h).await;

    let gate = h.api.gate().lock().await;
    let first = h.coordinator.update(id, ModelPatch::new().description("first"));
    let second = async {
        tokio::task::yield_now().await;
        let status = h.coordinator.status(&EntityKey::Model(id)).await;
        let result = h.coordinator.update(id, ModelPatch::new().description("second")).await;
        drop(gate);
        (status, result)
    };

    let (first, (status, second)) = tokio::join!(first, second);
    assert_eq!(status, EntityStatus::Pending);
    assert_eq!(
        second.unwrap_err(),
        LifecycleError::Busy {
            entity: EntityKey::Model(id)
        }
    );
    assert_eq!(first.unwrap().description, "first");
    assert_eq!(h.coordinator.model(id).await.unwrap().description, "first");
}

#[tokio::test]
async fn different_models_do_not_block_each_other() {
    let h = harness();
    let a = saved_post(&h).await;
    let mut other = post_draft();
    other.name = "page".into();
    let b = h.coordinator.create(other).await.unwrap().id.unwrap();

    let (ra, rb) = tokio::join!(
        h.coordinator.update(a, ModelPatch::new().description("a")),
        h.coordinator.update(b, ModelPatch::new().description("b")),
    );
    assert!(ra.is_ok());
    assert!(rb.is_ok());
}

// ── Remove & duplicate ───────────────────────────────────────────

#[tokio::test]
async fn remove_drops_model_and_its_entries() {
    let h = harness();
    let id = saved_post(&h).await;
    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "Hello"})))
        .await
        .unwrap();

    h.coordinator.remove(id).await.unwrap();
    assert_eq!(h.coordinator.model(id).await, None);
    assert!(h.coordinator.entries(id).await.is_empty());
    assert_eq!(h.api.stored_entry(entry.id.unwrap()), None);
    assert_eq!(h.notifier.last().unwrap().title, "Model deleted");
}

#[tokio::test]
async fn remove_failure_keeps_model() {
    let h = harness();
    let id = saved_post(&h).await;

    h.api.fail_next(RemoteError::new("forbidden").with_status(403));
    assert!(h.coordinator.remove(id).await.is_err());
    assert!(h.coordinator.model(id).await.is_some());
    assert!(h.api.stored_model(id).is_some());
}

#[tokio::test]
async fn duplicate_creates_suffixed_copy() {
    let h = harness();
    let id = saved_post(&h).await;

    let copy = h.coordinator.duplicate(id).await.unwrap();
    assert_ne!(copy.id, Some(id));
    assert_eq!(copy.name, "post_copy");
    assert_eq!(copy.display_name, "Post (Copy)");
    assert_eq!(copy.version, 1);
    assert_eq!(copy.fields, h.coordinator.model(id).await.unwrap().fields);
    assert_eq!(h.coordinator.models().await.len(), 2);
}

#[tokio::test]
async fn duplicate_uses_configured_suffix() {
    let h = harness_with(CoordinatorConfig {
        copy_suffix: "_v2".into(),
        ..CoordinatorConfig::for_site(SITE)
    });
    let id = saved_post(&h).await;
    assert_eq!(h.coordinator.duplicate(id).await.unwrap().name, "post_v2");
}

// ── Loading ──────────────────────────────────────────────────────

#[tokio::test]
async fn load_models_filters_by_site() {
    let h = harness();
    h.api.seed_model(post_draft());
    let mut foreign = post_draft();
    foreign.site = SiteId::new(8);
    h.api.seed_model(foreign);

    let loaded = h.coordinator.load_models().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].site, SITE);
    assert_eq!(h.coordinator.models().await, loaded);
}

#[tokio::test]
async fn load_model_rejects_other_site() {
    let h = harness();
    let mut foreign = post_draft();
    foreign.site = SiteId::new(8);
    let seeded = h.api.seed_model(foreign);
    let id = seeded.id.unwrap();

    assert_eq!(
        h.coordinator.load_model(id).await.unwrap_err(),
        LifecycleError::NotFound {
            entity: EntityKey::Model(id)
        }
    );
}

#[tokio::test]
async fn load_failure_notifies() {
    let h = harness();
    h.api.fail_next(RemoteError::new("timeout"));
    assert!(h.coordinator.load_models().await.is_err());
    assert_eq!(h.notifier.last().unwrap().title, "Failed to load models");
}

// ── Entries ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_entry_fills_defaults_and_display_value() {
    let h = harness();
    let id = saved_post(&h).await;

    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "  Hello world ", "views": "12"})))
        .await
        .unwrap();

    assert!(entry.id.is_some());
    assert_eq!(entry.data.get("published"), Some(&json!(false)));
    assert_eq!(entry.display_value, "Hello world");
    assert_eq!(entry.schema_version, Some(1));
    assert_eq!(h.coordinator.entries(id).await, vec![entry]);
}

#[tokio::test]
async fn invalid_entry_never_reaches_the_api() {
    let h = harness();
    let id = saved_post(&h).await;
    let calls = h.api.calls();

    let err = h
        .coordinator
        .create_entry(id, data(json!({"views": "many"})))
        .await
        .unwrap_err();

    let LifecycleError::Validation(report) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(
        report.kinds(),
        vec![
            ValidationErrorKind::RequiredFieldMissing,
            ValidationErrorKind::TypeMismatch
        ]
    );
    assert_eq!(h.api.calls(), calls);
    assert!(h.coordinator.entries(id).await.is_empty());
}

#[tokio::test]
async fn validation_can_be_skipped() {
    let h = harness_with(CoordinatorConfig {
        validate_before_submit: false,
        ..CoordinatorConfig::for_site(SITE)
    });
    let id = saved_post(&h).await;
    assert!(h.coordinator.create_entry(id, Map::new()).await.is_ok());
}

#[tokio::test]
async fn update_entry_merges_and_revalidates() {
    let h = harness();
    let id = saved_post(&h).await;
    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "First"})))
        .await
        .unwrap();
    let entry_id = entry.id.unwrap();

    let updated = h
        .coordinator
        .update_entry(
            entry_id,
            EntryPatch::new().set("title", json!("Second")).published(true),
        )
        .await
        .unwrap();
    assert_eq!(updated.get_str("title"), Some("Second"));
    assert_eq!(updated.display_value, "Second");
    assert!(updated.is_published);

    let err = h
        .coordinator
        .update_entry(entry_id, EntryPatch::new().set("title", Value::Null))
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
    assert_eq!(h.coordinator.entry(entry_id).await, Some(updated));
}

#[tokio::test]
async fn update_entry_failure_keeps_cache() {
    let h = harness();
    let id = saved_post(&h).await;
    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "First"})))
        .await
        .unwrap();
    let entry_id = entry.id.unwrap();

    h.api.fail_next(RemoteError::new("boom"));
    let err = h
        .coordinator
        .update_entry(entry_id, EntryPatch::new().set("title", json!("Second")))
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Remote(_)));
    assert_eq!(h.coordinator.entry(entry_id).await, Some(entry));
    assert_eq!(
        h.coordinator.status(&EntityKey::Entry(entry_id)).await,
        EntityStatus::Failed {
            message: "boom".into()
        }
    );
}

#[tokio::test]
async fn delete_entry_removes_from_cache() {
    let h = harness();
    let id = saved_post(&h).await;
    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "Bye"})))
        .await
        .unwrap();
    let entry_id = entry.id.unwrap();

    h.coordinator.delete_entry(entry_id).await.unwrap();
    assert_eq!(h.coordinator.entry(entry_id).await, None);
    assert_eq!(
        h.coordinator.delete_entry(entry_id).await.unwrap_err(),
        LifecycleError::NotFound {
            entity: EntityKey::Entry(entry_id)
        }
    );
}

#[tokio::test]
async fn entry_for_unknown_model_is_not_found() {
    let h = harness();
    let err = h
        .coordinator
        .create_entry(ModelId::new(5), Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound { .. }));
    assert_eq!(
        h.coordinator
            .update_entry(EntryId::new(1), EntryPatch::new())
            .await
            .unwrap_err(),
        LifecycleError::NotFound {
            entity: EntityKey::Entry(EntryId::new(1))
        }
    );
}

// ── Schema staleness ─────────────────────────────────────────────

#[tokio::test]
async fn schema_change_marks_entries_stale() {
    let h = harness();
    let id = saved_post(&h).await;
    let entry = h
        .coordinator
        .create_entry(id, data(json!({"title": "Hello"})))
        .await
        .unwrap();
    let entry_id = entry.id.unwrap();
    assert!(h.coordinator.stale_entries(id).await.unwrap().is_empty());

    let mut fields = h.coordinator.model(id).await.unwrap().fields;
    fields.push(
        FieldDefinition::new("author", "Author", FieldType::Email)
            .required(true)
            .with_order(3),
    );
    h.coordinator.update(id, ModelPatch::new().fields(fields)).await.unwrap();

    let stale = h.coordinator.stale_entries(id).await.unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id, Some(entry_id));

    let err = h.coordinator.revalidate_entry(entry_id).await.unwrap_err();
    let LifecycleError::Validation(report) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(report.issues[0].field_name, "author");

    h.coordinator
        .update_entry(entry_id, EntryPatch::new().set("author", json!("a@b.com")))
        .await
        .unwrap();
    assert!(h.coordinator.stale_entries(id).await.unwrap().is_empty());
    assert!(h.coordinator.revalidate_entry(entry_id).await.is_ok());
}

#[tokio::test]
async fn loaded_entries_are_stale_until_written() {
    let h = harness();
    let id = saved_post(&h).await;
    h.coordinator
        .create_entry(id, data(json!({"title": "Hello"})))
        .await
        .unwrap();

    let loaded = h.coordinator.load_entries(id).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].schema_version, None);
    assert_eq!(h.coordinator.stale_entries(id).await.unwrap().len(), 1);
}

// ── API seam ─────────────────────────────────────────────────────

#[tokio::test]
async fn coordinator_accepts_any_api() {
    let api: Arc<dyn ModelApi> = Arc::new(InMemoryApi::new());
    let coordinator = LifecycleCoordinator::new(
        CoordinatorConfig::for_site(SITE),
        api.clone(),
        Arc::new(RecordingNotifier::new()),
    );
    let saved = coordinator.create(post_draft()).await.unwrap();
    let fetched = api.get_model(saved.id.unwrap()).await.unwrap();
    assert_eq!(fetched.name, "post");
}
