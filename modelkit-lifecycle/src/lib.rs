//! Model and data entry lifecycle for ModelKit.
//!
//! The [`LifecycleCoordinator`] sits between the schema builder and
//! validator on one side and the remote API on the other:
//!
//! - **API**: the [`ModelApi`] trait, implemented by an HTTP client in
//!   production and by [`api::mock::InMemoryApi`] in tests
//! - **Status**: one `Idle -> Pending -> Idle | Failed` machine per entity,
//!   which rejects a second request while one is in flight
//! - **Notifications**: outcomes go to a [`Notifier`]
//!
//! The caches are only written after the API acknowledged a change, so a
//! failed call leaves them exactly as they were.
//!
//! # Example
//!
//! ```
//! use modelkit_lifecycle::api::mock::InMemoryApi;
//! use modelkit_lifecycle::{CoordinatorConfig, LifecycleCoordinator, RecordingNotifier};
//! use modelkit_model::{FieldDefinition, ModelDefinition};
//! use modelkit_types::SiteId;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let coordinator = LifecycleCoordinator::new(
//!     CoordinatorConfig::for_site(SiteId::new(7)),
//!     Arc::new(InMemoryApi::new()),
//!     Arc::new(RecordingNotifier::new()),
//! );
//!
//! let draft = ModelDefinition::draft(SiteId::new(7), "post", "Post")
//!     .with_fields(vec![FieldDefinition::text("title", "Title").required(true)]);
//! let saved = coordinator.create(draft).await.unwrap();
//! assert_eq!(saved.version, 1);
//! # });
//! ```

pub mod api;
mod coordinator;
mod error;
mod notify;
mod patch;
mod status;

pub use api::ModelApi;
pub use coordinator::{CoordinatorConfig, LifecycleCoordinator};
pub use error::{LifecycleError, LifecycleResult, RemoteError, RemoteResult};
pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use patch::{EntryPatch, ModelPatch};
pub use status::{EntityKey, EntityStatus};
