//! Core type definitions for ModelKit.
//!
//! This crate defines the small, domain-agnostic types shared by every other
//! crate in the workspace:
//! - Numeric identifiers for remote records (models, entries, versions)
//! - Opaque tenant and user references handed in by the identity collaborator
//! - UTC timestamps as exchanged with the remote API
//!
//! Field, model and entry types live in `modelkit-model`, not here.

mod ids;
mod timestamp;

pub use ids::{EntryId, ModelId, SiteId, UserId, VersionId};
pub use timestamp::{Timestamp, now, parse as parse_timestamp};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid id '{input}': {source}")]
    InvalidId {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
