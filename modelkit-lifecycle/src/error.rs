//! Error types for the lifecycle layer.

use crate::status::EntityKey;
use modelkit_builder::SchemaError;
use modelkit_validate::ValidationReport;
use std::fmt;
use thiserror::Error;

/// Result type for remote API calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Result type for coordinator operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// A failure reported by the remote API, passed on verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", status_suffix(.status))]
pub struct RemoteError {
    /// Human-readable message as the API sent it.
    pub message: String,
    /// HTTP-like status code, when the API provided one.
    pub status: Option<u16>,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// A 404 for a record that does not exist.
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::new(format!("{what} not found")).with_status(404)
    }
}

/// Errors that can occur in lifecycle operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// The definition failed a local schema check; nothing was sent.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The entry data failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    /// The remote API rejected the call. The cache is unchanged.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A request for the same entity is still in flight.
    #[error("{entity} is busy")]
    Busy { entity: EntityKey },

    /// The entity is not in the local cache.
    #[error("{entity} not found")]
    NotFound { entity: EntityKey },
}
