//! Timestamps as exchanged with the remote API.
//!
//! The API serializes `created_at`/`updated_at` as RFC 3339 strings, which is
//! exactly chrono's serde representation of `DateTime<Utc>`.

use chrono::{DateTime, Utc};

/// A UTC instant.
pub type Timestamp = DateTime<Utc>;

/// Returns the current instant.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parses an RFC 3339 timestamp.
pub fn parse(s: &str) -> crate::Result<Timestamp> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| crate::Error::InvalidTimestamp(format!("{s}: {e}")))
}
