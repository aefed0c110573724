//! Identifier types used throughout ModelKit.
//!
//! The remote API keys every record by a positive integer. Each record kind
//! gets its own newtype so a model id can never be passed where an entry id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id as returned by the remote API.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw numeric id.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Parses an id from its decimal representation.
            pub fn parse(s: &str) -> crate::Result<Self> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|source| crate::Error::InvalidId {
                        input: s.to_string(),
                        source,
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a model definition.
    ModelId
);

numeric_id!(
    /// Identifier of a single data entry belonging to a model.
    EntryId
);

numeric_id!(
    /// Identifier of an immutable model version snapshot.
    VersionId
);

numeric_id!(
    /// Tenant that owns a model definition.
    ///
    /// Supplied by the identity collaborator and treated as an opaque foreign key.
    SiteId
);

numeric_id!(
    /// Operator that created a version snapshot.
    UserId
);
