//! Typed ID wrappers for domain entities.
//!
//! Identifiers are assigned by the durable store (auto-increment keys), so
//! there is no `new()` constructor; ids only come from persisted rows or
//! from request paths.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw store key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw store key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

entity_id!(
    /// A strongly-typed wrapper for country IDs.
    CountryId
);

entity_id!(
    /// A strongly-typed wrapper for tour IDs.
    TourId
);

entity_id!(
    /// A strongly-typed wrapper for transport IDs.
    TransportId
);
