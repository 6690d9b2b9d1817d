//! In-process caching for catalog snapshots.
//!
//! One [`LruCache`] per entity kind, owned by a [`CacheRegistry`] that is
//! constructed at startup and passed to whoever needs it.

mod lru_cache;
mod registry;

pub use lru_cache::{CacheStats, LruCache};
pub use registry::{CacheRegistry, EntityKind, RegistryStats, Snapshot};
