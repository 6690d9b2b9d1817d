//! Per-kind cache registry.

use super::lru_cache::{CacheStats, LruCache};
use crate::dto::{CountryDto, TourDto, TransportDto};
use adventure_config::CacheConfig;
use adventure_core::{AdventureResult, CountryId, TourId, TransportId};
use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

/// The cached entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Country,
    Tour,
    Transport,
}

impl EntityKind {
    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Tour => "tour",
            Self::Transport => "transport",
        }
    }

    /// Resource name used in `NotFound` errors.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Tour => "Tour",
            Self::Transport => "Transport",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cacheable snapshot type, tied to the cache that holds it.
pub trait Snapshot: Clone + Send + Sync + 'static {
    type Id: Copy + Ord + Hash + fmt::Display + Send + Sync;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    fn cache(registry: &CacheRegistry) -> &LruCache<Self::Id, Self>;
}

impl Snapshot for CountryDto {
    type Id = CountryId;
    const KIND: EntityKind = EntityKind::Country;

    fn id(&self) -> CountryId {
        self.id
    }

    fn cache(registry: &CacheRegistry) -> &LruCache<CountryId, Self> {
        &registry.countries
    }
}

impl Snapshot for TourDto {
    type Id = TourId;
    const KIND: EntityKind = EntityKind::Tour;

    fn id(&self) -> TourId {
        self.id
    }

    fn cache(registry: &CacheRegistry) -> &LruCache<TourId, Self> {
        &registry.tours
    }
}

impl Snapshot for TransportDto {
    type Id = TransportId;
    const KIND: EntityKind = EntityKind::Transport;

    fn id(&self) -> TransportId {
        self.id
    }

    fn cache(registry: &CacheRegistry) -> &LruCache<TransportId, Self> {
        &registry.transports
    }
}

/// Counters for all three caches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RegistryStats {
    pub countries: CacheStats,
    pub tours: CacheStats,
    pub transports: CacheStats,
}

/// Owns the country, tour, and transport caches.
///
/// Each cache has its own lock; writing one kind never touches the others.
#[derive(Debug)]
pub struct CacheRegistry {
    countries: LruCache<CountryId, CountryDto>,
    tours: LruCache<TourId, TourDto>,
    transports: LruCache<TransportId, TransportDto>,
}

impl CacheRegistry {
    /// Creates three empty caches of the given capacity each.
    pub fn new(capacity: usize) -> AdventureResult<Self> {
        Ok(Self {
            countries: LruCache::try_new(capacity)?,
            tours: LruCache::try_new(capacity)?,
            transports: LruCache::try_new(capacity)?,
        })
    }

    /// Creates the caches from configuration.
    pub fn from_config(config: &CacheConfig) -> AdventureResult<Self> {
        debug!("Creating cache registry with capacity {} per kind", config.capacity);
        Self::new(config.capacity)
    }

    /// Looks up a cached snapshot.
    pub fn get<S: Snapshot>(&self, id: S::Id) -> Option<S> {
        let hit = S::cache(self).get(&id);
        trace!(kind = %S::KIND, %id, hit = hit.is_some(), "cache get");
        hit
    }

    /// Inserts or overwrites a snapshot.
    pub fn put<S: Snapshot>(&self, snapshot: S) {
        let id = snapshot.id();
        if let Some(evicted) = S::cache(self).put(id, snapshot) {
            debug!(kind = %S::KIND, %evicted, "cache eviction");
        }
        trace!(kind = %S::KIND, %id, "cache put");
    }

    /// Removes a snapshot if cached.
    pub fn remove<S: Snapshot>(&self, id: S::Id) {
        let removed = S::cache(self).remove(&id).is_some();
        trace!(kind = %S::KIND, %id, removed, "cache remove");
    }

    /// Copies every cached snapshot of one kind.
    pub fn all<S: Snapshot>(&self) -> Vec<S> {
        S::cache(self).values()
    }

    /// The country cache.
    #[must_use]
    pub fn countries(&self) -> &LruCache<CountryId, CountryDto> {
        &self.countries
    }

    /// The tour cache.
    #[must_use]
    pub fn tours(&self) -> &LruCache<TourId, TourDto> {
        &self.tours
    }

    /// The transport cache.
    #[must_use]
    pub fn transports(&self) -> &LruCache<TransportId, TransportDto> {
        &self.transports
    }

    /// Per-kind counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            countries: self.countries.stats(),
            tours: self.tours.stats(),
            transports: self.transports.stats(),
        }
    }
}
