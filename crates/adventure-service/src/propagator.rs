//! Cache consistency propagation.
//!
//! Cached snapshots embed shallow views of their neighbours, so a change to
//! one entity can leave other cached snapshots stale. After every committed
//! store write the matching `on_*` method recomputes and overwrites exactly
//! the affected entries. Nothing is evicted wholesale.
//!
//! Written entities are re-read from the store rather than snapshotted from
//! the caller's copy, so a concurrent link or delete that committed in the
//! meantime is what ends up cached.
//!
//! Lookups made here run after the store write has committed. Their failures
//! are logged and returned as [`AdventureError::Propagation`]; the affected
//! entries stay as they were until their next write or eviction.

use crate::cache::{CacheRegistry, EntityKind};
use crate::dto::{CountryDto, TourDto, TransportDto};
use crate::logging::logged;
use crate::snapshot::SnapshotAssembler;
use adventure_core::{
    AdventureError, AdventureResult, Country, CountryId, Tour, TourId, Transport, TransportId,
};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

/// Keeps cached snapshots in step with committed store writes.
#[derive(Clone)]
pub struct ConsistencyPropagator {
    registry: Arc<CacheRegistry>,
    assembler: SnapshotAssembler,
}

impl ConsistencyPropagator {
    /// Creates a propagator writing into `registry`.
    #[must_use]
    pub fn new(registry: Arc<CacheRegistry>, assembler: SnapshotAssembler) -> Self {
        Self {
            registry,
            assembler,
        }
    }

    /// The registry being kept consistent.
    #[must_use]
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    // =========================================================================
    // Country
    // =========================================================================

    /// A country was inserted, possibly already linked to tours.
    pub async fn on_country_created(&self, country: &Country) -> AdventureResult<CountryDto> {
        const OP: &str = "create_country";
        logged(OP, EntityKind::Country, self.country_written(OP, country)).await
    }

    /// A country's scalar fields changed; its tours show it as a shallow view.
    pub async fn on_country_updated(&self, country: &Country) -> AdventureResult<CountryDto> {
        const OP: &str = "update_country";
        logged(OP, EntityKind::Country, self.country_written(OP, country)).await
    }

    /// A country and its tour links were deleted.
    pub async fn on_country_deleted(
        &self,
        id: CountryId,
        former_tours: &BTreeSet<TourId>,
    ) -> AdventureResult<()> {
        const OP: &str = "delete_country";
        logged(OP, EntityKind::Country, async {
            self.registry.remove::<CountryDto>(id);
            self.refresh_tours(OP, former_tours.iter().copied()).await?;
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Tour
    // =========================================================================

    /// A tour was inserted, possibly already linked to countries and a transport.
    pub async fn on_tour_created(&self, tour: &Tour) -> AdventureResult<TourDto> {
        const OP: &str = "create_tour";
        logged(OP, EntityKind::Tour, self.tour_written(OP, tour)).await
    }

    /// A tour's scalar fields changed.
    pub async fn on_tour_updated(&self, tour: &Tour) -> AdventureResult<TourDto> {
        const OP: &str = "update_tour";
        logged(OP, EntityKind::Tour, self.tour_written(OP, tour)).await
    }

    /// A tour and its country links were deleted.
    pub async fn on_tour_deleted(
        &self,
        id: TourId,
        former_countries: &BTreeSet<CountryId>,
    ) -> AdventureResult<()> {
        const OP: &str = "delete_tour";
        logged(OP, EntityKind::Tour, async {
            self.registry.remove::<TourDto>(id);
            self.refresh_countries(OP, former_countries.iter().copied()).await
        })
        .await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// A transport was inserted.
    pub async fn on_transport_created(
        &self,
        transport: &Transport,
    ) -> AdventureResult<TransportDto> {
        logged("create_transport", EntityKind::Transport, async {
            let snapshot = self.assembler.transport(transport);
            self.registry.put(snapshot.clone());
            Ok(snapshot)
        })
        .await
    }

    /// A transport changed; every tour using it embeds the full view.
    pub async fn on_transport_updated(
        &self,
        transport: &Transport,
    ) -> AdventureResult<TransportDto> {
        const OP: &str = "update_transport";
        logged(OP, EntityKind::Transport, async {
            let snapshot = self.reload_transport(OP, transport.id).await?;
            self.registry.put(snapshot.clone());

            let tours = self
                .lookup(
                    OP,
                    EntityKind::Tour,
                    self.assembler.stores().tours.find_by_transport(transport.id),
                )
                .await?;
            let tour_snapshots = self
                .lookup(OP, EntityKind::Tour, self.assembler.tours(&tours))
                .await?;

            let reachable = Self::countries_of(&tour_snapshots);
            debug!(
                transport_id = %transport.id,
                tours = tour_snapshots.len(),
                countries = reachable.len(),
                "refreshing tours using transport"
            );
            for tour in tour_snapshots {
                self.registry.put(tour);
            }
            self.refresh_countries(OP, reachable).await?;

            Ok(snapshot)
        })
        .await
    }

    /// A transport was deleted and cleared from the tours that used it.
    ///
    /// `former_tours` must be collected before the delete, since the store no
    /// longer relates them to the transport afterwards.
    pub async fn on_transport_deleted(
        &self,
        id: TransportId,
        former_tours: &[TourId],
    ) -> AdventureResult<()> {
        const OP: &str = "delete_transport";
        logged(OP, EntityKind::Transport, async {
            self.registry.remove::<TransportDto>(id);
            let tours = self.refresh_tours(OP, former_tours.iter().copied()).await?;
            self.refresh_countries(OP, Self::countries_of(&tours)).await
        })
        .await
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// A country/tour link was added or removed; both ends are re-snapshotted.
    pub async fn on_link_changed(
        &self,
        country_id: CountryId,
        tour_id: TourId,
    ) -> AdventureResult<(CountryDto, TourDto)> {
        const OP: &str = "link_tour_country";
        logged(OP, EntityKind::Country, async {
            let country = self.reload_country(OP, country_id).await?;
            let tour = self.reload_tour(OP, tour_id).await?;

            self.registry.put(country.clone());
            self.registry.put(tour.clone());
            Ok((country, tour))
        })
        .await
    }

    /// A tour now references a transport, replacing any previous one.
    pub async fn on_transport_assigned(&self, tour: &Tour) -> AdventureResult<TourDto> {
        const OP: &str = "assign_transport";
        logged(OP, EntityKind::Tour, self.tour_written(OP, tour)).await
    }

    /// A tour no longer references any transport.
    pub async fn on_transport_cleared(&self, tour: &Tour) -> AdventureResult<TourDto> {
        const OP: &str = "clear_transport";
        logged(OP, EntityKind::Tour, async {
            let snapshot = self.reload_tour(OP, tour.id).await?;
            self.registry.put(snapshot.clone());
            Ok(snapshot)
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Caches the stored state of a written country and refreshes the tours
    /// it was or is now linked to.
    async fn country_written(
        &self,
        operation: &'static str,
        country: &Country,
    ) -> AdventureResult<CountryDto> {
        let reloaded = self.reload_country(operation, country.id).await;

        let mut tours = country.tour_ids.clone();
        if let Ok(snapshot) = &reloaded {
            self.registry.put(snapshot.clone());
            tours.extend(snapshot.tour_ids());
        }
        self.refresh_tours(operation, tours).await?;

        reloaded
    }

    /// Caches the stored state of a written tour and its transport, and
    /// refreshes the countries it was or is now linked to.
    async fn tour_written(&self, operation: &'static str, tour: &Tour) -> AdventureResult<TourDto> {
        let reloaded = self.reload_tour(operation, tour.id).await;

        let mut countries = tour.country_ids.clone();
        if let Ok(snapshot) = &reloaded {
            self.registry.put(snapshot.clone());
            if let Some(transport) = &snapshot.transport {
                self.registry.put(transport.clone());
            }
            countries.extend(snapshot.country_ids());
        }
        self.refresh_countries(operation, countries).await?;

        reloaded
    }

    /// Loads the committed snapshot of a country that was just written.
    /// If it is gone from the store it is dropped from the cache too.
    async fn reload_country(
        &self,
        operation: &'static str,
        id: CountryId,
    ) -> AdventureResult<CountryDto> {
        let loaded = self
            .lookup(
                operation,
                EntityKind::Country,
                self.assembler.load_country(id),
            )
            .await?;
        loaded.ok_or_else(|| {
            self.registry.remove::<CountryDto>(id);
            Self::vanished(operation, EntityKind::Country, id)
        })
    }

    async fn reload_tour(&self, operation: &'static str, id: TourId) -> AdventureResult<TourDto> {
        let loaded = self
            .lookup(operation, EntityKind::Tour, self.assembler.load_tour(id))
            .await?;
        loaded.ok_or_else(|| {
            self.registry.remove::<TourDto>(id);
            Self::vanished(operation, EntityKind::Tour, id)
        })
    }

    async fn reload_transport(
        &self,
        operation: &'static str,
        id: TransportId,
    ) -> AdventureResult<TransportDto> {
        let loaded = self
            .lookup(
                operation,
                EntityKind::Transport,
                self.assembler.load_transport(id),
            )
            .await?;
        loaded.ok_or_else(|| {
            self.registry.remove::<TransportDto>(id);
            Self::vanished(operation, EntityKind::Transport, id)
        })
    }

    /// Re-snapshots the given countries. Ids the store no longer knows are
    /// dropped from the cache.
    async fn refresh_countries(
        &self,
        operation: &'static str,
        ids: impl IntoIterator<Item = CountryId>,
    ) -> AdventureResult<()> {
        let ids: BTreeSet<CountryId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(());
        }

        let wanted: Vec<CountryId> = ids.iter().copied().collect();
        let snapshots = self
            .lookup(operation, EntityKind::Country, self.assembler.load_countries(&wanted))
            .await?;

        let mut stale = ids;
        for snapshot in snapshots {
            stale.remove(&snapshot.id);
            self.registry.put(snapshot);
        }
        for id in stale {
            self.registry.remove::<CountryDto>(id);
        }
        Ok(())
    }

    /// Re-snapshots the given tours and returns the fresh snapshots. Ids the
    /// store no longer knows are dropped from the cache.
    async fn refresh_tours(
        &self,
        operation: &'static str,
        ids: impl IntoIterator<Item = TourId>,
    ) -> AdventureResult<Vec<TourDto>> {
        let ids: BTreeSet<TourId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: Vec<TourId> = ids.iter().copied().collect();
        let snapshots = self
            .lookup(operation, EntityKind::Tour, self.assembler.load_tours(&wanted))
            .await?;

        let mut stale = ids;
        for snapshot in &snapshots {
            stale.remove(&snapshot.id);
            self.registry.put(snapshot.clone());
        }
        for id in stale {
            self.registry.remove::<TourDto>(id);
        }
        Ok(snapshots)
    }

    async fn lookup<T>(
        &self,
        operation: &'static str,
        kind: EntityKind,
        future: impl Future<Output = AdventureResult<T>>,
    ) -> AdventureResult<T> {
        future.await.map_err(|cause| {
            error!(
                operation,
                kind = kind.as_str(),
                error = %cause,
                "relationship lookup failed after store write, cached snapshots may be stale"
            );
            AdventureError::propagation(operation, cause)
        })
    }

    fn vanished(
        operation: &'static str,
        kind: EntityKind,
        id: impl std::fmt::Display,
    ) -> AdventureError {
        error!(operation, kind = kind.as_str(), %id, "entity missing from store after write");
        AdventureError::propagation(operation, format!("{kind} {id} is no longer in the store"))
    }

    fn countries_of(tours: &[TourDto]) -> BTreeSet<CountryId> {
        tours
            .iter()
            .flat_map(|tour| tour.countries.iter().map(|country| country.id))
            .collect()
    }
}
