//! Tour service implementation.

use crate::dto::{CreateTourRequest, TourDto, UpdateTourRequest};
use crate::mappers::apply_tour_update;
use crate::propagator::ConsistencyPropagator;
use crate::read_through::ReadThrough;
use crate::snapshot::{CatalogStores, SnapshotAssembler};
use crate::tour_service::TourService;
use adventure_core::{
    AdventureError, AdventureResult, NewTour, Tour, TourId, TransportId, ValidateExt,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Tour service backed by the store and the snapshot caches.
pub struct TourServiceImpl {
    stores: CatalogStores,
    assembler: SnapshotAssembler,
    reads: Arc<ReadThrough>,
    propagator: Arc<ConsistencyPropagator>,
}

impl TourServiceImpl {
    /// Creates a new tour service.
    #[must_use]
    pub fn new(
        stores: CatalogStores,
        reads: Arc<ReadThrough>,
        propagator: Arc<ConsistencyPropagator>,
    ) -> Self {
        Self {
            assembler: SnapshotAssembler::new(stores.clone()),
            stores,
            reads,
            propagator,
        }
    }

    /// Writes a tour. A tour deleted in the meantime is dropped from the
    /// cache before the `NotFound` is returned.
    async fn write(&self, tour: &Tour) -> AdventureResult<Tour> {
        match self.stores.tours.update(tour).await {
            Err(error) if error.is_not_found() => {
                self.propagator
                    .on_tour_deleted(tour.id, &tour.country_ids)
                    .await?;
                Err(error)
            }
            written => written,
        }
    }
}

#[async_trait]
impl TourService for TourServiceImpl {
    async fn list_tours(&self) -> AdventureResult<Vec<TourDto>> {
        debug!("Listing tours");

        self.reads
            .find_all(self.assembler.load_all_tours(), self.stores.tours.count())
            .await
    }

    async fn get_tour(&self, id: TourId) -> AdventureResult<Option<TourDto>> {
        debug!("Getting tour: {}", id);

        self.reads
            .find_by_id(id, |id| self.assembler.load_tour(id))
            .await
    }

    async fn create_tour(&self, request: CreateTourRequest) -> AdventureResult<TourDto> {
        debug!("Creating tour: {}", request.name);

        request.validate_request()?;
        let draft = NewTour::from(request);

        self.stores.require_countries(&draft.country_ids).await?;
        if let Some(transport_id) = draft.transport_id {
            self.stores.require_transport(transport_id).await?;
        }

        let tour = self.stores.tours.save(&draft).await?;

        info!("Tour created: {}", tour.id);
        self.propagator.on_tour_created(&tour).await
    }

    async fn update_tour(
        &self,
        id: TourId,
        request: UpdateTourRequest,
    ) -> AdventureResult<TourDto> {
        debug!("Updating tour: {}", id);

        request.validate_request()?;

        let mut tour = self.stores.require_tour(id).await?;
        apply_tour_update(&mut tour, request);

        let updated = self.write(&tour).await?;

        info!("Tour updated: {}", id);
        self.propagator.on_tour_updated(&updated).await
    }

    async fn delete_tour(&self, id: TourId) -> AdventureResult<()> {
        debug!("Deleting tour: {}", id);

        let tour = self.stores.require_tour(id).await?;

        if !self.stores.tours.delete(id).await? {
            return Err(AdventureError::not_found("Tour", id));
        }

        info!("Tour deleted: {}", id);
        self.propagator.on_tour_deleted(id, &tour.country_ids).await
    }

    async fn assign_transport(
        &self,
        tour_id: TourId,
        transport_id: TransportId,
    ) -> AdventureResult<TourDto> {
        debug!("Assigning transport {} to tour {}", transport_id, tour_id);

        let mut tour = self.stores.require_tour(tour_id).await?;
        self.stores.require_transport(transport_id).await?;

        tour.transport_id = Some(transport_id);
        let updated = self.write(&tour).await?;

        info!("Transport {} assigned to tour {}", transport_id, tour_id);
        self.propagator.on_transport_assigned(&updated).await
    }

    async fn clear_transport(&self, tour_id: TourId) -> AdventureResult<TourDto> {
        debug!("Clearing transport of tour {}", tour_id);

        let mut tour = self.stores.require_tour(tour_id).await?;

        if let Some(previous) = tour.transport_id.take() {
            tour = self.write(&tour).await?;
            info!("Transport {} cleared from tour {}", previous, tour_id);
        }

        self.propagator.on_transport_cleared(&tour).await
    }

    async fn find_tours_by_transport_name(&self, name: &str) -> AdventureResult<Vec<TourDto>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AdventureError::validation("Transport name must not be blank"));
        }
        debug!("Finding tours by transport name: {}", name);

        let tours = self.stores.tours.find_by_transport_name(name).await?;
        self.assembler.tours(&tours).await
    }
}
