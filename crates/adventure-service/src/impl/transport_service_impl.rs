//! Transport service implementation.

use crate::dto::{CreateTransportRequest, TransportDto, UpdateTransportRequest};
use crate::mappers::apply_transport_update;
use crate::propagator::ConsistencyPropagator;
use crate::read_through::ReadThrough;
use crate::snapshot::{CatalogStores, SnapshotAssembler};
use crate::transport_service::TransportService;
use adventure_core::{
    AdventureError, AdventureResult, NewTransport, TourId, TransportId, ValidateExt,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Transport service backed by the store and the snapshot caches.
pub struct TransportServiceImpl {
    stores: CatalogStores,
    assembler: SnapshotAssembler,
    reads: Arc<ReadThrough>,
    propagator: Arc<ConsistencyPropagator>,
}

impl TransportServiceImpl {
    /// Creates a new transport service.
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
}

#[async_trait]
impl TransportService for TransportServiceImpl {
    async fn list_transports(&self) -> AdventureResult<Vec<TransportDto>> {
        debug!("Listing transports");

        self.reads
            .find_all(
                self.assembler.load_all_transports(),
                self.stores.transports.count(),
            )
            .await
    }

    async fn get_transport(&self, id: TransportId) -> AdventureResult<Option<TransportDto>> {
        debug!("Getting transport: {}", id);

        self.reads
            .find_by_id(id, |id| self.assembler.load_transport(id))
            .await
    }

    async fn create_transport(
        &self,
        request: CreateTransportRequest,
    ) -> AdventureResult<TransportDto> {
        debug!("Creating transport: {}", request.name);

        request.validate_request()?;

        let transport = self
            .stores
            .transports
            .save(&NewTransport::from(request))
            .await?;

        info!("Transport created: {}", transport.id);
        self.propagator.on_transport_created(&transport).await
    }

    async fn update_transport(
        &self,
        id: TransportId,
        request: UpdateTransportRequest,
    ) -> AdventureResult<TransportDto> {
        debug!("Updating transport: {}", id);

        request.validate_request()?;

        let mut transport = self.stores.require_transport(id).await?;
        apply_transport_update(&mut transport, request);

        let updated = match self.stores.transports.update(&transport).await {
            Err(error) if error.is_not_found() => {
                self.propagator.on_transport_deleted(id, &[]).await?;
                return Err(error);
            }
            written => written?,
        };

        info!("Transport updated: {}", id);
        self.propagator.on_transport_updated(&updated).await
    }

    async fn delete_transport(&self, id: TransportId) -> AdventureResult<()> {
        debug!("Deleting transport: {}", id);

        self.stores.require_transport(id).await?;
        let users: Vec<TourId> = self
            .stores
            .tours
            .find_by_transport(id)
            .await?
            .into_iter()
            .map(|tour| tour.id)
            .collect();

        if !self.stores.transports.delete(id).await? {
            return Err(AdventureError::not_found("Transport", id));
        }

        info!("Transport deleted: {} ({} tours cleared)", id, users.len());
        self.propagator.on_transport_deleted(id, &users).await
    }
}
