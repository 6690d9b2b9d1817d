//! Tour service trait definition.

use crate::dto::{CreateTourRequest, TourDto, UpdateTourRequest};
use adventure_core::{AdventureResult, Interface, TourId, TransportId};
use async_trait::async_trait;

/// Tour service trait.
#[async_trait]
pub trait TourService: Interface + Send + Sync {
    /// Lists all tours.
    async fn list_tours(&self) -> AdventureResult<Vec<TourDto>>;

    /// Gets a tour by ID.
    async fn get_tour(&self, id: TourId) -> AdventureResult<Option<TourDto>>;

    /// Creates a tour with its countries and transport.
    async fn create_tour(&self, request: CreateTourRequest) -> AdventureResult<TourDto>;

    /// Updates a tour's fields.
    async fn update_tour(&self, id: TourId, request: UpdateTourRequest) -> AdventureResult<TourDto>;

    /// Deletes a tour and its country links.
    async fn delete_tour(&self, id: TourId) -> AdventureResult<()>;

    /// Sets or replaces the transport of a tour.
    async fn assign_transport(
        &self,
        tour_id: TourId,
        transport_id: TransportId,
    ) -> AdventureResult<TourDto>;

    /// Removes the transport from a tour.
    async fn clear_transport(&self, tour_id: TourId) -> AdventureResult<TourDto>;

    /// Finds tours whose transport has the given name. Not cached.
    async fn find_tours_by_transport_name(&self, name: &str) -> AdventureResult<Vec<TourDto>>;
}
