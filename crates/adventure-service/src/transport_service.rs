//! Transport service trait definition.

use crate::dto::{CreateTransportRequest, TransportDto, UpdateTransportRequest};
use adventure_core::{AdventureResult, Interface, TransportId};
use async_trait::async_trait;

/// Transport service trait.
#[async_trait]
pub trait TransportService: Interface + Send + Sync {
    /// Lists all transports.
    async fn list_transports(&self) -> AdventureResult<Vec<TransportDto>>;

    /// Gets a transport by ID.
    async fn get_transport(&self, id: TransportId) -> AdventureResult<Option<TransportDto>>;

    /// Creates a transport.
    async fn create_transport(
        &self,
        request: CreateTransportRequest,
    ) -> AdventureResult<TransportDto>;

    /// Updates a transport. Tours using it are re-snapshotted.
    async fn update_transport(
        &self,
        id: TransportId,
        request: UpdateTransportRequest,
    ) -> AdventureResult<TransportDto>;

    /// Deletes a transport, clearing it from every tour that used it.
    async fn delete_transport(&self, id: TransportId) -> AdventureResult<()>;
}
