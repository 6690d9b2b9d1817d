//! Application state for Axum handlers.

use adventure_core::HealthCheck;
use adventure_service::{
    CacheRegistry, CatalogServices, CountryService, TourService, TransportService,
};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub country_service: Arc<dyn CountryService>,
    pub tour_service: Arc<dyn TourService>,
    pub transport_service: Arc<dyn TransportService>,
    pub registry: Arc<CacheRegistry>,
    /// Dependencies probed by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(services: CatalogServices) -> Self {
        Self {
            country_service: services.country_service,
            tour_service: services.tour_service,
            transport_service: services.transport_service,
            registry: services.registry,
            health_checks: Vec::new(),
        }
    }

    /// Adds a dependency to the readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
