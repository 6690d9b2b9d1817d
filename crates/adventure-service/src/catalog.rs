//! Wiring for the cache core and the three services.

use crate::cache::CacheRegistry;
use crate::country_service::CountryService;
use crate::propagator::ConsistencyPropagator;
use crate::r#impl::{CountryServiceImpl, TourServiceImpl, TransportServiceImpl};
use crate::read_through::ReadThrough;
use crate::snapshot::{CatalogStores, SnapshotAssembler};
use crate::tour_service::TourService;
use crate::transport_service::TransportService;
use adventure_config::CacheConfig;
use adventure_core::AdventureResult;
use std::sync::Arc;
use tracing::info;

/// The catalog services sharing one cache registry.
///
/// Built once at startup; the caches live as long as this value.
#[derive(Clone)]
pub struct CatalogServices {
    pub registry: Arc<CacheRegistry>,
    pub country_service: Arc<dyn CountryService>,
    pub tour_service: Arc<dyn TourService>,
    pub transport_service: Arc<dyn TransportService>,
}

impl CatalogServices {
    /// Creates the registry, read-through, propagator, and services.
    pub fn new(stores: CatalogStores, config: &CacheConfig) -> AdventureResult<Self> {
        let registry = Arc::new(CacheRegistry::from_config(config)?);
        let reads = Arc::new(ReadThrough::from_config(registry.clone(), config));
        let propagator = Arc::new(ConsistencyPropagator::new(
            registry.clone(),
            SnapshotAssembler::new(stores.clone()),
        ));

        info!(
            capacity = config.capacity,
            find_all_policy = %config.find_all_policy,
            "Catalog caches ready"
        );

        Ok(Self {
            registry,
            country_service: Arc::new(CountryServiceImpl::new(
                stores.clone(),
                reads.clone(),
                propagator.clone(),
            )),
            tour_service: Arc::new(TourServiceImpl::new(
                stores.clone(),
                reads.clone(),
                propagator.clone(),
            )),
            transport_service: Arc::new(TransportServiceImpl::new(stores, reads, propagator)),
        })
    }
}
