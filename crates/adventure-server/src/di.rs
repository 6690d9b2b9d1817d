//! Dependency injection module using Shaku.
//!
//! `CatalogModule` wires the MySQL pool into the three catalog repositories.
//! The cache core is not a Shaku component: it is built once per process by
//! [`CatalogServices`](adventure_service::CatalogServices) from the resolved
//! stores.

use adventure_repository::{
    CountryRepository, DatabasePool, DatabasePoolInterface, DatabasePoolParameters,
    MySqlCountryRepository, MySqlTourRepository, MySqlTransportRepository, TourRepository,
    TransportRepository,
};
use adventure_service::CatalogStores;
use shaku::{module, HasComponent};
use std::sync::Arc;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

module! {
    pub CatalogModule {
        components = [
            DatabasePool,
            MySqlCountryRepository,
            MySqlTourRepository,
            MySqlTransportRepository,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Builds the catalog module over an established MySQL pool.
///
/// The module's pool component shares connections with `pool`.
#[must_use]
pub fn build_catalog_module(pool: &DatabasePool) -> Arc<CatalogModule> {
    let module = CatalogModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool: pool.pool() })
        .build();

    Arc::new(module)
}

// ============================================================================
// Module Resolution Helpers
// ============================================================================

/// Trait for resolving the catalog stores from a module.
pub trait StoreResolver {
    /// Resolves the three repositories as one set of stores.
    fn catalog_stores(&self) -> CatalogStores;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl StoreResolver for CatalogModule {
    fn catalog_stores(&self) -> CatalogStores {
        let countries: Arc<dyn CountryRepository> = self.resolve();
        let tours: Arc<dyn TourRepository> = self.resolve();
        let transports: Arc<dyn TransportRepository> = self.resolve();
        CatalogStores::new(countries, tours, transports)
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_provides_catalog_components() {
        fn assert_has_countries<T: HasComponent<dyn CountryRepository>>() {}
        fn assert_has_tours<T: HasComponent<dyn TourRepository>>() {}
        fn assert_has_transports<T: HasComponent<dyn TransportRepository>>() {}
        fn assert_has_pool<T: HasComponent<dyn DatabasePoolInterface>>() {}

        assert_has_countries::<CatalogModule>();
        assert_has_tours::<CatalogModule>();
        assert_has_transports::<CatalogModule>();
        assert_has_pool::<CatalogModule>();
    }

    #[test]
    fn test_module_resolves_stores() {
        fn assert_resolver<T: StoreResolver>() {}
        assert_resolver::<CatalogModule>();
    }
}
