//! Service-level tests for read-through caching and cache propagation.
//!
//! Every test runs the real services over an `InMemoryStore`, whose call
//! counters show when a read was answered from cache and whose failure
//! injection drives the store and propagation error paths.

use adventure_config::{CacheConfig, FindAllPolicy};
use adventure_core::{
    AdventureResult, Country, CountryId, NewCountry, NewTour, Tour, TourId, TransportId,
};
use adventure_repository::{CountryRepository, InMemoryStore, TourRepository};
use adventure_service::{
    CatalogServices, CatalogStores, CountryDto, CountryService, CreateCountryRequest,
    CreateTourRequest, CreateTransportRequest, TourDto, TourService, TransportDto,
    TransportService, UpdateCountryRequest, UpdateTourRequest, UpdateTransportRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;

struct Catalog {
    store: Arc<InMemoryStore>,
    services: CatalogServices,
}

fn catalog_with(capacity: usize, find_all_policy: FindAllPolicy) -> Catalog {
    let store = Arc::new(InMemoryStore::new());
    let config = CacheConfig {
        capacity,
        find_all_policy,
    };
    let services = CatalogServices::new(CatalogStores::shared(store.clone()), &config).unwrap();
    Catalog { store, services }
}

fn catalog() -> Catalog {
    catalog_with(100, FindAllPolicy::CacheFirst)
}

fn country_request(name: &str) -> CreateCountryRequest {
    CreateCountryRequest {
        name: name.to_string(),
        available: true,
        attractions: "Old town".to_string(),
        visa_cost: 25.0,
        national_languages: "Local".to_string(),
        tour_ids: Vec::new(),
    }
}

fn tour_request(
    name: &str,
    countries: &[CountryId],
    transport: Option<TransportId>,
) -> CreateTourRequest {
    CreateTourRequest {
        name: name.to_string(),
        description: "Guided trip".to_string(),
        duration_days: 5,
        country_ids: countries.to_vec(),
        transport_id: transport,
    }
}

fn transport_request(name: &str) -> CreateTransportRequest {
    CreateTransportRequest {
        name: name.to_string(),
        capacity: 50,
        cost: 99.0,
    }
}

impl Catalog {
    async fn country(&self, name: &str) -> CountryDto {
        self.services
            .country_service
            .create_country(country_request(name))
            .await
            .unwrap()
    }

    async fn tour(&self, name: &str, countries: &[CountryId]) -> TourDto {
        self.services
            .tour_service
            .create_tour(tour_request(name, countries, None))
            .await
            .unwrap()
    }

    async fn transport(&self, name: &str) -> TransportDto {
        self.services
            .transport_service
            .create_transport(transport_request(name))
            .await
            .unwrap()
    }

    fn cached_country(&self, id: CountryId) -> Option<CountryDto> {
        self.services.registry.countries().get(&id)
    }

    fn cached_tour(&self, id: TourId) -> Option<TourDto> {
        self.services.registry.tours().get(&id)
    }

    fn cached_transport(&self, id: TransportId) -> Option<TransportDto> {
        self.services.registry.transports().get(&id)
    }
}

fn ids<T: Ord>(items: impl IntoIterator<Item = T>) -> BTreeSet<T> {
    items.into_iter().collect()
}

fn italia() -> UpdateCountryRequest {
    UpdateCountryRequest {
        name: "Italia".to_string(),
        available: true,
        attractions: "Colosseum".to_string(),
        visa_cost: 40.0,
        national_languages: "Italian".to_string(),
    }
}

// =============================================================================
// Interleaved writes
// =============================================================================

/// A write that another request commits just before ours reaches the store.
enum Race {
    DeleteTourBeforeBatch(TourId),
    DeleteTourBeforeUpdate(TourId),
    LinkBeforeCountryUpdate(TourId, CountryId),
}

/// Country and tour repositories over an `InMemoryStore` that commit one
/// armed [`Race`] right before the next batch insert or update.
struct RacingStore {
    store: Arc<InMemoryStore>,
    race: Mutex<Option<Race>>,
}

impl RacingStore {
    fn arm(&self, race: Race) {
        *self.race.lock() = Some(race);
    }

    async fn run_race(&self) -> AdventureResult<()> {
        let race = self.race.lock().take();
        match race {
            Some(Race::DeleteTourBeforeBatch(id) | Race::DeleteTourBeforeUpdate(id)) => {
                TourRepository::delete(&*self.store, id).await?;
            }
            Some(Race::LinkBeforeCountryUpdate(tour_id, country_id)) => {
                if let Some(mut tour) = TourRepository::find_by_id(&*self.store, tour_id).await? {
                    tour.link_country(country_id);
                    TourRepository::update(&*self.store, &tour).await?;
                }
            }
            None => {}
        }
        Ok(())
    }
}

#[async_trait]
impl CountryRepository for RacingStore {
    async fn find_all(&self) -> AdventureResult<Vec<Country>> {
        CountryRepository::find_all(&*self.store).await
    }

    async fn find_by_id(&self, id: CountryId) -> AdventureResult<Option<Country>> {
        CountryRepository::find_by_id(&*self.store, id).await
    }

    async fn find_all_by_id(&self, ids: &[CountryId]) -> AdventureResult<Vec<Country>> {
        CountryRepository::find_all_by_id(&*self.store, ids).await
    }

    async fn find_by_name_like(&self, prefix: &str) -> AdventureResult<Vec<Country>> {
        self.store.find_by_name_like(prefix).await
    }

    async fn count(&self) -> AdventureResult<u64> {
        CountryRepository::count(&*self.store).await
    }

    async fn save(&self, country: &NewCountry) -> AdventureResult<Country> {
        CountryRepository::save(&*self.store, country).await
    }

    async fn save_all(&self, countries: &[NewCountry]) -> AdventureResult<Vec<Country>> {
        self.run_race().await?;
        self.store.save_all(countries).await
    }

    async fn update(&self, country: &Country) -> AdventureResult<Country> {
        self.run_race().await?;
        CountryRepository::update(&*self.store, country).await
    }

    async fn delete(&self, id: CountryId) -> AdventureResult<bool> {
        CountryRepository::delete(&*self.store, id).await
    }
}

#[async_trait]
impl TourRepository for RacingStore {
    async fn find_all(&self) -> AdventureResult<Vec<Tour>> {
        TourRepository::find_all(&*self.store).await
    }

    async fn find_by_id(&self, id: TourId) -> AdventureResult<Option<Tour>> {
        TourRepository::find_by_id(&*self.store, id).await
    }

    async fn find_all_by_id(&self, ids: &[TourId]) -> AdventureResult<Vec<Tour>> {
        TourRepository::find_all_by_id(&*self.store, ids).await
    }

    async fn find_by_transport(&self, transport_id: TransportId) -> AdventureResult<Vec<Tour>> {
        self.store.find_by_transport(transport_id).await
    }

    async fn find_by_transport_name(&self, name: &str) -> AdventureResult<Vec<Tour>> {
        self.store.find_by_transport_name(name).await
    }

    async fn count(&self) -> AdventureResult<u64> {
        TourRepository::count(&*self.store).await
    }

    async fn save(&self, tour: &NewTour) -> AdventureResult<Tour> {
        TourRepository::save(&*self.store, tour).await
    }

    async fn update(&self, tour: &Tour) -> AdventureResult<Tour> {
        self.run_race().await?;
        TourRepository::update(&*self.store, tour).await
    }

    async fn delete(&self, id: TourId) -> AdventureResult<bool> {
        TourRepository::delete(&*self.store, id).await
    }
}

fn racing_catalog() -> (Catalog, Arc<RacingStore>) {
    let store = Arc::new(InMemoryStore::new());
    let racing = Arc::new(RacingStore {
        store: store.clone(),
        race: Mutex::new(None),
    });
    let config = CacheConfig {
        capacity: 100,
        find_all_policy: FindAllPolicy::CacheFirst,
    };
    let stores = CatalogStores::new(racing.clone(), racing.clone(), store.clone());
    let services = CatalogServices::new(stores, &config).unwrap();
    (Catalog { store, services }, racing)
}

// =============================================================================
// Read-through
// =============================================================================

#[tokio::test]
async fn test_create_then_get_is_served_from_cache() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    catalog.store.reset_calls();

    let found = catalog
        .services
        .country_service
        .get_country(italy.id)
        .await
        .unwrap();

    assert_eq!(found, Some(italy));
    assert_eq!(catalog.store.call_count("country.find_by_id"), 0);
}

#[tokio::test]
async fn test_get_twice_queries_store_once() {
    let catalog = catalog_with(1, FindAllPolicy::CacheFirst);
    let bus = catalog.transport("Bus").await;
    // Capacity one: creating a second transport evicts the first.
    catalog.transport("Train").await;
    catalog.store.reset_calls();

    let first = catalog.services.transport_service.get_transport(bus.id).await.unwrap();
    let second = catalog.services.transport_service.get_transport(bus.id).await.unwrap();

    assert_eq!(first, Some(bus));
    assert_eq!(first, second);
    assert_eq!(catalog.store.call_count("transport.find_by_id"), 1);
}

#[tokio::test]
async fn test_get_missing_returns_none_and_caches_nothing() {
    let catalog = catalog();

    let found = catalog
        .services
        .tour_service
        .get_tour(TourId(404))
        .await
        .unwrap();

    assert!(found.is_none());
    assert!(catalog.services.registry.tours().is_empty());
}

#[tokio::test]
async fn test_store_read_failure_is_not_masked() {
    let catalog = catalog();
    catalog.store.fail_on("country.find_all");

    let err = catalog
        .services
        .country_service
        .list_countries()
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "DATABASE_ERROR");
}

#[tokio::test]
async fn test_list_cache_first_keeps_warm_collection() {
    let catalog = catalog();
    catalog.country("Italy").await;

    // Written behind the services' back, so no cache entry exists for it.
    CountryRepository::save(
        &*catalog.store,
        &NewCountry {
            name: "Chile".to_string(),
            available: true,
            attractions: "Andes".to_string(),
            visa_cost: 0.0,
            national_languages: "Spanish".to_string(),
            tour_ids: BTreeSet::new(),
        },
    )
    .await
    .unwrap();

    let listed = catalog.services.country_service.list_countries().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(catalog.store.call_count("country.find_all"), 0);
}

#[tokio::test]
async fn test_list_reconcile_reloads_when_counts_differ() {
    let catalog = catalog_with(100, FindAllPolicy::Reconcile);
    catalog.country("Italy").await;
    CountryRepository::save(
        &*catalog.store,
        &NewCountry {
            name: "Chile".to_string(),
            available: true,
            attractions: "Andes".to_string(),
            visa_cost: 0.0,
            national_languages: "Spanish".to_string(),
            tour_ids: BTreeSet::new(),
        },
    )
    .await
    .unwrap();

    let listed = catalog.services.country_service.list_countries().await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(catalog.services.registry.countries().len(), 2);

    catalog.store.reset_calls();
    let again = catalog.services.country_service.list_countries().await.unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(catalog.store.call_count("country.find_all"), 0);
}

#[tokio::test]
async fn test_cold_list_populates_cache() {
    let catalog = catalog();
    catalog.transport("Bus").await;
    catalog.transport("Ferry").await;
    catalog.services.registry.transports().clear();

    let listed = catalog.services.transport_service.list_transports().await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(catalog.services.registry.transports().len(), 2);
}

// =============================================================================
// Relationships
// =============================================================================

#[tokio::test]
async fn test_link_and_unlink_are_symmetric_in_cache() {
    let catalog = catalog();
    let peru = catalog.country("Peru").await;
    let inca = catalog.tour("Inca Trail", &[]).await;

    let linked = catalog
        .services
        .country_service
        .add_tour(peru.id, inca.id)
        .await
        .unwrap();

    assert_eq!(linked.tour_ids(), vec![inca.id]);
    assert_eq!(catalog.cached_tour(inca.id).unwrap().country_ids(), vec![peru.id]);
    assert!(catalog.store.is_linked(peru.id, inca.id));

    let unlinked = catalog
        .services
        .country_service
        .remove_tour(peru.id, inca.id)
        .await
        .unwrap();

    assert!(unlinked.tours.is_empty());
    assert!(catalog.cached_country(peru.id).unwrap().tours.is_empty());
    assert!(catalog.cached_tour(inca.id).unwrap().countries.is_empty());
    assert!(!catalog.store.is_linked(peru.id, inca.id));
}

#[tokio::test]
async fn test_create_tour_with_countries_refreshes_countries() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    let france = catalog.country("France").await;

    let tour = catalog.tour("Alps", &[italy.id, france.id]).await;

    assert_eq!(tour.country_ids(), vec![italy.id, france.id]);
    assert_eq!(catalog.cached_country(italy.id).unwrap().tour_ids(), vec![tour.id]);
    assert_eq!(catalog.cached_country(france.id).unwrap().tour_ids(), vec![tour.id]);
}

#[tokio::test]
async fn test_create_country_with_tours_refreshes_tours() {
    let catalog = catalog();
    let tour = catalog.tour("Fjords", &[]).await;

    let mut request = country_request("Norway");
    request.tour_ids = vec![tour.id];
    let norway = catalog
        .services
        .country_service
        .create_country(request)
        .await
        .unwrap();

    assert_eq!(norway.tour_ids(), vec![tour.id]);
    assert_eq!(catalog.cached_tour(tour.id).unwrap().country_ids(), vec![norway.id]);
}

#[tokio::test]
async fn test_update_country_refreshes_linked_tours() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    let tour = catalog.tour("Rome", &[italy.id]).await;

    catalog
        .services
        .country_service
        .update_country(
            italy.id,
            UpdateCountryRequest {
                name: "Italia".to_string(),
                available: false,
                attractions: "Colosseum".to_string(),
                visa_cost: 40.0,
                national_languages: "Italian".to_string(),
            },
        )
        .await
        .unwrap();

    let cached = catalog.cached_tour(tour.id).unwrap();
    let italia = catalog.cached_country(italy.id).unwrap();
    assert_eq!(cached.countries, vec![italia.summary()]);
    assert!(!cached.countries[0].available);
    assert_eq!(italia.tour_ids(), vec![tour.id]);
}

#[tokio::test]
async fn test_update_tour_refreshes_linked_countries() {
    let catalog = catalog();
    let japan = catalog.country("Japan").await;
    let tour = catalog.tour("Kyoto", &[japan.id]).await;

    catalog
        .services
        .tour_service
        .update_tour(
            tour.id,
            UpdateTourRequest {
                name: "Kyoto Temples".to_string(),
                description: "Temples and gardens".to_string(),
                duration_days: 7,
            },
        )
        .await
        .unwrap();

    let cached = catalog.cached_country(japan.id).unwrap();
    let kyoto = catalog.cached_tour(tour.id).unwrap();
    assert_eq!(cached.tours, vec![kyoto.summary()]);
    assert_eq!(cached.tours[0].duration_days, 7);
}

#[tokio::test]
async fn test_assign_and_clear_transport() {
    let catalog = catalog();
    let spain = catalog.country("Spain").await;
    let tour = catalog.tour("Camino", &[spain.id]).await;
    let coach = catalog.transport("Coach").await;
    catalog.services.registry.transports().clear();

    let assigned = catalog
        .services
        .tour_service
        .assign_transport(tour.id, coach.id)
        .await
        .unwrap();

    assert_eq!(assigned.transport, Some(coach.clone()));
    assert_eq!(catalog.cached_tour(tour.id).unwrap().transport, Some(coach.clone()));
    assert_eq!(catalog.cached_transport(coach.id), Some(coach.clone()));
    assert_eq!(catalog.cached_country(spain.id).unwrap().tour_ids(), vec![tour.id]);

    let cleared = catalog
        .services
        .tour_service
        .clear_transport(tour.id)
        .await
        .unwrap();

    assert!(cleared.transport.is_none());
    assert!(catalog.cached_tour(tour.id).unwrap().transport.is_none());
}

#[tokio::test]
async fn test_update_transport_propagates_to_tours_and_countries() {
    let catalog = catalog();
    let c1 = catalog.country("Chile").await;
    let c2 = catalog.country("Argentina").await;
    let c3 = catalog.country("Bolivia").await;
    let bus = catalog.transport("Bus").await;

    let t1 = catalog
        .services
        .tour_service
        .create_tour(tour_request("Atacama", &[c1.id], Some(bus.id)))
        .await
        .unwrap();
    let t2 = catalog
        .services
        .tour_service
        .create_tour(tour_request("Salt Flats", &[c2.id, c3.id], Some(bus.id)))
        .await
        .unwrap();

    // Plant stale country entries; only a re-put can replace them.
    let originals = [c1.clone(), c2.clone(), c3.clone()];
    for country in &originals {
        let mut stale = catalog.cached_country(country.id).unwrap();
        stale.name = format!("{} (stale)", country.name);
        stale.tours.clear();
        catalog.services.registry.countries().put(country.id, stale);
    }
    catalog.store.reset_calls();

    let updated = catalog
        .services
        .transport_service
        .update_transport(
            bus.id,
            UpdateTransportRequest {
                name: "Sleeper Bus".to_string(),
                capacity: 30,
                cost: 150.0,
            },
        )
        .await
        .unwrap();
    assert!(catalog.store.call_count("country.find_all_by_id") >= 1);
    catalog.store.reset_calls();

    for tour_id in [t1.id, t2.id] {
        let tour = catalog.services.tour_service.get_tour(tour_id).await.unwrap().unwrap();
        assert_eq!(tour.transport, Some(updated.clone()));
    }
    for country in &originals {
        let cached = catalog.cached_country(country.id).unwrap();
        assert_eq!(cached.name, country.name);
    }
    assert_eq!(catalog.cached_country(c1.id).unwrap().tour_ids(), vec![t1.id]);
    assert_eq!(catalog.cached_country(c2.id).unwrap().tour_ids(), vec![t2.id]);
    assert_eq!(catalog.cached_country(c3.id).unwrap().tour_ids(), vec![t2.id]);
    assert_eq!(catalog.store.call_count("tour.find_by_id"), 0);
    assert_eq!(catalog.store.call_count("country.find_by_id"), 0);
}

// =============================================================================
// Deletion cleanup
// =============================================================================

#[tokio::test]
async fn test_delete_country_cleans_linked_tours() {
    let catalog = catalog();
    let greece = catalog.country("Greece").await;
    let turkey = catalog.country("Turkey").await;
    let t1 = catalog.tour("Aegean", &[greece.id, turkey.id]).await;
    let t2 = catalog.tour("Athens", &[greece.id]).await;

    catalog
        .services
        .country_service
        .delete_country(greece.id)
        .await
        .unwrap();
    catalog.store.reset_calls();

    assert!(catalog.cached_country(greece.id).is_none());
    let t1 = catalog.services.tour_service.get_tour(t1.id).await.unwrap().unwrap();
    let t2 = catalog.services.tour_service.get_tour(t2.id).await.unwrap().unwrap();
    assert_eq!(t1.country_ids(), vec![turkey.id]);
    assert!(t2.countries.is_empty());
    assert_eq!(catalog.store.call_count("tour.find_by_id"), 0);
    assert!(catalog
        .services
        .country_service
        .get_country(greece.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_tour_cleans_linked_countries() {
    let catalog = catalog();
    let egypt = catalog.country("Egypt").await;
    let tour = catalog.tour("Nile", &[egypt.id]).await;

    catalog.services.tour_service.delete_tour(tour.id).await.unwrap();

    assert!(catalog.cached_tour(tour.id).is_none());
    assert!(catalog.cached_country(egypt.id).unwrap().tours.is_empty());
    assert!(!catalog.store.is_linked(egypt.id, tour.id));
}

#[tokio::test]
async fn test_delete_transport_clears_tours() {
    let catalog = catalog();
    let kenya = catalog.country("Kenya").await;
    let jeep = catalog.transport("Jeep").await;
    let safari = catalog
        .services
        .tour_service
        .create_tour(tour_request("Safari", &[kenya.id], Some(jeep.id)))
        .await
        .unwrap();
    assert_eq!(safari.transport, Some(jeep.clone()));

    catalog
        .services
        .transport_service
        .delete_transport(jeep.id)
        .await
        .unwrap();

    assert!(catalog.cached_transport(jeep.id).is_none());
    assert!(catalog.cached_tour(safari.id).unwrap().transport.is_none());
    let stored = TourRepository::find_by_id(&*catalog.store, safari.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.transport_id, None);
}

// =============================================================================
// Failure semantics
// =============================================================================

#[tokio::test]
async fn test_missing_reference_aborts_before_write() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    catalog.store.reset_calls();

    let err = catalog
        .services
        .country_service
        .add_tour(italy.id, TourId(404))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(catalog.store.call_count("tour.update"), 0);

    let err = catalog
        .services
        .tour_service
        .create_tour(tour_request("Ghost", &[italy.id, CountryId(404)], None))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(catalog.store.call_count("tour.save"), 0);
}

#[tokio::test]
async fn test_bulk_create_checks_every_reference_first() {
    let catalog = catalog();
    let mut bad = country_request("Atlantis");
    bad.tour_ids = vec![TourId(404)];

    let err = catalog
        .services
        .country_service
        .create_countries(vec![country_request("Italy"), bad])
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(CountryRepository::count(&*catalog.store).await.unwrap(), 0);

    let created = catalog
        .services
        .country_service
        .create_countries(vec![country_request("Italy"), country_request("Malta")])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(catalog.services.registry.countries().len(), 2);
}

#[tokio::test]
async fn test_store_write_failure_skips_propagation() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    catalog.store.fail_on("country.update");

    let err = catalog
        .services
        .country_service
        .update_country(italy.id, italia())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "DATABASE_ERROR");
    assert_eq!(catalog.cached_country(italy.id).unwrap().name, "Italy");
}

#[tokio::test]
async fn test_propagation_failure_is_surfaced_after_durable_write() {
    let catalog = catalog();
    let italy = catalog.country("Italy").await;
    catalog.tour("Rome", &[italy.id]).await;
    catalog.store.fail_on("tour.find_all_by_id");

    let err = catalog
        .services
        .country_service
        .update_country(italy.id, italia())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "PROPAGATION_ERROR");
    let stored = CountryRepository::find_by_id(&*catalog.store, italy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Italia");
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_store() {
    let catalog = catalog();
    let mut request = country_request("Italy");
    request.visa_cost = -5.0;

    let err = catalog
        .services
        .country_service
        .create_country(request)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(catalog.store.call_count("country.save"), 0);
}

// =============================================================================
// Uncached queries
// =============================================================================

#[tokio::test]
async fn test_search_countries_by_prefix() {
    let catalog = catalog();
    catalog.country("Iceland").await;
    catalog.country("India").await;
    catalog.country("Chile").await;

    let response = catalog
        .services
        .country_service
        .search_countries("I")
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(
        ids(response.countries.iter().map(|c| c.name.clone())),
        ids(["Iceland".to_string(), "India".to_string()])
    );

    let blank = catalog.services.country_service.search_countries("  ").await;
    assert!(blank.is_err());
}

#[tokio::test]
async fn test_find_tours_by_transport_name() {
    let catalog = catalog();
    let train = catalog.transport("Train").await;
    let tour = catalog
        .services
        .tour_service
        .create_tour(tour_request("Rail Pass", &[], Some(train.id)))
        .await
        .unwrap();
    catalog.tour("Walking", &[]).await;

    let found = catalog
        .services
        .tour_service
        .find_tours_by_transport_name("Train")
        .await
        .unwrap();

    assert_eq!(found, vec![tour]);
}

// =============================================================================
// Bulk create
// =============================================================================

#[tokio::test]
async fn test_bulk_create_is_all_or_nothing() {
    let (catalog, racing) = racing_catalog();
    let coast = catalog.tour("Coast", &[]).await;
    let mut malta = country_request("Malta");
    malta.tour_ids = vec![coast.id];
    racing.arm(Race::DeleteTourBeforeBatch(coast.id));

    let err = catalog
        .services
        .country_service
        .create_countries(vec![country_request("Italy"), malta, country_request("Spain")])
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "DATABASE_ERROR");
    assert_eq!(CountryRepository::count(&*catalog.store).await.unwrap(), 0);
    assert!(catalog.services.registry.countries().is_empty());
}

#[tokio::test]
async fn test_bulk_create_refreshes_every_country_despite_one_failure() {
    let catalog = catalog();
    let coast = catalog.tour("Coast", &[]).await;
    let mut italy = country_request("Italy");
    italy.tour_ids = vec![coast.id];
    // Only refreshing Coast after the write needs this lookup.
    catalog.store.fail_on("country.find_all_by_id");

    let err = catalog
        .services
        .country_service
        .create_countries(vec![italy, country_request("Malta")])
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "PROPAGATION_ERROR");
    assert_eq!(CountryRepository::count(&*catalog.store).await.unwrap(), 2);
    let malta = catalog.store.find_by_name_like("Malta").await.unwrap();
    assert_eq!(malta.len(), 1);
    assert_eq!(catalog.cached_country(malta[0].id).unwrap().name, "Malta");
}

// =============================================================================
// Interleaved writes
// =============================================================================

#[tokio::test]
async fn test_update_of_concurrently_deleted_tour_is_not_cached() {
    let (catalog, racing) = racing_catalog();
    let italy = catalog.country("Italy").await;
    let alps = catalog.tour("Alps", &[italy.id]).await;
    racing.arm(Race::DeleteTourBeforeUpdate(alps.id));

    let err = catalog
        .services
        .tour_service
        .update_tour(
            alps.id,
            UpdateTourRequest {
                name: "Alps 2".to_string(),
                description: "Glaciers".to_string(),
                duration_days: 6,
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(TourRepository::find_by_id(&*catalog.store, alps.id)
        .await
        .unwrap()
        .is_none());
    assert!(catalog.cached_tour(alps.id).is_none());
    assert_eq!(catalog.services.tour_service.get_tour(alps.id).await.unwrap(), None);
    assert!(catalog.cached_country(italy.id).unwrap().tours.is_empty());
}

#[tokio::test]
async fn test_update_country_caches_links_committed_meanwhile() {
    let (catalog, racing) = racing_catalog();
    let italy = catalog.country("Italy").await;
    let rome = catalog.tour("Rome", &[]).await;
    racing.arm(Race::LinkBeforeCountryUpdate(rome.id, italy.id));

    let updated = catalog
        .services
        .country_service
        .update_country(italy.id, italia())
        .await
        .unwrap();

    assert!(catalog.store.is_linked(italy.id, rome.id));
    assert_eq!(updated.tour_ids(), vec![rome.id]);
    assert_eq!(catalog.cached_country(italy.id).unwrap().tour_ids(), vec![rome.id]);
    let cached_rome = catalog.cached_tour(rome.id).unwrap();
    assert_eq!(cached_rome.country_ids(), vec![italy.id]);
    assert_eq!(cached_rome.countries[0].name, "Italia");
}
