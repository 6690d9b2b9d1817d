//! # Adventure Repository
//!
//! Durable store access for countries, tours, and transports.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn CountryRepository> / TourRepository / TransportRepository
//! MySqlCountryRepository, MySqlTourRepository, MySqlTransportRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL (countries, tours, transports, tour_countries)
//! ```
//!
//! [`InMemoryStore`] implements the same three traits without a database.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryStore;
pub use mysql::*;
pub use pool::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::{CountryId, NewCountry, NewTour, NewTransport, TourId, TransportId};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn new_country(name: &str) -> NewCountry {
        NewCountry {
            name: name.to_string(),
            available: true,
            attractions: "Old town".to_string(),
            visa_cost: 10.0,
            national_languages: "Local".to_string(),
            tour_ids: BTreeSet::new(),
        }
    }

    fn new_tour(name: &str, countries: &[CountryId]) -> NewTour {
        NewTour {
            name: name.to_string(),
            description: "Guided".to_string(),
            duration_days: 3,
            country_ids: countries.iter().copied().collect(),
            transport_id: None,
        }
    }

    fn repos() -> (
        Arc<InMemoryStore>,
        Arc<dyn CountryRepository>,
        Arc<dyn TourRepository>,
        Arc<dyn TransportRepository>,
    ) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), store.clone(), store.clone(), store)
    }

    // =============================================================================
    // InMemoryStore Tests
    // =============================================================================

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let (_, countries, _, _) = repos();

        let saved = countries.save(&new_country("Italy")).await.unwrap();
        let found = countries.find_by_id(saved.id).await.unwrap();

        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let (_, countries, tours, transports) = repos();

        assert!(countries.find_by_id(CountryId(99)).await.unwrap().is_none());
        assert!(tours.find_by_id(TourId(99)).await.unwrap().is_none());
        assert!(transports.find_by_id(TransportId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_links_are_visible_from_both_sides() {
        let (_, countries, tours, _) = repos();
        let italy = countries.save(&new_country("Italy")).await.unwrap();
        let france = countries.save(&new_country("France")).await.unwrap();

        let tour = tours.save(&new_tour("Riviera", &[italy.id, france.id])).await.unwrap();

        let italy = countries.find_by_id(italy.id).await.unwrap().unwrap();
        assert!(italy.tour_ids.contains(&tour.id));
        let stored = tours.find_by_id(tour.id).await.unwrap().unwrap();
        assert_eq!(stored.country_ids, BTreeSet::from([italy.id, france.id]));
    }

    #[tokio::test]
    async fn test_tour_update_rewrites_links() {
        let (store, countries, tours, _) = repos();
        let italy = countries.save(&new_country("Italy")).await.unwrap();
        let france = countries.save(&new_country("France")).await.unwrap();
        let mut tour = tours.save(&new_tour("Riviera", &[italy.id])).await.unwrap();

        tour.unlink_country(italy.id);
        tour.link_country(france.id);
        tours.update(&tour).await.unwrap();

        assert!(!store.is_linked(italy.id, tour.id));
        assert!(store.is_linked(france.id, tour.id));
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_references() {
        let (_, _, tours, _) = repos();

        let err = tours.save(&new_tour("Nowhere", &[CountryId(404)])).await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(tours.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_all_stores_nothing_when_one_draft_is_rejected() {
        let (_, countries, tours, _) = repos();
        let tour = tours.save(&new_tour("Coast", &[])).await.unwrap();
        let mut linked = new_country("Malta");
        linked.tour_ids.insert(tour.id);
        let mut dangling = new_country("Atlantis");
        dangling.tour_ids.insert(TourId(404));

        let err = countries
            .save_all(&[new_country("Italy"), linked.clone(), dangling])
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(countries.count().await.unwrap(), 0);
        let tour = tours.find_by_id(tour.id).await.unwrap().unwrap();
        assert!(tour.country_ids.is_empty());

        let saved = countries
            .save_all(&[new_country("Italy"), linked])
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].name, "Malta");
        assert!(saved[1].tour_ids.contains(&tour.id));
    }

    #[tokio::test]
    async fn test_update_of_deleted_row_is_not_found() {
        let (_, countries, tours, transports) = repos();
        let italy = countries.save(&new_country("Italy")).await.unwrap();
        let tour = tours.save(&new_tour("Rome", &[])).await.unwrap();
        let bus = transports
            .save(&NewTransport {
                name: "Bus".to_string(),
                capacity: 40,
                cost: 15.0,
            })
            .await
            .unwrap();

        countries.delete(italy.id).await.unwrap();
        tours.delete(tour.id).await.unwrap();
        transports.delete(bus.id).await.unwrap();

        assert!(countries.update(&italy).await.unwrap_err().is_not_found());
        assert!(tours.update(&tour).await.unwrap_err().is_not_found());
        assert!(transports.update(&bus).await.unwrap_err().is_not_found());
        assert_eq!(countries.count().await.unwrap(), 0);
        assert_eq!(tours.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_country_clears_links() {
        let (_, countries, tours, _) = repos();
        let italy = countries.save(&new_country("Italy")).await.unwrap();
        let tour = tours.save(&new_tour("Rome", &[italy.id])).await.unwrap();

        assert!(countries.delete(italy.id).await.unwrap());
        assert!(!countries.delete(italy.id).await.unwrap());

        let tour = tours.find_by_id(tour.id).await.unwrap().unwrap();
        assert!(tour.country_ids.is_empty());
    }

    #[tokio::test]
    async fn test_delete_transport_clears_tour_reference() {
        let (_, _, tours, transports) = repos();
        let bus = transports
            .save(&NewTransport {
                name: "Bus".to_string(),
                capacity: 40,
                cost: 15.0,
            })
            .await
            .unwrap();
        let mut draft = new_tour("Coach trip", &[]);
        draft.transport_id = Some(bus.id);
        let tour = tours.save(&draft).await.unwrap();

        assert_eq!(tours.find_by_transport(bus.id).await.unwrap().len(), 1);
        assert_eq!(tours.find_by_transport_name("Bus").await.unwrap().len(), 1);

        assert!(transports.delete(bus.id).await.unwrap());

        let tour = tours.find_by_id(tour.id).await.unwrap().unwrap();
        assert_eq!(tour.transport_id, None);
        assert!(tours.find_by_transport(bus.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_like_is_prefix_match() {
        let (_, countries, _, _) = repos();
        countries.save(&new_country("Iceland")).await.unwrap();
        countries.save(&new_country("India")).await.unwrap();
        countries.save(&new_country("Chile")).await.unwrap();

        let names: Vec<String> = countries
            .find_by_name_like("I")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Iceland".to_string(), "India".to_string()]);
    }

    #[tokio::test]
    async fn test_find_all_by_id_skips_unknown() {
        let (_, countries, _, _) = repos();
        let italy = countries.save(&new_country("Italy")).await.unwrap();

        let found = countries.find_all_by_id(&[italy.id, CountryId(77)]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, italy.id);
    }

    #[tokio::test]
    async fn test_call_counts_and_injected_failures() {
        let (store, countries, _, _) = repos();

        countries.find_all().await.unwrap();
        countries.find_all().await.unwrap();
        assert_eq!(store.call_count("country.find_all"), 2);

        store.fail_on("country.find_all");
        assert!(countries.find_all().await.is_err());
        store.recover("country.find_all");
        assert!(countries.find_all().await.is_ok());

        store.reset_calls();
        assert_eq!(store.call_count("country.find_all"), 0);
    }
}
