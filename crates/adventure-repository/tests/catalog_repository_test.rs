//! Integration tests for the MySQL catalog repositories.
//!
//! These tests run against a real MySQL database using testcontainers and
//! need Docker: `cargo test -p adventure-repository -- --ignored`.

mod common;

use adventure_core::{CountryId, NewCountry, NewTour, NewTransport, TourId};
use adventure_repository::{
    CountryRepository, MySqlCountryRepository, MySqlTourRepository, MySqlTransportRepository,
    TourRepository, TransportRepository,
};
use common::TestDatabase;
use std::collections::BTreeSet;

fn new_country(name: &str) -> NewCountry {
    NewCountry {
        name: name.to_string(),
        available: true,
        attractions: "Museums".to_string(),
        visa_cost: 25.5,
        national_languages: "Many".to_string(),
        tour_ids: BTreeSet::new(),
    }
}

fn new_tour(name: &str, countries: &[CountryId]) -> NewTour {
    NewTour {
        name: name.to_string(),
        description: "A week on the road".to_string(),
        duration_days: 7,
        country_ids: countries.iter().copied().collect(),
        transport_id: None,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_and_find_country() {
    let db = TestDatabase::new().await;
    let repo = MySqlCountryRepository::new(db.pool());

    let saved = repo.save(&new_country("Portugal")).await.expect("Failed to save country");
    let found = repo
        .find_by_id(saved.id)
        .await
        .expect("Query failed")
        .expect("Country not found");

    assert_eq!(found.name, "Portugal");
    assert!((found.visa_cost - 25.5).abs() < f64::EPSILON);
    assert!(found.tour_ids.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlCountryRepository::new(db.pool());

    let result = repo.find_by_id(CountryId(424_242)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_tour_links_are_symmetric() {
    let db = TestDatabase::new().await;
    let countries = MySqlCountryRepository::new(db.pool());
    let tours = MySqlTourRepository::new(db.pool());

    let spain = countries.save(&new_country("Spain")).await.unwrap();
    let france = countries.save(&new_country("France")).await.unwrap();
    let mut tour = tours.save(&new_tour("Pyrenees", &[spain.id, france.id])).await.unwrap();

    let spain_loaded = countries.find_by_id(spain.id).await.unwrap().unwrap();
    assert!(spain_loaded.tour_ids.contains(&tour.id));

    tour.unlink_country(spain.id);
    tours.update(&tour).await.unwrap();

    let spain_loaded = countries.find_by_id(spain.id).await.unwrap().unwrap();
    let france_loaded = countries.find_by_id(france.id).await.unwrap().unwrap();
    assert!(!spain_loaded.tour_ids.contains(&tour.id));
    assert!(france_loaded.tour_ids.contains(&tour.id));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_all_rolls_back_on_failure() {
    let db = TestDatabase::new().await;
    let countries = MySqlCountryRepository::new(db.pool());

    let mut dangling = new_country("Atlantis");
    dangling.tour_ids.insert(TourId(424_242));

    let result = countries
        .save_all(&[new_country("Spain"), dangling, new_country("Chile")])
        .await;
    assert!(result.is_err());
    assert_eq!(countries.count().await.unwrap(), 0);

    let saved = countries
        .save_all(&[new_country("Spain"), new_country("Chile")])
        .await
        .expect("Failed to save countries");
    assert_eq!(saved.len(), 2);
    assert_eq!(countries.count().await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_of_deleted_rows_is_not_found() {
    let db = TestDatabase::new().await;
    let countries = MySqlCountryRepository::new(db.pool());
    let tours = MySqlTourRepository::new(db.pool());

    let peru = countries.save(&new_country("Peru")).await.unwrap();
    let tour = tours.save(&new_tour("Inca Trail", &[])).await.unwrap();
    countries.delete(peru.id).await.unwrap();
    tours.delete(tour.id).await.unwrap();

    assert!(countries.update(&peru).await.unwrap_err().is_not_found());
    assert!(tours.update(&tour).await.unwrap_err().is_not_found());

    // Unchanged values still match the row.
    let chile = countries.save(&new_country("Chile")).await.unwrap();
    assert_eq!(countries.update(&chile).await.unwrap(), chile);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_country_removes_links() {
    let db = TestDatabase::new().await;
    let countries = MySqlCountryRepository::new(db.pool());
    let tours = MySqlTourRepository::new(db.pool());

    let peru = countries.save(&new_country("Peru")).await.unwrap();
    let tour = tours.save(&new_tour("Inca Trail", &[peru.id])).await.unwrap();

    assert!(countries.delete(peru.id).await.unwrap());

    let tour = tours.find_by_id(tour.id).await.unwrap().unwrap();
    assert!(tour.country_ids.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_transport_queries_and_delete() {
    let db = TestDatabase::new().await;
    let tours = MySqlTourRepository::new(db.pool());
    let transports = MySqlTransportRepository::new(db.pool());

    let train = transports
        .save(&NewTransport {
            name: "Train".to_string(),
            capacity: 300,
            cost: 80.0,
        })
        .await
        .unwrap();

    let mut draft = new_tour("Rail pass", &[]);
    draft.transport_id = Some(train.id);
    let tour = tours.save(&draft).await.unwrap();

    let by_transport = tours.find_by_transport(train.id).await.unwrap();
    assert_eq!(by_transport.len(), 1);
    let by_name = tours.find_by_transport_name("Train").await.unwrap();
    assert_eq!(by_name[0].id, tour.id);

    assert!(transports.delete(train.id).await.unwrap());
    let tour = tours.find_by_id(tour.id).await.unwrap().unwrap();
    assert_eq!(tour.transport_id, None);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_name_like_escapes_wildcards() {
    let db = TestDatabase::new().await;
    let repo = MySqlCountryRepository::new(db.pool());

    repo.save(&new_country("Norway")).await.unwrap();
    repo.save(&new_country("New Zealand")).await.unwrap();
    repo.save(&new_country("Chile")).await.unwrap();

    let matches = repo.find_by_name_like("N").await.unwrap();
    assert_eq!(matches.len(), 2);

    let none = repo.find_by_name_like("%").await.unwrap();
    assert!(none.is_empty());

    let all = repo.find_all_by_id(&[matches[0].id, matches[1].id]).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(repo.count().await.unwrap(), 3);
}
