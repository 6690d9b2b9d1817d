//! Repository trait definitions.
//!
//! The durable store is authoritative for every entity and relationship.
//! Reads report a missing id as `Ok(None)`; a store error is always returned
//! as `Err` so callers never mask it with cached data.

use adventure_core::{
    AdventureResult, Country, CountryId, Interface, NewCountry, NewTour, NewTransport, Tour,
    TourId, Transport, TransportId,
};
use async_trait::async_trait;

/// Country repository trait.
#[async_trait]
pub trait CountryRepository: Interface + Send + Sync {
    /// Returns every country in store order.
    async fn find_all(&self) -> AdventureResult<Vec<Country>>;

    /// Finds a country by ID.
    async fn find_by_id(&self, id: CountryId) -> AdventureResult<Option<Country>>;

    /// Finds the countries with the given IDs. Unknown IDs are skipped.
    async fn find_all_by_id(&self, ids: &[CountryId]) -> AdventureResult<Vec<Country>>;

    /// Finds countries whose name starts with `prefix`.
    async fn find_by_name_like(&self, prefix: &str) -> AdventureResult<Vec<Country>>;

    /// Counts all countries.
    async fn count(&self) -> AdventureResult<u64>;

    /// Inserts a country and links it to `country.tour_ids`, assigning the ID.
    async fn save(&self, country: &NewCountry) -> AdventureResult<Country>;

    /// Inserts every country in one transaction, in input order.
    ///
    /// Either all countries are stored or, on error, none of them are.
    async fn save_all(&self, countries: &[NewCountry]) -> AdventureResult<Vec<Country>>;

    /// Updates the scalar fields of an existing country.
    ///
    /// Tour links are owned by the tour side and are not written here.
    /// Fails with `NotFound` if the country is no longer stored.
    async fn update(&self, country: &Country) -> AdventureResult<Country>;

    /// Deletes a country together with every tour link that references it.
    async fn delete(&self, id: CountryId) -> AdventureResult<bool>;
}

/// Tour repository trait.
#[async_trait]
pub trait TourRepository: Interface + Send + Sync {
    /// Returns every tour in store order.
    async fn find_all(&self) -> AdventureResult<Vec<Tour>>;

    /// Finds a tour by ID.
    async fn find_by_id(&self, id: TourId) -> AdventureResult<Option<Tour>>;

    /// Finds the tours with the given IDs. Unknown IDs are skipped.
    async fn find_all_by_id(&self, ids: &[TourId]) -> AdventureResult<Vec<Tour>>;

    /// Finds every tour that references the given transport.
    async fn find_by_transport(&self, transport_id: TransportId) -> AdventureResult<Vec<Tour>>;

    /// Finds every tour whose transport has exactly the given name.
    async fn find_by_transport_name(&self, name: &str) -> AdventureResult<Vec<Tour>>;

    /// Counts all tours.
    async fn count(&self) -> AdventureResult<u64>;

    /// Inserts a tour with its country links and transport, assigning the ID.
    async fn save(&self, tour: &NewTour) -> AdventureResult<Tour>;

    /// Rewrites a tour, its transport reference, and its country links in one
    /// transaction. Fails with `NotFound` if the tour is no longer stored.
    async fn update(&self, tour: &Tour) -> AdventureResult<Tour>;

    /// Deletes a tour together with its country links.
    async fn delete(&self, id: TourId) -> AdventureResult<bool>;
}

/// Transport repository trait.
#[async_trait]
pub trait TransportRepository: Interface + Send + Sync {
    /// Returns every transport in store order.
    async fn find_all(&self) -> AdventureResult<Vec<Transport>>;

    /// Finds a transport by ID.
    async fn find_by_id(&self, id: TransportId) -> AdventureResult<Option<Transport>>;

    /// Finds the transports with the given IDs. Unknown IDs are skipped.
    async fn find_all_by_id(&self, ids: &[TransportId]) -> AdventureResult<Vec<Transport>>;

    /// Counts all transports.
    async fn count(&self) -> AdventureResult<u64>;

    /// Inserts a transport, assigning the ID.
    async fn save(&self, transport: &NewTransport) -> AdventureResult<Transport>;

    /// Updates an existing transport. Fails with `NotFound` if it is no longer
    /// stored.
    async fn update(&self, transport: &Transport) -> AdventureResult<Transport>;

    /// Deletes a transport, clearing the reference from every tour that used it.
    async fn delete(&self, id: TransportId) -> AdventureResult<bool>;
}
