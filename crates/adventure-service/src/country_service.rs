//! Country service trait definition.

use crate::dto::{CountryDto, CountrySearchResponse, CreateCountryRequest, UpdateCountryRequest};
use adventure_core::{AdventureResult, CountryId, Interface, TourId};
use async_trait::async_trait;

/// Country service trait.
#[async_trait]
pub trait CountryService: Interface + Send + Sync {
    /// Lists all countries.
    async fn list_countries(&self) -> AdventureResult<Vec<CountryDto>>;

    /// Gets a country by ID.
    async fn get_country(&self, id: CountryId) -> AdventureResult<Option<CountryDto>>;

    /// Finds countries whose name starts with `prefix`. Not cached.
    async fn search_countries(&self, prefix: &str) -> AdventureResult<CountrySearchResponse>;

    /// Creates a country, linking it to any requested tours.
    async fn create_country(&self, request: CreateCountryRequest) -> AdventureResult<CountryDto>;

    /// Creates several countries. Every request is validated and every
    /// referenced tour checked before the first insert.
    async fn create_countries(
        &self,
        requests: Vec<CreateCountryRequest>,
    ) -> AdventureResult<Vec<CountryDto>>;

    /// Updates a country's fields.
    async fn update_country(
        &self,
        id: CountryId,
        request: UpdateCountryRequest,
    ) -> AdventureResult<CountryDto>;

    /// Deletes a country and its tour links.
    async fn delete_country(&self, id: CountryId) -> AdventureResult<()>;

    /// Links a tour to a country.
    async fn add_tour(&self, country_id: CountryId, tour_id: TourId) -> AdventureResult<CountryDto>;

    /// Unlinks a tour from a country.
    async fn remove_tour(
        &self,
        country_id: CountryId,
        tour_id: TourId,
    ) -> AdventureResult<CountryDto>;
}
