//! Snapshot assembly from store entities.
//!
//! A snapshot embeds shallow views of its related entities, so building one
//! means resolving those entities from the store. Batch variants resolve all
//! related entities with one `find_all_by_id` per kind.

use crate::dto::{CountryDto, TourDto, TransportDto};
use crate::mappers::{country_snapshot, tour_snapshot};
use adventure_core::{
    AdventureError, AdventureResult, Country, CountryId, Tour, TourId, Transport, TransportId,
};
use adventure_repository::{CountryRepository, TourRepository, TransportRepository};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// The three store repositories, passed around together.
#[derive(Clone)]
pub struct CatalogStores {
    pub countries: Arc<dyn CountryRepository>,
    pub tours: Arc<dyn TourRepository>,
    pub transports: Arc<dyn TransportRepository>,
}

impl CatalogStores {
    /// Bundles the repositories.
    #[must_use]
    pub fn new(
        countries: Arc<dyn CountryRepository>,
        tours: Arc<dyn TourRepository>,
        transports: Arc<dyn TransportRepository>,
    ) -> Self {
        Self {
            countries,
            tours,
            transports,
        }
    }

    /// Uses one value that implements all three repositories.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CountryRepository + TourRepository + TransportRepository + 'static,
    {
        Self {
            countries: store.clone(),
            tours: store.clone(),
            transports: store,
        }
    }

    /// Loads a country or fails with `NotFound`.
    pub async fn require_country(&self, id: CountryId) -> AdventureResult<Country> {
        self.countries
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdventureError::not_found("Country", id))
    }

    /// Loads a tour or fails with `NotFound`.
    pub async fn require_tour(&self, id: TourId) -> AdventureResult<Tour> {
        self.tours
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdventureError::not_found("Tour", id))
    }

    /// Loads a transport or fails with `NotFound`.
    pub async fn require_transport(&self, id: TransportId) -> AdventureResult<Transport> {
        self.transports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdventureError::not_found("Transport", id))
    }

    /// Loads every listed country, failing with `NotFound` on the first missing id.
    pub async fn require_countries(
        &self,
        ids: &BTreeSet<CountryId>,
    ) -> AdventureResult<Vec<Country>> {
        let ids: Vec<CountryId> = ids.iter().copied().collect();
        let found = self.countries.find_all_by_id(&ids).await?;
        let present: BTreeSet<CountryId> = found.iter().map(|country| country.id).collect();

        match ids.iter().find(|id| !present.contains(id)) {
            Some(missing) => Err(AdventureError::not_found("Country", missing)),
            None => Ok(found),
        }
    }

    /// Loads every listed tour, failing with `NotFound` on the first missing id.
    pub async fn require_tours(&self, ids: &BTreeSet<TourId>) -> AdventureResult<Vec<Tour>> {
        let ids: Vec<TourId> = ids.iter().copied().collect();
        let found = self.tours.find_all_by_id(&ids).await?;
        let present: BTreeSet<TourId> = found.iter().map(|tour| tour.id).collect();

        match ids.iter().find(|id| !present.contains(id)) {
            Some(missing) => Err(AdventureError::not_found("Tour", missing)),
            None => Ok(found),
        }
    }
}

/// Builds snapshots by resolving related entities from the store.
#[derive(Clone)]
pub struct SnapshotAssembler {
    stores: CatalogStores,
}

impl SnapshotAssembler {
    /// Creates an assembler over the given stores.
    #[must_use]
    pub fn new(stores: CatalogStores) -> Self {
        Self { stores }
    }

    /// The underlying stores.
    #[must_use]
    pub fn stores(&self) -> &CatalogStores {
        &self.stores
    }

    /// Snapshot of one transport. Transports have no related views.
    #[must_use]
    pub fn transport(&self, transport: &Transport) -> TransportDto {
        TransportDto::from(transport)
    }

    /// Snapshot of one country.
    pub async fn country(&self, country: &Country) -> AdventureResult<CountryDto> {
        self.countries(std::slice::from_ref(country))
            .await?
            .pop()
            .ok_or_else(|| AdventureError::internal("country snapshot was not assembled"))
    }

    /// Snapshots of several countries, in input order.
    pub async fn countries(&self, countries: &[Country]) -> AdventureResult<Vec<CountryDto>> {
        let tour_ids: BTreeSet<TourId> = countries
            .iter()
            .flat_map(|country| country.tour_ids.iter().copied())
            .collect();
        let tours = self.tours_by_id(&tour_ids).await?;

        Ok(countries
            .iter()
            .map(|country| {
                country_snapshot(country, country.tour_ids.iter().filter_map(|id| tours.get(id)))
            })
            .collect())
    }

    /// Snapshot of one tour.
    pub async fn tour(&self, tour: &Tour) -> AdventureResult<TourDto> {
        self.tours(std::slice::from_ref(tour))
            .await?
            .pop()
            .ok_or_else(|| AdventureError::internal("tour snapshot was not assembled"))
    }

    /// Snapshots of several tours, in input order.
    pub async fn tours(&self, tours: &[Tour]) -> AdventureResult<Vec<TourDto>> {
        let country_ids: BTreeSet<CountryId> = tours
            .iter()
            .flat_map(|tour| tour.country_ids.iter().copied())
            .collect();
        let transport_ids: Vec<TransportId> = tours
            .iter()
            .filter_map(|tour| tour.transport_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let (countries, transports) = futures::try_join!(
            self.countries_by_id(&country_ids),
            self.transports_by_id(&transport_ids),
        )?;

        Ok(tours
            .iter()
            .map(|tour| {
                tour_snapshot(
                    tour,
                    tour.country_ids.iter().filter_map(|id| countries.get(id)),
                    tour.transport_id.and_then(|id| transports.get(&id)),
                )
            })
            .collect())
    }

    /// Loads and snapshots one country; `None` if it is not stored.
    pub async fn load_country(&self, id: CountryId) -> AdventureResult<Option<CountryDto>> {
        match self.stores.countries.find_by_id(id).await? {
            Some(country) => Ok(Some(self.country(&country).await?)),
            None => Ok(None),
        }
    }

    /// Loads and snapshots one tour; `None` if it is not stored.
    pub async fn load_tour(&self, id: TourId) -> AdventureResult<Option<TourDto>> {
        match self.stores.tours.find_by_id(id).await? {
            Some(tour) => Ok(Some(self.tour(&tour).await?)),
            None => Ok(None),
        }
    }

    /// Loads and snapshots one transport; `None` if it is not stored.
    pub async fn load_transport(&self, id: TransportId) -> AdventureResult<Option<TransportDto>> {
        Ok(self
            .stores
            .transports
            .find_by_id(id)
            .await?
            .map(|transport| self.transport(&transport)))
    }

    /// Loads and snapshots the stored countries among `ids`.
    pub async fn load_countries(&self, ids: &[CountryId]) -> AdventureResult<Vec<CountryDto>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let countries = self.stores.countries.find_all_by_id(ids).await?;
        self.countries(&countries).await
    }

    /// Loads and snapshots the stored tours among `ids`.
    pub async fn load_tours(&self, ids: &[TourId]) -> AdventureResult<Vec<TourDto>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let tours = self.stores.tours.find_all_by_id(ids).await?;
        self.tours(&tours).await
    }

    /// Loads and snapshots every stored country.
    pub async fn load_all_countries(&self) -> AdventureResult<Vec<CountryDto>> {
        let countries = self.stores.countries.find_all().await?;
        self.countries(&countries).await
    }

    /// Loads and snapshots every stored tour.
    pub async fn load_all_tours(&self) -> AdventureResult<Vec<TourDto>> {
        let tours = self.stores.tours.find_all().await?;
        self.tours(&tours).await
    }

    /// Loads and snapshots every stored transport.
    pub async fn load_all_transports(&self) -> AdventureResult<Vec<TransportDto>> {
        let transports = self.stores.transports.find_all().await?;
        Ok(transports.iter().map(|transport| self.transport(transport)).collect())
    }

    async fn tours_by_id(
        &self,
        ids: &BTreeSet<TourId>,
    ) -> AdventureResult<BTreeMap<TourId, Tour>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let ids: Vec<TourId> = ids.iter().copied().collect();
        Ok(self
            .stores
            .tours
            .find_all_by_id(&ids)
            .await?
            .into_iter()
            .map(|tour| (tour.id, tour))
            .collect())
    }

    async fn transports_by_id(
        &self,
        ids: &[TransportId],
    ) -> AdventureResult<BTreeMap<TransportId, Transport>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(self
            .stores
            .transports
            .find_all_by_id(ids)
            .await?
            .into_iter()
            .map(|transport| (transport.id, transport))
            .collect())
    }

    async fn countries_by_id(
        &self,
        ids: &BTreeSet<CountryId>,
    ) -> AdventureResult<BTreeMap<CountryId, Country>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let ids: Vec<CountryId> = ids.iter().copied().collect();
        Ok(self
            .stores
            .countries
            .find_all_by_id(&ids)
            .await?
            .into_iter()
            .map(|country| (country.id, country))
            .collect())
    }
}
