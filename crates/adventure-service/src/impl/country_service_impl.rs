//! Country service implementation.

use crate::country_service::CountryService;
use crate::dto::{CountryDto, CountrySearchResponse, CreateCountryRequest, UpdateCountryRequest};
use crate::mappers::apply_country_update;
use crate::propagator::ConsistencyPropagator;
use crate::read_through::ReadThrough;
use crate::snapshot::{CatalogStores, SnapshotAssembler};
use adventure_core::{
    AdventureError, AdventureResult, CountryId, NewCountry, Tour, TourId, ValidateExt,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Country service backed by the store and the snapshot caches.
pub struct CountryServiceImpl {
    stores: CatalogStores,
    assembler: SnapshotAssembler,
    reads: Arc<ReadThrough>,
    propagator: Arc<ConsistencyPropagator>,
}

impl CountryServiceImpl {
    /// Creates a new country service.
    #[must_use]
    pub fn new(
        stores: CatalogStores,
        reads: Arc<ReadThrough>,
        propagator: Arc<ConsistencyPropagator>,
    ) -> Self {
        Self {
            assembler: SnapshotAssembler::new(stores.clone()),
            stores,
            reads,
            propagator,
        }
    }

    /// Writes a tour's links. A tour deleted in the meantime is dropped from
    /// the cache before the `NotFound` is returned.
    async fn write_tour(&self, tour: &Tour) -> AdventureResult<Tour> {
        match self.stores.tours.update(tour).await {
            Err(error) if error.is_not_found() => {
                self.propagator
                    .on_tour_deleted(tour.id, &tour.country_ids)
                    .await?;
                Err(error)
            }
            written => written,
        }
    }
}

#[async_trait]
impl CountryService for CountryServiceImpl {
    async fn list_countries(&self) -> AdventureResult<Vec<CountryDto>> {
        debug!("Listing countries");

        self.reads
            .find_all(
                self.assembler.load_all_countries(),
                self.stores.countries.count(),
            )
            .await
    }

    async fn get_country(&self, id: CountryId) -> AdventureResult<Option<CountryDto>> {
        debug!("Getting country: {}", id);

        self.reads
            .find_by_id(id, |id| self.assembler.load_country(id))
            .await
    }

    async fn search_countries(&self, prefix: &str) -> AdventureResult<CountrySearchResponse> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(AdventureError::validation("Search name must not be blank"));
        }
        debug!("Searching countries by prefix: {}", prefix);

        let found = self.stores.countries.find_by_name_like(prefix).await?;
        let countries = self.assembler.countries(&found).await?;

        Ok(CountrySearchResponse::new(prefix, countries))
    }

    async fn create_country(&self, request: CreateCountryRequest) -> AdventureResult<CountryDto> {
        debug!("Creating country: {}", request.name);

        request.validate_request()?;
        let draft = NewCountry::from(request);

        self.stores.require_tours(&draft.tour_ids).await?;

        let country = self.stores.countries.save(&draft).await?;

        info!("Country created: {}", country.id);
        self.propagator.on_country_created(&country).await
    }

    async fn create_countries(
        &self,
        requests: Vec<CreateCountryRequest>,
    ) -> AdventureResult<Vec<CountryDto>> {
        debug!("Creating {} countries", requests.len());

        for request in &requests {
            request.validate_request()?;
        }
        let drafts: Vec<NewCountry> = requests.into_iter().map(NewCountry::from).collect();

        let referenced: BTreeSet<TourId> = drafts
            .iter()
            .flat_map(|draft| draft.tour_ids.iter().copied())
            .collect();
        self.stores.require_tours(&referenced).await?;

        let countries = self.stores.countries.save_all(&drafts).await?;
        info!("Countries created: {}", countries.len());

        // The batch is committed; refresh every country even if one refresh fails.
        let mut created = Vec::with_capacity(countries.len());
        let mut failure = None;
        for country in &countries {
            match self.propagator.on_country_created(country).await {
                Ok(snapshot) => created.push(snapshot),
                Err(error) => {
                    failure.get_or_insert(error);
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(created),
        }
    }

    async fn update_country(
        &self,
        id: CountryId,
        request: UpdateCountryRequest,
    ) -> AdventureResult<CountryDto> {
        debug!("Updating country: {}", id);

        request.validate_request()?;

        let mut country = self.stores.require_country(id).await?;
        apply_country_update(&mut country, request);

        let updated = match self.stores.countries.update(&country).await {
            Err(error) if error.is_not_found() => {
                self.propagator.on_country_deleted(id, &country.tour_ids).await?;
                return Err(error);
            }
            written => written?,
        };

        info!("Country updated: {}", id);
        self.propagator.on_country_updated(&updated).await
    }

    async fn delete_country(&self, id: CountryId) -> AdventureResult<()> {
        debug!("Deleting country: {}", id);

        let country = self.stores.require_country(id).await?;

        if !self.stores.countries.delete(id).await? {
            return Err(AdventureError::not_found("Country", id));
        }

        info!("Country deleted: {}", id);
        self.propagator.on_country_deleted(id, &country.tour_ids).await
    }

    async fn add_tour(
        &self,
        country_id: CountryId,
        tour_id: TourId,
    ) -> AdventureResult<CountryDto> {
        debug!("Adding tour {} to country {}", tour_id, country_id);

        self.stores.require_country(country_id).await?;
        let mut tour = self.stores.require_tour(tour_id).await?;

        if tour.link_country(country_id) {
            self.write_tour(&tour).await?;
            info!("Tour {} linked to country {}", tour_id, country_id);
        } else {
            debug!("Tour {} already linked to country {}", tour_id, country_id);
        }

        let (country, _) = self.propagator.on_link_changed(country_id, tour_id).await?;
        Ok(country)
    }

    async fn remove_tour(
        &self,
        country_id: CountryId,
        tour_id: TourId,
    ) -> AdventureResult<CountryDto> {
        debug!("Removing tour {} from country {}", tour_id, country_id);

        self.stores.require_country(country_id).await?;
        let mut tour = self.stores.require_tour(tour_id).await?;

        if tour.unlink_country(country_id) {
            self.write_tour(&tour).await?;
            info!("Tour {} unlinked from country {}", tour_id, country_id);
        } else {
            debug!("Tour {} was not linked to country {}", tour_id, country_id);
        }

        let (country, _) = self.propagator.on_link_changed(country_id, tour_id).await?;
        Ok(country)
    }
}
