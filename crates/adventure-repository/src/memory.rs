//! In-memory catalog store.
//!
//! Implements all three repository traits over one shared state so the
//! Country↔Tour link set stays symmetric exactly as the MySQL link table does.
//! Used for local runs without a database (`database.url = "memory://"`) and
//! as the store behind service and REST tests, which can inspect per-operation
//! call counts and inject failures.

use crate::traits::{CountryRepository, TourRepository, TransportRepository};
use adventure_core::{
    AdventureError, AdventureResult, Country, CountryId, NewCountry, NewTour, NewTransport, Tour,
    TourId, Transport, TransportId,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
struct CountryRecord {
    name: String,
    available: bool,
    attractions: String,
    visa_cost: f64,
    national_languages: String,
}

#[derive(Debug, Clone)]
struct TourRecord {
    name: String,
    description: String,
    duration_days: i32,
    transport_id: Option<TransportId>,
}

#[derive(Debug, Default)]
struct StoreState {
    countries: BTreeMap<CountryId, CountryRecord>,
    tours: BTreeMap<TourId, TourRecord>,
    transports: BTreeMap<TransportId, Transport>,
    links: BTreeSet<(TourId, CountryId)>,
    next_id: i64,
}

impl StoreState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn country(&self, id: CountryId) -> Option<Country> {
        self.countries.get(&id).map(|record| Country {
            id,
            name: record.name.clone(),
            available: record.available,
            attractions: record.attractions.clone(),
            visa_cost: record.visa_cost,
            national_languages: record.national_languages.clone(),
            tour_ids: self
                .links
                .iter()
                .filter(|(_, country_id)| *country_id == id)
                .map(|(tour_id, _)| *tour_id)
                .collect(),
        })
    }

    fn tour(&self, id: TourId) -> Option<Tour> {
        self.tours.get(&id).map(|record| Tour {
            id,
            name: record.name.clone(),
            description: record.description.clone(),
            duration_days: record.duration_days,
            country_ids: self
                .links
                .iter()
                .filter(|(tour_id, _)| *tour_id == id)
                .map(|(_, country_id)| *country_id)
                .collect(),
            transport_id: record.transport_id,
        })
    }

    fn check_tour_refs(
        &self,
        country_ids: &BTreeSet<CountryId>,
        transport_id: Option<TransportId>,
    ) -> AdventureResult<()> {
        if let Some(missing) = country_ids.iter().find(|id| !self.countries.contains_key(*id)) {
            return Err(foreign_key_violation("country", *missing));
        }
        if let Some(transport_id) = transport_id {
            if !self.transports.contains_key(&transport_id) {
                return Err(foreign_key_violation("transport", transport_id));
            }
        }
        Ok(())
    }

    fn check_country_refs(&self, country: &NewCountry) -> AdventureResult<()> {
        match country.tour_ids.iter().find(|id| !self.tours.contains_key(*id)) {
            Some(missing) => Err(foreign_key_violation("tour", *missing)),
            None => Ok(()),
        }
    }

    fn insert_country(&mut self, country: &NewCountry) -> Country {
        let id = CountryId(self.allocate_id());
        self.countries.insert(
            id,
            CountryRecord {
                name: country.name.clone(),
                available: country.available,
                attractions: country.attractions.clone(),
                visa_cost: country.visa_cost,
                national_languages: country.national_languages.clone(),
            },
        );
        self.links
            .extend(country.tour_ids.iter().map(|tour_id| (*tour_id, id)));
        country.clone().into_country(id)
    }

    fn replace_tour_links(&mut self, tour_id: TourId, country_ids: &BTreeSet<CountryId>) {
        self.links.retain(|(linked_tour, _)| *linked_tour != tour_id);
        self.links
            .extend(country_ids.iter().map(|country_id| (tour_id, *country_id)));
    }
}

fn foreign_key_violation(kind: &str, id: impl std::fmt::Display) -> AdventureError {
    AdventureError::Database(format!("foreign key violation: {kind} {id} does not exist"))
}

/// Shared in-memory store for countries, tours, and transports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times `operation` (e.g. `"tour.find_by_id"`) was called.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    /// Forgets all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    /// Makes every later call to `operation` fail with a database error.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    /// Stops injecting failures for `operation`.
    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().remove(operation);
    }

    /// Returns true if the link exists, as seen by the store.
    #[must_use]
    pub fn is_linked(&self, country_id: CountryId, tour_id: TourId) -> bool {
        self.state.lock().links.contains(&(tour_id, country_id))
    }

    fn enter(&self, operation: &'static str) -> AdventureResult<()> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        debug!(operation, "In-memory store call");
        if self.failing.lock().contains(operation) {
            return Err(AdventureError::Database(format!("injected failure in {operation}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CountryRepository for InMemoryStore {
    async fn find_all(&self) -> AdventureResult<Vec<Country>> {
        self.enter("country.find_all")?;
        let state = self.state.lock();
        Ok(state.countries.keys().filter_map(|id| state.country(*id)).collect())
    }

    async fn find_by_id(&self, id: CountryId) -> AdventureResult<Option<Country>> {
        self.enter("country.find_by_id")?;
        Ok(self.state.lock().country(id))
    }

    async fn find_all_by_id(&self, ids: &[CountryId]) -> AdventureResult<Vec<Country>> {
        self.enter("country.find_all_by_id")?;
        let state = self.state.lock();
        let wanted: BTreeSet<CountryId> = ids.iter().copied().collect();
        Ok(wanted.into_iter().filter_map(|id| state.country(id)).collect())
    }

    async fn find_by_name_like(&self, prefix: &str) -> AdventureResult<Vec<Country>> {
        self.enter("country.find_by_name_like")?;
        let state = self.state.lock();
        let mut matches: Vec<Country> = state
            .countries
            .iter()
            .filter(|(_, record)| record.name.starts_with(prefix))
            .filter_map(|(id, _)| state.country(*id))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    async fn count(&self) -> AdventureResult<u64> {
        self.enter("country.count")?;
        Ok(self.state.lock().countries.len() as u64)
    }

    async fn save(&self, country: &NewCountry) -> AdventureResult<Country> {
        self.enter("country.save")?;
        let mut state = self.state.lock();
        state.check_country_refs(country)?;
        Ok(state.insert_country(country))
    }

    async fn save_all(&self, countries: &[NewCountry]) -> AdventureResult<Vec<Country>> {
        self.enter("country.save_all")?;
        let mut state = self.state.lock();
        for country in countries {
            state.check_country_refs(country)?;
        }
        Ok(countries
            .iter()
            .map(|country| state.insert_country(country))
            .collect())
    }

    async fn update(&self, country: &Country) -> AdventureResult<Country> {
        self.enter("country.update")?;
        let mut state = self.state.lock();
        let record = state
            .countries
            .get_mut(&country.id)
            .ok_or_else(|| AdventureError::not_found("Country", country.id))?;
        record.name.clone_from(&country.name);
        record.available = country.available;
        record.attractions.clone_from(&country.attractions);
        record.visa_cost = country.visa_cost;
        record.national_languages.clone_from(&country.national_languages);
        Ok(country.clone())
    }

    async fn delete(&self, id: CountryId) -> AdventureResult<bool> {
        self.enter("country.delete")?;
        let mut state = self.state.lock();
        state.links.retain(|(_, country_id)| *country_id != id);
        Ok(state.countries.remove(&id).is_some())
    }
}

#[async_trait]
impl TourRepository for InMemoryStore {
    async fn find_all(&self) -> AdventureResult<Vec<Tour>> {
        self.enter("tour.find_all")?;
        let state = self.state.lock();
        Ok(state.tours.keys().filter_map(|id| state.tour(*id)).collect())
    }

    async fn find_by_id(&self, id: TourId) -> AdventureResult<Option<Tour>> {
        self.enter("tour.find_by_id")?;
        Ok(self.state.lock().tour(id))
    }

    async fn find_all_by_id(&self, ids: &[TourId]) -> AdventureResult<Vec<Tour>> {
        self.enter("tour.find_all_by_id")?;
        let state = self.state.lock();
        let wanted: BTreeSet<TourId> = ids.iter().copied().collect();
        Ok(wanted.into_iter().filter_map(|id| state.tour(id)).collect())
    }

    async fn find_by_transport(&self, transport_id: TransportId) -> AdventureResult<Vec<Tour>> {
        self.enter("tour.find_by_transport")?;
        let state = self.state.lock();
        Ok(state
            .tours
            .iter()
            .filter(|(_, record)| record.transport_id == Some(transport_id))
            .filter_map(|(id, _)| state.tour(*id))
            .collect())
    }

    async fn find_by_transport_name(&self, name: &str) -> AdventureResult<Vec<Tour>> {
        self.enter("tour.find_by_transport_name")?;
        let state = self.state.lock();
        Ok(state
            .tours
            .iter()
            .filter(|(_, record)| {
                record
                    .transport_id
                    .and_then(|id| state.transports.get(&id))
                    .is_some_and(|transport| transport.name == name)
            })
            .filter_map(|(id, _)| state.tour(*id))
            .collect())
    }

    async fn count(&self) -> AdventureResult<u64> {
        self.enter("tour.count")?;
        Ok(self.state.lock().tours.len() as u64)
    }

    async fn save(&self, tour: &NewTour) -> AdventureResult<Tour> {
        self.enter("tour.save")?;
        let mut state = self.state.lock();
        state.check_tour_refs(&tour.country_ids, tour.transport_id)?;

        let id = TourId(state.allocate_id());
        state.tours.insert(
            id,
            TourRecord {
                name: tour.name.clone(),
                description: tour.description.clone(),
                duration_days: tour.duration_days,
                transport_id: tour.transport_id,
            },
        );
        state.replace_tour_links(id, &tour.country_ids);

        Ok(tour.clone().into_tour(id))
    }

    async fn update(&self, tour: &Tour) -> AdventureResult<Tour> {
        self.enter("tour.update")?;
        let mut state = self.state.lock();
        state.check_tour_refs(&tour.country_ids, tour.transport_id)?;

        let record = state
            .tours
            .get_mut(&tour.id)
            .ok_or_else(|| AdventureError::not_found("Tour", tour.id))?;
        record.name.clone_from(&tour.name);
        record.description.clone_from(&tour.description);
        record.duration_days = tour.duration_days;
        record.transport_id = tour.transport_id;
        state.replace_tour_links(tour.id, &tour.country_ids);
        Ok(tour.clone())
    }

    async fn delete(&self, id: TourId) -> AdventureResult<bool> {
        self.enter("tour.delete")?;
        let mut state = self.state.lock();
        state.links.retain(|(tour_id, _)| *tour_id != id);
        Ok(state.tours.remove(&id).is_some())
    }
}

#[async_trait]
impl TransportRepository for InMemoryStore {
    async fn find_all(&self) -> AdventureResult<Vec<Transport>> {
        self.enter("transport.find_all")?;
        Ok(self.state.lock().transports.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TransportId) -> AdventureResult<Option<Transport>> {
        self.enter("transport.find_by_id")?;
        Ok(self.state.lock().transports.get(&id).cloned())
    }

    async fn find_all_by_id(&self, ids: &[TransportId]) -> AdventureResult<Vec<Transport>> {
        self.enter("transport.find_all_by_id")?;
        let state = self.state.lock();
        let wanted: BTreeSet<TransportId> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.transports.get(&id).cloned())
            .collect())
    }

    async fn count(&self) -> AdventureResult<u64> {
        self.enter("transport.count")?;
        Ok(self.state.lock().transports.len() as u64)
    }

    async fn save(&self, transport: &NewTransport) -> AdventureResult<Transport> {
        self.enter("transport.save")?;
        let mut state = self.state.lock();
        let id = TransportId(state.allocate_id());
        let transport = transport.clone().into_transport(id);
        state.transports.insert(id, transport.clone());
        Ok(transport)
    }

    async fn update(&self, transport: &Transport) -> AdventureResult<Transport> {
        self.enter("transport.update")?;
        let mut state = self.state.lock();
        let existing = state
            .transports
            .get_mut(&transport.id)
            .ok_or_else(|| AdventureError::not_found("Transport", transport.id))?;
        existing.clone_from(transport);
        Ok(transport.clone())
    }

    async fn delete(&self, id: TransportId) -> AdventureResult<bool> {
        self.enter("transport.delete")?;
        let mut state = self.state.lock();
        for record in state.tours.values_mut() {
            if record.transport_id == Some(id) {
                record.transport_id = None;
            }
        }
        Ok(state.transports.remove(&id).is_some())
    }
}
