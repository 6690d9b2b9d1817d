//! Entity-DTO mappers.
//!
//! Shallow views are plain `From` conversions. Full snapshots need the related
//! entities, which the caller resolves from the store and passes in.

use crate::dto::{
    CountryDto, CountrySummary, CreateCountryRequest, CreateTourRequest, CreateTransportRequest,
    TourDto, TourSummary, TransportDto, UpdateCountryRequest, UpdateTourRequest,
    UpdateTransportRequest,
};
use adventure_core::{Country, NewCountry, NewTour, NewTransport, Tour, Transport};

impl From<&Transport> for TransportDto {
    fn from(transport: &Transport) -> Self {
        Self {
            id: transport.id,
            name: transport.name.clone(),
            capacity: transport.capacity,
            cost: transport.cost,
        }
    }
}

impl From<&Country> for CountrySummary {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            name: country.name.clone(),
            available: country.available,
            attractions: country.attractions.clone(),
            visa_cost: country.visa_cost,
            national_languages: country.national_languages.clone(),
        }
    }
}

impl From<&Tour> for TourSummary {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id,
            name: tour.name.clone(),
            description: tour.description.clone(),
            duration_days: tour.duration_days,
        }
    }
}

/// Builds a country snapshot from the country and its linked tours.
///
/// Tours not in `country.tour_ids` are ignored; the result is ordered by id.
#[must_use]
pub fn country_snapshot<'a>(
    country: &Country,
    tours: impl IntoIterator<Item = &'a Tour>,
) -> CountryDto {
    let mut tours: Vec<TourSummary> = tours
        .into_iter()
        .filter(|tour| country.tour_ids.contains(&tour.id))
        .map(TourSummary::from)
        .collect();
    tours.sort_by_key(|tour| tour.id);
    tours.dedup_by_key(|tour| tour.id);

    CountryDto {
        id: country.id,
        name: country.name.clone(),
        available: country.available,
        attractions: country.attractions.clone(),
        visa_cost: country.visa_cost,
        national_languages: country.national_languages.clone(),
        tours,
    }
}

/// Builds a tour snapshot from the tour, its countries, and its transport.
///
/// Countries not in `tour.country_ids` are ignored, as is a transport that is
/// not the one the tour references.
#[must_use]
pub fn tour_snapshot<'a>(
    tour: &Tour,
    countries: impl IntoIterator<Item = &'a Country>,
    transport: Option<&Transport>,
) -> TourDto {
    let mut countries: Vec<CountrySummary> = countries
        .into_iter()
        .filter(|country| tour.country_ids.contains(&country.id))
        .map(CountrySummary::from)
        .collect();
    countries.sort_by_key(|country| country.id);
    countries.dedup_by_key(|country| country.id);

    TourDto {
        id: tour.id,
        name: tour.name.clone(),
        description: tour.description.clone(),
        duration_days: tour.duration_days,
        countries,
        transport: transport
            .filter(|transport| tour.transport_id == Some(transport.id))
            .map(TransportDto::from),
    }
}

impl From<CreateCountryRequest> for NewCountry {
    fn from(request: CreateCountryRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            available: request.available,
            attractions: request.attractions,
            visa_cost: request.visa_cost,
            national_languages: request.national_languages,
            tour_ids: request.tour_ids.into_iter().collect(),
        }
    }
}

impl From<CreateTourRequest> for NewTour {
    fn from(request: CreateTourRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request.description,
            duration_days: request.duration_days,
            country_ids: request.country_ids.into_iter().collect(),
            transport_id: request.transport_id,
        }
    }
}

impl From<CreateTransportRequest> for NewTransport {
    fn from(request: CreateTransportRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            capacity: request.capacity,
            cost: request.cost,
        }
    }
}

/// Applies an update request to a stored country, keeping its links.
pub fn apply_country_update(country: &mut Country, request: UpdateCountryRequest) {
    country.name = request.name.trim().to_string();
    country.available = request.available;
    country.attractions = request.attractions;
    country.visa_cost = request.visa_cost;
    country.national_languages = request.national_languages;
}

/// Applies an update request to a stored tour, keeping its links and transport.
pub fn apply_tour_update(tour: &mut Tour, request: UpdateTourRequest) {
    tour.name = request.name.trim().to_string();
    tour.description = request.description;
    tour.duration_days = request.duration_days;
}

/// Applies an update request to a stored transport.
pub fn apply_transport_update(transport: &mut Transport, request: UpdateTransportRequest) {
    transport.name = request.name.trim().to_string();
    transport.capacity = request.capacity;
    transport.cost = request.cost;
}
