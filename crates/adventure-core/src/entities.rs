//! Store-backed catalog entities.
//!
//! These are the live, authoritative records as the durable store returns
//! them. Relationships are held as identifier sets: the Country↔Tour link is a
//! single edge set seen from both sides, and a Tour points at most at one
//! Transport.

use crate::{CountryId, TourId, TransportId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A destination country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    /// Whether tours to this country can currently be booked.
    pub available: bool,
    pub attractions: String,
    /// Visa cost, never negative.
    pub visa_cost: f64,
    pub national_languages: String,
    /// Tours visiting this country.
    pub tour_ids: BTreeSet<TourId>,
}

/// Country data before the store has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub available: bool,
    pub attractions: String,
    pub visa_cost: f64,
    pub national_languages: String,
    /// Existing tours to attach on insert.
    pub tour_ids: BTreeSet<TourId>,
}

impl NewCountry {
    /// Combines the draft with the identifier assigned by the store.
    #[must_use]
    pub fn into_country(self, id: CountryId) -> Country {
        Country {
            id,
            name: self.name,
            available: self.available,
            attractions: self.attractions,
            visa_cost: self.visa_cost,
            national_languages: self.national_languages,
            tour_ids: self.tour_ids,
        }
    }
}

/// A packaged tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: TourId,
    pub name: String,
    pub description: String,
    /// Length of the tour in days, always positive.
    pub duration_days: i32,
    /// Countries this tour visits.
    pub country_ids: BTreeSet<CountryId>,
    pub transport_id: Option<TransportId>,
}

impl Tour {
    /// Adds a country to the tour. Returns false if it was already linked.
    pub fn link_country(&mut self, country_id: CountryId) -> bool {
        self.country_ids.insert(country_id)
    }

    /// Removes a country from the tour. Returns false if it was not linked.
    pub fn unlink_country(&mut self, country_id: CountryId) -> bool {
        self.country_ids.remove(&country_id)
    }

    /// Returns true if the tour visits the given country.
    #[must_use]
    pub fn visits(&self, country_id: CountryId) -> bool {
        self.country_ids.contains(&country_id)
    }
}

/// Tour data before the store has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTour {
    pub name: String,
    pub description: String,
    pub duration_days: i32,
    pub country_ids: BTreeSet<CountryId>,
    pub transport_id: Option<TransportId>,
}

impl NewTour {
    /// Combines the draft with the identifier assigned by the store.
    #[must_use]
    pub fn into_tour(self, id: TourId) -> Tour {
        Tour {
            id,
            name: self.name,
            description: self.description,
            duration_days: self.duration_days,
            country_ids: self.country_ids,
            transport_id: self.transport_id,
        }
    }
}

/// A means of transport a tour can use.
///
/// A transport has no owned collection of tours; the tours referencing it are
/// found by querying the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub id: TransportId,
    pub name: String,
    /// Seats available, always positive.
    pub capacity: i32,
    /// Cost per passenger, never negative.
    pub cost: f64,
}

/// Transport data before the store has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransport {
    pub name: String,
    pub capacity: i32,
    pub cost: f64,
}

impl NewTransport {
    /// Combines the draft with the identifier assigned by the store.
    #[must_use]
    pub fn into_transport(self, id: TransportId) -> Transport {
        Transport {
            id,
            name: self.name,
            capacity: self.capacity,
            cost: self.cost,
        }
    }
}
