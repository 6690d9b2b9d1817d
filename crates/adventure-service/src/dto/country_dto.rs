//! Country DTOs.

use super::TourSummary;
use adventure_core::rules::not_blank;
use adventure_core::{CountryId, TourId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Shallow country view: scalar fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CountrySummary {
    pub id: CountryId,
    pub name: String,
    pub available: bool,
    pub attractions: String,
    pub visa_cost: f64,
    pub national_languages: String,
}

/// Country snapshot with shallow tour views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CountryDto {
    pub id: CountryId,
    pub name: String,
    pub available: bool,
    pub attractions: String,
    pub visa_cost: f64,
    pub national_languages: String,
    /// Tours visiting this country, ordered by id.
    pub tours: Vec<TourSummary>,
}

impl CountryDto {
    /// Returns the ids of the linked tours.
    #[must_use]
    pub fn tour_ids(&self) -> Vec<TourId> {
        self.tours.iter().map(|tour| tour.id).collect()
    }

    /// Returns the shallow view of this country.
    #[must_use]
    pub fn summary(&self) -> CountrySummary {
        CountrySummary {
            id: self.id,
            name: self.name.clone(),
            available: self.available,
            attractions: self.attractions.clone(),
            visa_cost: self.visa_cost,
            national_languages: self.national_languages.clone(),
        }
    }

    /// One-line availability statement, e.g. "Italy is available."
    #[must_use]
    pub fn availability(&self) -> String {
        if self.available {
            format!("{} is available.", self.name)
        } else {
            format!("{} is not available.", self.name)
        }
    }
}

/// Request to create a country.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCountryRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[serde(default)]
    pub available: bool,

    #[validate(custom(function = "not_blank", message = "Attractions must not be blank"))]
    pub attractions: String,

    #[validate(range(min = 0.0, message = "Visa cost cannot be negative"))]
    pub visa_cost: f64,

    #[validate(custom(function = "not_blank", message = "National languages must not be blank"))]
    pub national_languages: String,

    /// Existing tours to link on create.
    #[serde(default)]
    pub tour_ids: Vec<TourId>,
}

/// Request to update the scalar fields of a country.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCountryRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[serde(default)]
    pub available: bool,

    #[validate(custom(function = "not_blank", message = "Attractions must not be blank"))]
    pub attractions: String,

    #[validate(range(min = 0.0, message = "Visa cost cannot be negative"))]
    pub visa_cost: f64,

    #[validate(custom(function = "not_blank", message = "National languages must not be blank"))]
    pub national_languages: String,
}

/// Result of a country name prefix search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountrySearchResponse {
    pub query: String,
    pub total: usize,
    /// Human-readable availability report.
    pub message: String,
    pub countries: Vec<CountryDto>,
}

impl CountrySearchResponse {
    /// Builds the response and its availability report.
    #[must_use]
    pub fn new(query: impl Into<String>, countries: Vec<CountryDto>) -> Self {
        let query = query.into();
        let message = if countries.is_empty() {
            format!("Country {query} is not found.")
        } else {
            let found: Vec<String> = countries.iter().map(CountryDto::availability).collect();
            format!("Countries found: {}", found.join(" "))
        };

        Self {
            query,
            total: countries.len(),
            message,
            countries,
        }
    }
}
