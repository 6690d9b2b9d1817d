//! Tour DTOs.

use super::{CountrySummary, TransportDto};
use adventure_core::rules::not_blank;
use adventure_core::{CountryId, TourId, TransportId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Shallow tour view: scalar fields only.
///
/// Embedded in [`CountryDto`](super::CountryDto) so the cyclic country/tour
/// graph never expands past one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TourSummary {
    pub id: TourId,
    pub name: String,
    pub description: String,
    pub duration_days: i32,
}

/// Tour snapshot with shallow country views and the full transport view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TourDto {
    pub id: TourId,
    pub name: String,
    pub description: String,
    pub duration_days: i32,
    /// Visited countries, ordered by id.
    pub countries: Vec<CountrySummary>,
    pub transport: Option<TransportDto>,
}

impl TourDto {
    /// Returns the ids of the visited countries.
    #[must_use]
    pub fn country_ids(&self) -> Vec<CountryId> {
        self.countries.iter().map(|country| country.id).collect()
    }

    /// Returns the shallow view of this tour.
    #[must_use]
    pub fn summary(&self) -> TourSummary {
        TourSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            duration_days: self.duration_days,
        }
    }
}

/// Request to create a tour.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTourRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Description must not be blank"))]
    pub description: String,

    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: i32,

    /// Existing countries to link on create.
    #[serde(default)]
    pub country_ids: Vec<CountryId>,

    /// Existing transport to assign on create.
    #[serde(default)]
    pub transport_id: Option<TransportId>,
}

/// Request to update the scalar fields of a tour.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTourRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Description must not be blank"))]
    pub description: String,

    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: i32,
}
