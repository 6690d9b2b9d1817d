//! Country controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, found, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use adventure_core::{CountryId, ErrorResponse, TourId};
use adventure_service::{
    CountryDto, CountrySearchResponse, CreateCountryRequest, UpdateCountryRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Creates the country router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_countries).post(create_country))
        .route("/bulk", post(create_countries))
        .route("/search", get(search_countries))
        .route(
            "/:id",
            get(get_country).put(update_country).delete(delete_country),
        )
        .route(
            "/:country_id/tours/:tour_id",
            post(add_tour).delete(remove_tour),
        )
}

/// Name prefix query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-sensitive name prefix.
    pub name: String,
}

/// List all countries.
#[utoipa::path(
    get,
    path = "/countries",
    tag = "countries",
    responses(
        (status = 200, description = "All countries", body = [CountryDto]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_countries(State(state): State<AppState>) -> ApiResult<Vec<CountryDto>> {
    debug!("List countries request");

    let countries = state.country_service.list_countries().await?;
    ok(countries)
}

/// Get a country by ID.
#[utoipa::path(
    get,
    path = "/countries/{id}",
    tag = "countries",
    params(("id" = i64, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Country found", body = CountryDto),
        (status = 404, description = "Country not found", body = ErrorResponse)
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<CountryId>,
) -> ApiResult<CountryDto> {
    debug!("Get country request: {}", id);

    let country = state.country_service.get_country(id).await?;
    found(country, "Country", id)
}

/// Search countries by name prefix.
#[utoipa::path(
    get,
    path = "/countries/search",
    tag = "countries",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching countries", body = CountrySearchResponse),
        (status = 400, description = "Blank name", body = ErrorResponse)
    )
)]
pub async fn search_countries(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<CountrySearchResponse> {
    debug!("Search countries request: {}", query.name);

    let response = state.country_service.search_countries(&query.name).await?;
    ok(response)
}

/// Create a country.
#[utoipa::path(
    post,
    path = "/countries",
    tag = "countries",
    request_body = CreateCountryRequest,
    responses(
        (status = 201, description = "Country created", body = CountryDto),
        (status = 404, description = "Referenced tour not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCountryRequest>,
) -> CreatedResult<CountryDto> {
    debug!("Create country request: {}", request.name);

    let country = state.country_service.create_country(request).await?;
    Ok(created(country))
}

/// Create several countries.
#[utoipa::path(
    post,
    path = "/countries/bulk",
    tag = "countries",
    request_body = [CreateCountryRequest],
    responses(
        (status = 201, description = "Countries created", body = [CountryDto]),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Referenced tour not found", body = ErrorResponse)
    )
)]
pub async fn create_countries(
    State(state): State<AppState>,
    Json(requests): Json<Vec<CreateCountryRequest>>,
) -> CreatedResult<Vec<CountryDto>> {
    debug!("Bulk create countries request: {}", requests.len());

    let countries = state.country_service.create_countries(requests).await?;
    Ok(created(countries))
}

/// Update a country.
#[utoipa::path(
    put,
    path = "/countries/{id}",
    tag = "countries",
    params(("id" = i64, Path, description = "Country ID")),
    request_body = UpdateCountryRequest,
    responses(
        (status = 200, description = "Country updated", body = CountryDto),
        (status = 404, description = "Country not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<CountryId>,
    ValidatedJson(request): ValidatedJson<UpdateCountryRequest>,
) -> ApiResult<CountryDto> {
    debug!("Update country request: {}", id);

    let country = state.country_service.update_country(id, request).await?;
    ok(country)
}

/// Delete a country.
#[utoipa::path(
    delete,
    path = "/countries/{id}",
    tag = "countries",
    params(("id" = i64, Path, description = "Country ID")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found", body = ErrorResponse)
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<CountryId>,
) -> Result<StatusCode, AppError> {
    debug!("Delete country request: {}", id);

    state.country_service.delete_country(id).await?;
    Ok(no_content())
}

/// Link a tour to a country.
#[utoipa::path(
    post,
    path = "/countries/{country_id}/tours/{tour_id}",
    tag = "countries",
    params(
        ("country_id" = i64, Path, description = "Country ID"),
        ("tour_id" = i64, Path, description = "Tour ID")
    ),
    responses(
        (status = 200, description = "Tour linked", body = CountryDto),
        (status = 404, description = "Country or tour not found", body = ErrorResponse)
    )
)]
pub async fn add_tour(
    State(state): State<AppState>,
    Path((country_id, tour_id)): Path<(CountryId, TourId)>,
) -> ApiResult<CountryDto> {
    debug!("Add tour {} to country {}", tour_id, country_id);

    let country = state.country_service.add_tour(country_id, tour_id).await?;
    ok(country)
}

/// Unlink a tour from a country.
#[utoipa::path(
    delete,
    path = "/countries/{country_id}/tours/{tour_id}",
    tag = "countries",
    params(
        ("country_id" = i64, Path, description = "Country ID"),
        ("tour_id" = i64, Path, description = "Tour ID")
    ),
    responses(
        (status = 200, description = "Tour unlinked", body = CountryDto),
        (status = 404, description = "Country or tour not found", body = ErrorResponse)
    )
)]
pub async fn remove_tour(
    State(state): State<AppState>,
    Path((country_id, tour_id)): Path<(CountryId, TourId)>,
) -> ApiResult<CountryDto> {
    debug!("Remove tour {} from country {}", tour_id, country_id);

    let country = state.country_service.remove_tour(country_id, tour_id).await?;
    ok(country)
}
