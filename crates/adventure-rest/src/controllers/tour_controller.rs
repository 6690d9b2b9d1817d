//! Tour controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, found, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use adventure_core::{ErrorResponse, TourId, TransportId};
use adventure_service::{CreateTourRequest, TourDto, UpdateTourRequest};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Creates the tour router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tours).post(create_tour))
        .route("/by-transport", get(find_tours_by_transport))
        .route("/:id", get(get_tour).put(update_tour).delete(delete_tour))
        .route("/:tour_id/transport", delete(clear_transport))
        .route("/:tour_id/transport/:transport_id", post(assign_transport))
}

/// Transport name query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransportNameQuery {
    /// Exact transport name.
    pub name: String,
}

/// List all tours.
#[utoipa::path(
    get,
    path = "/tours",
    tag = "tours",
    responses(
        (status = 200, description = "All tours", body = [TourDto]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_tours(State(state): State<AppState>) -> ApiResult<Vec<TourDto>> {
    debug!("List tours request");

    let tours = state.tour_service.list_tours().await?;
    ok(tours)
}

/// Get a tour by ID.
#[utoipa::path(
    get,
    path = "/tours/{id}",
    tag = "tours",
    params(("id" = i64, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Tour found", body = TourDto),
        (status = 404, description = "Tour not found", body = ErrorResponse)
    )
)]
pub async fn get_tour(State(state): State<AppState>, Path(id): Path<TourId>) -> ApiResult<TourDto> {
    debug!("Get tour request: {}", id);

    let tour = state.tour_service.get_tour(id).await?;
    found(tour, "Tour", id)
}

/// Find tours by transport name.
#[utoipa::path(
    get,
    path = "/tours/by-transport",
    tag = "tours",
    params(TransportNameQuery),
    responses(
        (status = 200, description = "Tours using the transport", body = [TourDto]),
        (status = 400, description = "Blank name", body = ErrorResponse)
    )
)]
pub async fn find_tours_by_transport(
    State(state): State<AppState>,
    Query(query): Query<TransportNameQuery>,
) -> ApiResult<Vec<TourDto>> {
    debug!("Find tours by transport request: {}", query.name);

    let tours = state
        .tour_service
        .find_tours_by_transport_name(&query.name)
        .await?;
    ok(tours)
}

/// Create a tour.
#[utoipa::path(
    post,
    path = "/tours",
    tag = "tours",
    request_body = CreateTourRequest,
    responses(
        (status = 201, description = "Tour created", body = TourDto),
        (
            status = 404,
            description = "Referenced country or transport not found",
            body = ErrorResponse
        ),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_tour(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTourRequest>,
) -> CreatedResult<TourDto> {
    debug!("Create tour request: {}", request.name);

    let tour = state.tour_service.create_tour(request).await?;
    Ok(created(tour))
}

/// Update a tour.
#[utoipa::path(
    put,
    path = "/tours/{id}",
    tag = "tours",
    params(("id" = i64, Path, description = "Tour ID")),
    request_body = UpdateTourRequest,
    responses(
        (status = 200, description = "Tour updated", body = TourDto),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<TourId>,
    ValidatedJson(request): ValidatedJson<UpdateTourRequest>,
) -> ApiResult<TourDto> {
    debug!("Update tour request: {}", id);

    let tour = state.tour_service.update_tour(id, request).await?;
    ok(tour)
}

/// Delete a tour.
#[utoipa::path(
    delete,
    path = "/tours/{id}",
    tag = "tours",
    params(("id" = i64, Path, description = "Tour ID")),
    responses(
        (status = 204, description = "Tour deleted"),
        (status = 404, description = "Tour not found", body = ErrorResponse)
    )
)]
pub async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<TourId>,
) -> Result<StatusCode, AppError> {
    debug!("Delete tour request: {}", id);

    state.tour_service.delete_tour(id).await?;
    Ok(no_content())
}

/// Set or replace the transport of a tour.
#[utoipa::path(
    post,
    path = "/tours/{tour_id}/transport/{transport_id}",
    tag = "tours",
    params(
        ("tour_id" = i64, Path, description = "Tour ID"),
        ("transport_id" = i64, Path, description = "Transport ID")
    ),
    responses(
        (status = 200, description = "Transport assigned", body = TourDto),
        (status = 404, description = "Tour or transport not found", body = ErrorResponse)
    )
)]
pub async fn assign_transport(
    State(state): State<AppState>,
    Path((tour_id, transport_id)): Path<(TourId, TransportId)>,
) -> ApiResult<TourDto> {
    debug!("Assign transport {} to tour {}", transport_id, tour_id);

    let tour = state
        .tour_service
        .assign_transport(tour_id, transport_id)
        .await?;
    ok(tour)
}

/// Remove the transport from a tour.
#[utoipa::path(
    delete,
    path = "/tours/{tour_id}/transport",
    tag = "tours",
    params(("tour_id" = i64, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Transport cleared", body = TourDto),
        (status = 404, description = "Tour not found", body = ErrorResponse)
    )
)]
pub async fn clear_transport(
    State(state): State<AppState>,
    Path(tour_id): Path<TourId>,
) -> ApiResult<TourDto> {
    debug!("Clear transport of tour {}", tour_id);

    let tour = state.tour_service.clear_transport(tour_id).await?;
    ok(tour)
}
