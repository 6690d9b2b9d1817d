//! Transport controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, found, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use adventure_core::{ErrorResponse, TransportId};
use adventure_service::{CreateTransportRequest, TransportDto, UpdateTransportRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::debug;

/// Creates the transport router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transports).post(create_transport))
        .route(
            "/:id",
            get(get_transport)
                .put(update_transport)
                .delete(delete_transport),
        )
}

/// List all transports.
#[utoipa::path(
    get,
    path = "/transports",
    tag = "transports",
    responses(
        (status = 200, description = "All transports", body = [TransportDto]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_transports(State(state): State<AppState>) -> ApiResult<Vec<TransportDto>> {
    debug!("List transports request");

    let transports = state.transport_service.list_transports().await?;
    ok(transports)
}

/// Get a transport by ID.
#[utoipa::path(
    get,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i64, Path, description = "Transport ID")),
    responses(
        (status = 200, description = "Transport found", body = TransportDto),
        (status = 404, description = "Transport not found", body = ErrorResponse)
    )
)]
pub async fn get_transport(
    State(state): State<AppState>,
    Path(id): Path<TransportId>,
) -> ApiResult<TransportDto> {
    debug!("Get transport request: {}", id);

    let transport = state.transport_service.get_transport(id).await?;
    found(transport, "Transport", id)
}

/// Create a transport.
#[utoipa::path(
    post,
    path = "/transports",
    tag = "transports",
    request_body = CreateTransportRequest,
    responses(
        (status = 201, description = "Transport created", body = TransportDto),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_transport(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTransportRequest>,
) -> CreatedResult<TransportDto> {
    debug!("Create transport request: {}", request.name);

    let transport = state.transport_service.create_transport(request).await?;
    Ok(created(transport))
}

/// Update a transport.
#[utoipa::path(
    put,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i64, Path, description = "Transport ID")),
    request_body = UpdateTransportRequest,
    responses(
        (status = 200, description = "Transport updated", body = TransportDto),
        (status = 404, description = "Transport not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_transport(
    State(state): State<AppState>,
    Path(id): Path<TransportId>,
    ValidatedJson(request): ValidatedJson<UpdateTransportRequest>,
) -> ApiResult<TransportDto> {
    debug!("Update transport request: {}", id);

    let transport = state
        .transport_service
        .update_transport(id, request)
        .await?;
    ok(transport)
}

/// Delete a transport.
#[utoipa::path(
    delete,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i64, Path, description = "Transport ID")),
    responses(
        (status = 204, description = "Transport deleted"),
        (status = 404, description = "Transport not found", body = ErrorResponse)
    )
)]
pub async fn delete_transport(
    State(state): State<AppState>,
    Path(id): Path<TransportId>,
) -> Result<StatusCode, AppError> {
    debug!("Delete transport request: {}", id);

    state.transport_service.delete_transport(id).await?;
    Ok(no_content())
}
