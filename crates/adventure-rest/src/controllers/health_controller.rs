//! Health check controller.

use crate::state::AppState;
use adventure_core::HealthStatus;
use adventure_service::RegistryStats;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Per-kind cache counters.
    #[schema(value_type = Object)]
    pub cache: RegistryStats,
}

/// Result of one dependency probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct DependencyStatus {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Readiness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub dependencies: Vec<DependencyStatus>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: state.registry.stats(),
    })
}

/// Readiness check endpoint.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let probes = state.health_checks.iter().map(|check| async move {
        let status = check.check().await;
        (check.name().to_string(), status)
    });

    let results = join_all(probes).await;
    let ready = !results.iter().any(|(_, status)| status.is_unhealthy());

    let dependencies = results
        .into_iter()
        .map(|(name, status)| {
            if status.is_unhealthy() {
                warn!(dependency = %name, status = status.label(), "Dependency unhealthy");
            }
            let label = status.label().to_string();
            let detail = match status {
                HealthStatus::Healthy => None,
                HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => Some(reason),
            };
            DependencyStatus {
                name,
                status: label,
                detail,
            }
        })
        .collect();

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(ReadinessResponse { ready, dependencies }))
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
