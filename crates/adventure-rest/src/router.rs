//! Main application router.

use crate::{
    controllers::{country_controller, health_controller, tour_controller, transport_controller},
    middleware::{logging_middleware, REQUEST_ID_HEADER},
    openapi::ApiDoc,
    state::AppState,
};
use adventure_config::ServerConfig;
use axum::{http::HeaderName, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let api_router = Router::new()
        .nest("/countries", country_controller::router())
        .nest("/tours", tour_controller::router())
        .nest("/transports", transport_controller::router());

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TimeoutLayer::new(server_config.request_timeout()))
                .layer(cors)
                .layer(CompressionLayer::new()),
        );

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Adventure Catalog API v1"
}
