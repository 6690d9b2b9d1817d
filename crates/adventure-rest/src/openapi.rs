//! OpenAPI documentation configuration.
//!
//! This module provides OpenAPI/Swagger documentation generation for the REST API.

use crate::controllers::health_controller::{DependencyStatus, HealthResponse, ReadinessResponse};
use adventure_core::{CountryId, ErrorResponse, FieldError, TourId, TransportId};
use adventure_service::{
    CountryDto, CountrySearchResponse, CountrySummary, CreateCountryRequest, CreateTourRequest,
    CreateTransportRequest, TourDto, TourSummary, TransportDto, UpdateCountryRequest,
    UpdateTourRequest, UpdateTransportRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Adventure catalog API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Adventure Catalog API",
        version = "1.0.0",
        description = "Travel catalog of countries, tours, and transports",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Country endpoints
        crate::controllers::country_controller::list_countries,
        crate::controllers::country_controller::get_country,
        crate::controllers::country_controller::search_countries,
        crate::controllers::country_controller::create_country,
        crate::controllers::country_controller::create_countries,
        crate::controllers::country_controller::update_country,
        crate::controllers::country_controller::delete_country,
        crate::controllers::country_controller::add_tour,
        crate::controllers::country_controller::remove_tour,
        // Tour endpoints
        crate::controllers::tour_controller::list_tours,
        crate::controllers::tour_controller::get_tour,
        crate::controllers::tour_controller::find_tours_by_transport,
        crate::controllers::tour_controller::create_tour,
        crate::controllers::tour_controller::update_tour,
        crate::controllers::tour_controller::delete_tour,
        crate::controllers::tour_controller::assign_transport,
        crate::controllers::tour_controller::clear_transport,
        // Transport endpoints
        crate::controllers::transport_controller::list_transports,
        crate::controllers::transport_controller::get_transport,
        crate::controllers::transport_controller::create_transport,
        crate::controllers::transport_controller::update_transport,
        crate::controllers::transport_controller::delete_transport,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            CountryId,
            TourId,
            TransportId,
            ErrorResponse,
            FieldError,
            // Country DTOs
            CountryDto,
            CountrySummary,
            CountrySearchResponse,
            CreateCountryRequest,
            UpdateCountryRequest,
            // Tour DTOs
            TourDto,
            TourSummary,
            CreateTourRequest,
            UpdateTourRequest,
            // Transport DTOs
            TransportDto,
            CreateTransportRequest,
            UpdateTransportRequest,
            // Health
            HealthResponse,
            ReadinessResponse,
            DependencyStatus,
        )
    ),
    tags(
        (name = "countries", description = "Country catalog endpoints"),
        (name = "tours", description = "Tour catalog endpoints"),
        (name = "transports", description = "Transport catalog endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
