//! Transport DTOs.

use adventure_core::rules::not_blank;
use adventure_core::TransportId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Full transport snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransportDto {
    pub id: TransportId,
    pub name: String,
    pub capacity: i32,
    pub cost: f64,
}

/// Request to create a transport.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransportRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,

    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub cost: f64,
}

/// Request to update a transport.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTransportRequest {
    #[validate(
        length(max = 128, message = "Name cannot exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,

    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub cost: f64,
}
