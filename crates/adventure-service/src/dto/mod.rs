//! Data Transfer Objects.
//!
//! Snapshot DTOs are the immutable, shallow-denormalized copies held in the
//! caches and returned to callers. Request DTOs carry validated input.

mod country_dto;
mod tour_dto;
mod transport_dto;

pub use country_dto::*;
pub use tour_dto::*;
pub use transport_dto::*;
