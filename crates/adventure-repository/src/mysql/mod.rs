//! MySQL repository implementations.

mod country_repository;
mod links;
mod tour_repository;
mod transport_repository;

pub use country_repository::*;
pub use tour_repository::*;
pub use transport_repository::*;
