//! REST API controllers.

pub mod country_controller;
pub mod health_controller;
pub mod tour_controller;
pub mod transport_controller;

pub use health_controller::*;
