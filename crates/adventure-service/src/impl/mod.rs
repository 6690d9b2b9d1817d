//! Catalog service implementations.
//!
//! Every mutation runs in the same order: pre-read the referenced entities
//! (`NotFound` aborts before any write), write to the store (a failure aborts
//! before any cache change), then hand the committed entity to the
//! [`ConsistencyPropagator`](crate::ConsistencyPropagator) and return its
//! fresh snapshot.

pub mod country_service_impl;
pub mod tour_service_impl;
pub mod transport_service_impl;

pub use country_service_impl::CountryServiceImpl;
pub use tour_service_impl::TourServiceImpl;
pub use transport_service_impl::TransportServiceImpl;
