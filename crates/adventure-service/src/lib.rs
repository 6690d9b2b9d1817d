//! # Adventure Service
//!
//! Catalog services and the snapshot cache core.
//!
//! ```text
//! read  ─▶ ReadThrough ─▶ CacheRegistry (country | tour | transport LRU)
//!                └─ miss ─▶ SnapshotAssembler ─▶ repositories
//! write ─▶ repositories ─▶ ConsistencyPropagator ─▶ CacheRegistry
//! ```

pub mod cache;
pub mod catalog;
pub mod country_service;
pub mod dto;
pub mod r#impl;
pub mod logging;
pub mod mappers;
pub mod propagator;
pub mod read_through;
pub mod snapshot;
pub mod tour_service;
pub mod transport_service;

pub use cache::*;
pub use catalog::CatalogServices;
pub use country_service::*;
pub use dto::*;
pub use propagator::ConsistencyPropagator;
pub use r#impl::*;
pub use read_through::ReadThrough;
pub use snapshot::{CatalogStores, SnapshotAssembler};
pub use tour_service::*;
pub use transport_service::*;
