//! # Adventure Core
//!
//! Core types, entities, and error definitions for the Adventure travel catalog.
//! This crate provides the foundational abstractions shared by the repository,
//! service, and REST layers.

pub mod entities;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use entities::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
