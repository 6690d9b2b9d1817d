//! # Adventure Server Library
//!
//! Dependency injection, application assembly, and startup utilities for
//! the Adventure catalog server.

pub mod app;
pub mod di;
pub mod startup;

pub use app::{App, AppBuilder};
