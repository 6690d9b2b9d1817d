//! Result type aliases for the Adventure catalog.

use crate::AdventureError;

/// A specialized `Result` type for Adventure operations.
pub type AdventureResult<T> = Result<T, AdventureError>;
