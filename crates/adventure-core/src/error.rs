//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of the Adventure catalog.
///
/// Read paths report a missing entity as `Ok(None)`; `NotFound` is reserved for
/// mutations that reference an entity which does not exist.
#[derive(Error, Debug)]
pub enum AdventureError {
    // ============ Caller Errors ============
    /// A referenced country, tour, or transport does not exist.
    #[error("{resource_type} {id} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Request data violates a domain constraint.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The store rejected a write as a duplicate.
    #[error("Conflicting write: {0}")]
    Conflict(String),

    // ============ Store Errors ============
    /// The durable store failed a read or write.
    #[error("Store failure: {0}")]
    Database(String),

    // ============ Cache Errors ============
    /// Invalid cache setup, such as a zero capacity.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The store write succeeded but refreshing dependent cache entries did not.
    #[error("Cache propagation failed after {operation}: {message}")]
    Propagation {
        operation: &'static str,
        message: String,
    },

    // ============ Process Errors ============
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdventureError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Propagation { .. }
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Propagation { .. } => "PROPAGATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// A missing referenced entity.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a propagation error for a store operation that already committed.
    #[must_use]
    pub fn propagation<T: ToString>(operation: &'static str, cause: T) -> Self {
        Self::Propagation {
            operation,
            message: cause.to_string(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true when the error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for failures a caller may retry without changing the request.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Propagation { .. })
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AdventureError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "Row",
                id: "?".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // MySQL duplicate key
                if db_err.code().is_some_and(|code| code == "1062" || code == "23000") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::migrate::MigrateError> for AdventureError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Database(format!("Migration failed: {err}"))
    }
}

impl From<serde_json::Error> for AdventureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("snapshot serialization failed: {err}"))
    }
}

/// Wire form of an [`AdventureError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Stable code such as `NOT_FOUND` or `PROPAGATION_ERROR`.
    pub code: String,
    pub message: String,
    /// Per-field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Value of the request's `x-request-id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// One failed field constraint, e.g. `visa_cost` / `range`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Validator rule name.
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from an `AdventureError`.
    #[must_use]
    pub fn from_error(error: &AdventureError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&AdventureError> for ErrorResponse {
    fn from(error: &AdventureError) -> Self {
        Self::from_error(error)
    }
}
