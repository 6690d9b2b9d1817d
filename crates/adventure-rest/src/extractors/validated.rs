//! Validated JSON extractor for automatic request validation.
//!
//! This module provides a `ValidatedJson<T>` extractor that deserializes JSON
//! and validates it using the `validator` crate. Validation errors are returned
//! as 422 Unprocessable Entity with field-level error details.

use crate::responses::ApiResponse;
use adventure_core::{ErrorResponse, FieldError};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON extractor that automatically validates the deserialized value.
///
/// Returns 422 Unprocessable Entity with field-level errors if validation fails.
///
/// # Example
///
/// ```ignore
/// use adventure_rest::extractors::ValidatedJson;
/// use adventure_service::CreateTransportRequest;
///
/// async fn create_transport(ValidatedJson(request): ValidatedJson<CreateTransportRequest>) {
///     // capacity >= 1 and cost >= 0 here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Rejection type for validated JSON extraction.
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let error_response = ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {rejection}"),
                    details: None,
                    trace_id: None,
                };
                (rejection.status(), Json(ApiResponse::error(error_response))).into_response()
            }
            Self::ValidationError(errors) => {
                let field_errors = convert_validation_errors(&errors);
                let error_response = ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: Some(field_errors),
                    trace_id: None,
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::error(error_response)),
                )
                    .into_response()
            }
        }
    }
}

/// Flattens validator errors into field errors with dotted paths
/// (`transport.cost`, `countries[2].name`).
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors = Vec::new();
    collect_field_errors(errors, "", &mut field_errors);
    field_errors
}

fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in &errors.0 {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| FieldError {
                    field: path.clone(),
                    message: failure
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Invalid value for '{path}'"), ToString::to_string),
                    code: failure.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, item) in items {
                    collect_field_errors(item, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;
        Ok(Self(value))
    }
}
