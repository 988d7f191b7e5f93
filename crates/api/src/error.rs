//! API error rendering
//!
//! Every failed request renders the same error envelope:
//! `{ id, code, description, errorDetails? }` where `id` is the request
//! correlation id. Business errors carry their own code and HTTP status;
//! request-validation failures render as 400 with per-field details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contabank_core::BusinessError;
use serde::Serialize;
use uuid::Uuid;

const VALIDATION_ERROR_CODE: &str = "request-validation-error";
const VALIDATION_ERROR_DESCRIPTION: &str = "Invalid request data";

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub attribute: String,
    pub message: String,
}

impl FieldError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// An error response bound to one request.
#[derive(Debug)]
pub struct ApiError {
    request_id: Uuid,
    kind: ApiErrorKind,
}

#[derive(Debug)]
enum ApiErrorKind {
    Business(BusinessError),
    Validation(Vec<FieldError>),
}

impl ApiError {
    pub fn business(request_id: Uuid, error: BusinessError) -> Self {
        Self {
            request_id,
            kind: ApiErrorKind::Business(error),
        }
    }

    pub fn validation(request_id: Uuid, details: Vec<FieldError>) -> Self {
        Self {
            request_id,
            kind: ApiErrorKind::Validation(details),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    id: Uuid,
    code: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.kind {
            ApiErrorKind::Business(error) => {
                tracing::warn!(
                    event = "request.business_error",
                    request_id = %self.request_id,
                    code = %error.code(),
                );
                (
                    StatusCode::from_u16(error.http_status())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    ErrorBody {
                        id: self.request_id,
                        code: error.code(),
                        description: error.to_string(),
                        error_details: None,
                    },
                )
            }
            ApiErrorKind::Validation(details) => {
                tracing::warn!(
                    event = "request.validation_error",
                    request_id = %self.request_id,
                    rejected_fields = details.len(),
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        id: self.request_id,
                        code: VALIDATION_ERROR_CODE.to_string(),
                        description: VALIDATION_ERROR_DESCRIPTION.to_string(),
                        error_details: Some(details),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_status() {
        let error = ApiError::business(Uuid::new_v4(), BusinessError::AccountNotFound);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let error = ApiError::validation(
            Uuid::new_v4(),
            vec![FieldError::new("name", "name must have 5 to 100 characters")],
        );
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
