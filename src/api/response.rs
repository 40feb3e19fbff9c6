//! Response types for the HR API.
//!
//! This module defines the error body returned by every endpoint and the
//! mapping from [`HrError`] to HTTP status codes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::HrError;
use crate::models::User;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiErrorResponse>;

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<HrError> for ApiErrorResponse {
    fn from(error: HrError) -> Self {
        let (status, error) = match error {
            HrError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            HrError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            HrError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid field '{}': {}", field, message),
                    field,
                ),
            ),
            HrError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", format!("{} {} not found", entity, id)),
            ),
            HrError::Conflict { message } => {
                (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
            }
            HrError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("INVALID_CREDENTIALS", "Invalid username or password"),
            ),
            HrError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", message),
            ),
            HrError::Forbidden { message } => {
                (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            HrError::Calculation { message } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Payroll calculation failed",
                    message,
                ),
            ),
            HrError::PasswordHash { message } => {
                error!(error = %message, "Password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "Internal server error"),
                )
            }
            HrError::Database(err) => {
                error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATABASE_ERROR", "Internal server error"),
                )
            }
        };
        Self { status, error }
    }
}

/// Maps a JSON body rejection to a 400 response.
///
/// A body missing a required field is a validation error; anything else
/// unparseable is malformed JSON.
pub fn json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Body of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: Uuid,
    /// When the token stops working.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: User,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (HrError::validation("rating", "out of range"), StatusCode::BAD_REQUEST),
            (HrError::not_found("employee", 9), StatusCode::NOT_FOUND),
            (
                HrError::Conflict {
                    message: "taken".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (HrError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                HrError::Unauthorized {
                    message: "no token".to_string(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (HrError::forbidden("admins only"), StatusCode::FORBIDDEN),
            (
                HrError::Calculation {
                    message: "negative".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                HrError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }

    #[test]
    fn test_database_error_hides_detail() {
        let response: ApiErrorResponse = HrError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(response.error.code, "DATABASE_ERROR");
        assert!(!response.error.message.contains("pool"));
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let response: ApiErrorResponse = HrError::not_found("payroll", 12).into();
        assert_eq!(response.error.message, "payroll 12 not found");
    }
}
