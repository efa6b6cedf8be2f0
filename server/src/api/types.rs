//! Shared API types
//!
//! Error responses and pagination limits used across all endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationError;

use crate::domain::error::DomainError;

/// Maximum items per page for list endpoints
pub const MAX_PAGE_LIMIT: u32 = 500;
/// Default items per page
pub const DEFAULT_LIMIT: u32 = 50;

pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Validator function for limit parameter
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::new("limit_range")
            .with_message(format!("Limit must be between 1 and {}", MAX_PAGE_LIMIT).into()));
    }
    Ok(())
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(message) => Self::bad_request("validation_error", message),
            DomainError::InvalidCredentials => {
                Self::unauthorized("invalid_credentials", "Invalid credentials")
            }
            e @ DomainError::NotFound { .. } => Self::not_found("resource_not_found", e.to_string()),
            e @ DomainError::DoesNotExist { .. } => {
                Self::not_found("resource_does_not_exist", e.to_string())
            }
            DomainError::Conflict(message) => Self::conflict("resource_already_exist", message),
            DomainError::Filter(e) => Self::bad_request("invalid_filter", e.to_string()),
            DomainError::Credential(e) => {
                tracing::error!(error = %e, "Credential error");
                Self::internal("Credential operation failed")
            }
            DomainError::Data(e) => {
                tracing::error!(error = %e, code = e.code(), transient = e.is_transient(), "Data error");
                Self::internal("Database operation failed")
            }
            DomainError::Asset(e) => {
                tracing::error!(error = %e, "Asset error");
                Self::internal("File operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
