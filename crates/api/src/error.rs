//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, StoreError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Request conflicted with the resource's current state.
    Conflict(String),
    /// Missing or wrong content type on a write request.
    UnsupportedMediaType(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation(_) | DomainError::InvalidStatusFilter(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DomainError::OrderNotFound(_) | DomainError::ItemNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            DomainError::AlreadyCancelled(_) | DomainError::CancelConflict { .. } => {
                ApiError::Conflict(err.to_string())
            }
            DomainError::Store(StoreError::MissingId) => ApiError::BadRequest(err.to_string()),
            DomainError::Store(StoreError::Database(_)) => ApiError::Internal(err.to_string()),
        }
    }
}

// The content-type check happens in the extractor, before any body parsing.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType("Content-Type must be application/json".to_string())
            }
            _ => ApiError::BadRequest("body of request contained bad or no data".to_string()),
        }
    }
}
