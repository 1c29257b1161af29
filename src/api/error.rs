// src/api/error.rs
// HTTP error responses: every failure renders as {"detail": "..."}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::error::{ErrorKind, RelayError};

/// Prefix on every 500 detail message
pub const SERVER_ERROR_PREFIX: &str = "Server error:";

#[derive(Debug)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
    pub kind: ErrorKind,
}

impl ApiError {
    /// Create a new bad request error
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            status_code: StatusCode::BAD_REQUEST,
            kind: ErrorKind::Validation,
        }
    }

    /// Create a new internal server error; the detail gets the server-error prefix
    pub fn internal(kind: ErrorKind, message: impl fmt::Display) -> Self {
        Self {
            detail: format!("{} {}", SERVER_ERROR_PREFIX, message),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            kind,
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ApiError::bad_request(err.to_string()),
            kind => ApiError::internal(kind, err),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
