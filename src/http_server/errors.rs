//! # HTTP API Errors
//!
//! Maps repository and auth failures onto status codes and a JSON body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::observability::Logger;
use crate::repository::RepositoryError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or query could not be parsed
    #[error("{0}")]
    BadRequest(String),

    /// Authentication error
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Repository outcome or store fault
    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Auth(e) => e.status_code(),
            ApiError::Repository(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Couldn't decode parameters: {}", rejection.body_text()))
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            let message = self.to_string();
            Logger::error(
                "REQUEST_FAILED",
                &[("error", message.as_str()), ("status", status.as_str())],
            );
        }

        // Internal details stay in the log
        let error = if status.is_server_error() {
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
