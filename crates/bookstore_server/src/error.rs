//! HTTP error mapping.
//!
//! Storage and worker failures are logged here and surface as `500` with a
//! fixed body; validation and conflict outcomes are not logged as errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookstore_core::{RenderError, ServiceError};
use log::error;
use serde::Serialize;

/// Error body `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// Failure of an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    /// Request body did not deserialize.
    InvalidBody,
    /// Update carried no non-empty field.
    EmptyUpdate,
    /// Composite-equal book already exists.
    Duplicate,
    Storage(String),
    Worker(String),
    Render(RenderError),
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::EmptyUpdate => Self::EmptyUpdate,
            ServiceError::Repo(err) => Self::Storage(err.to_string()),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidBody => (StatusCode::BAD_REQUEST, "invalid request body"),
            Self::EmptyUpdate => (StatusCode::BAD_REQUEST, "no fields to update"),
            Self::Duplicate => (StatusCode::CONFLICT, "duplicate entry"),
            Self::Storage(details) => {
                error!(
                    "event=http_error module=server status=error error_code=storage_failure error={details}"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "db error")
            }
            Self::Worker(details) => {
                error!(
                    "event=http_error module=server status=error error_code=worker_failure error={details}"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "db error")
            }
            Self::Render(err) => {
                error!(
                    "event=http_error module=server status=error error_code=render_failure error={err}"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "render error")
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
