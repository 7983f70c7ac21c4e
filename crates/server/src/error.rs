//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Clients only ever see a generic message; the underlying error is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use order_locator_core::LocationMismatch;

use crate::db::StorageError;
use crate::geocoding::GeocodeError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Geocoding an order's address failed.
    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Orders and locations could not be paired.
    #[error("Pairing error: {0}")]
    Pairing(#[from] LocationMismatch),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
