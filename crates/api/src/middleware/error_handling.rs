//! # Error Handling Middleware
//!
//! Maps [`BookingError`] to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.
//!
//! | error | status |
//! |---|---|
//! | `Validation` | 400 |
//! | `Authorization` | 403 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Transient` | 503 |
//! | `Internal` | 500 |
//!
//! Conflict and authorization bodies carry only the fixed customer-facing
//! message. Authorization failures in particular must read the same whether
//! or not the appointment exists.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use barbershop_core::errors::BookingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use barbershop_api::middleware::error_handling::AppError;
/// use barbershop_core::errors::BookingError;
///
/// async fn handler(name: String) -> Result<Json<String>, AppError> {
///     if name.trim().is_empty() {
///         return Err(AppError(BookingError::validation("Name is required")));
///     }
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client.
    pub fn message(&self) -> String {
        match &self.0 {
            BookingError::Conflict(message) | BookingError::Authorization(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "error": self.message(),
            "retryable": self.0.is_retryable(),
        }));

        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Storage and infrastructure reports are transient failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Transient(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
