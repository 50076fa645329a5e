//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error becomes a JSON
//! body `{ "error": "..." }`; server-side failures are captured to Sentry
//! first.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use marchenet_core::InvoiceFailure;
use thiserror::Error;

use crate::paydunya::PaydunyaError;

/// Application-level error type for the payment proxy.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request body is unusable.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// PayDunya failed or refused the invoice.
    #[error("PayDunya error: {0}")]
    Paydunya(#[from] PaydunyaError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Paydunya(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Paydunya(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Provider messages are meant for the payer; internal details are not
        let error = match &self {
            Self::BadRequest(message) => message.clone(),
            Self::Paydunya(err) => err.public_message(),
            Self::Internal(_) => "Erreur interne du serveur".to_string(),
        };

        (status, Json(InvoiceFailure { error })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
