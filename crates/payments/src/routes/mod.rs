//! HTTP routes of the payment proxy.

mod invoice;

use axum::{Router, routing::post};

use crate::state::AppState;

/// `POST /payments/invoice`. Other methods get `405`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/invoice", post(invoice::create))
}
