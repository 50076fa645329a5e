//! MarchéNet payment proxy.
//!
//! Holds the PayDunya credentials on the server side and exposes a single
//! endpoint to the storefront:
//!
//! - `POST /payments/invoice` - `{ total_amount, description, pack_name,
//!   vendor_data, user_id }` to `200 { paymentUrl }`, `400 { error }` for an
//!   unusable body, `500 { error }` when PayDunya fails
//! - `GET /health` - liveness probe

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod paydunya;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use config::PaymentsConfig;
pub use state::AppState;

/// Build the proxy router.
///
/// Sentry layers are added by the binary so tests can run without a hub.
pub fn app(state: AppState) -> Router {
    let cors = HeaderValue::from_str(&state.config().public_url.origin().ascii_serialization())
        .map_or_else(
            |_| CorsLayer::new(),
            |origin| {
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::POST])
                    .allow_headers([header::CONTENT_TYPE])
            },
        );

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
