//! HTTP middleware for the payment proxy.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. CORS (storefront origin only)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (recorded on the trace span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
