//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (permissive; the storefront is served from another origin)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Body limit (5 MiB, sized for base64 product images)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
