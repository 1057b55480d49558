//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. CORS (`tower-http`)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the span, echoed in the response)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
