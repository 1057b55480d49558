//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Greeting
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (document store ping)
//! GET  /test                   - Database diagnostics
//!
//! # Menu
//! GET  /api/menu?category=X    - List menu items
//! POST /api/menu               - Add a menu item
//!
//! # Contact
//! POST /api/contact            - Submit the contact form
//! ```

pub mod contact;
pub mod diagnostics;
pub mod home;
pub mod menu;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::list).post(menu::create))
        .route("/contact", post(contact::submit))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::root))
        .route("/health", get(diagnostics::health))
        .route("/health/ready", get(diagnostics::readiness))
        .route("/test", get(diagnostics::test_database))
        .nest("/api", api_routes())
        .fallback(home::not_found)
}

/// Build the application with its middleware stack.
///
/// Layers, outermost first: CORS, request tracing, request ID. Sentry layers
/// are added by the binary.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_allowed_origins.as_deref());

    routes()
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(cors)
        .with_state(state)
}

/// CORS policy: any method and header, from the listed origins or any origin.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
        None => layer.allow_origin(Any),
    }
}
