//! Defines the HTTP surface of the lister.
//!
//! ## Structure
//! - `GET /list`    — one page of objects (supports limit, page, pageToken)
//! - `GET /healthz` — liveness
//! - `GET /readyz`  — readiness (backend credentials)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        listing_handlers::list_objects,
    },
    services::listing_service::ListingService,
};
use axum::{Router, extract::Request, routing::get};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Build and return the router.
///
/// The router carries shared state (`ListingService`) to all handlers; every
/// request runs inside a span tagged with a fresh request id.
pub fn routes() -> Router<ListingService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/list", get(list_objects))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %Uuid::new_v4(),
            )
        }))
}
