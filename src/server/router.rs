//! Router builder utilities for request routes

use crate::lifecycle::handlers::{
    AppState, create_request, delete_request, health, list_requests, update_request_status,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the request routes
///
/// - POST /api/requests - Create a request
/// - GET /api/requests/{key} - List a user's requests (`key` is the userID)
/// - PATCH /api/requests/{key} - Update a request's status (`key` is the request id)
/// - DELETE /api/requests/{key} - Delete a request (`key` is the request id)
/// - GET /health - Liveness probe
pub fn build_request_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/requests", post(create_request))
        .route(
            "/api/requests/{key}",
            get(list_requests)
                .patch(update_request_status)
                .delete(delete_request),
        )
        .route("/health", get(health))
        .with_state(state)
}

/// Wrap a router with request tracing and CORS
pub fn with_http_layers(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
