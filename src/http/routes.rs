use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service identity
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        // Meeting-end webhook
        .route("/webhook", post(handlers::receive_webhook))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
