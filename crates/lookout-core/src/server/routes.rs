//! Route table and shared state.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{analyze_screenshot, health, validate_reason};
use crate::relay::Relay;

/// State shared by all handlers. Immutable, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

/// Create the relay router.
pub fn create_router(relay: Relay, body_limit: usize) -> Router {
    Router::new()
        .route("/analyze_screenshot", post(analyze_screenshot))
        .route("/validate_reason", post(validate_reason))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { relay })
}
