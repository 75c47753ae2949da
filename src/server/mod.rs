//! # Server Module
//!
//! HTTP surface for the relay: a single streaming chat endpoint plus a
//! health probe, with the tracing and CORS middleware stack.

pub mod handlers;
pub mod state;

// Re-export commonly used server types
pub use handlers::chat_stream;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{self, TraceLayer},
};
use tracing::Level;

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Main endpoint: relay a conversation and stream the reply back
        .route("/v1/chat/stream", post(handlers::chat_stream))
        // Health check endpoint for production monitoring
        .route("/health", get(handlers::health_check))
        // Add middleware stack
        .layer(
            ServiceBuilder::new()
                // Tracing middleware - logs HTTP requests and responses
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
                )
                // CORS middleware - allows cross-origin requests
                .layer(CorsLayer::permissive()),
        )
        // Inject application state into all handlers
        .with_state(state)
}
