//! # Server Handlers
//!
//! HTTP route handlers. The chat handler pipes the relay's output stream
//! directly into the response body, so bytes reach the caller as they
//! arrive from upstream and a caller disconnect tears the upstream
//! connection down with it.

use super::AppState;
use crate::{
    error::RelayError,
    schemas::{ChatMessage, ModelDescriptor},
};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json as JsonResponse, Response},
    Json,
};
use serde::Deserialize;

/// Request body for the streaming chat endpoint. Model and prompt fall back
/// to the configured defaults; `key` overrides the configured secret for
/// this invocation only.
#[derive(Debug, Deserialize)]
pub struct ChatStreamRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub key: Option<String>,
}

/// Streaming chat handler
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(req): Json<ChatStreamRequest>,
) -> Result<Response, RelayError> {
    let model = ModelDescriptor::new(
        req.model
            .unwrap_or_else(|| state.config().default_model.clone()),
    );
    let prompt = req
        .prompt
        .unwrap_or_else(|| state.config().system_prompt.clone());

    let deltas = state
        .relay()
        .invoke(&model, &prompt, req.key.as_deref(), &req.messages)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(deltas))
        .map_err(|e| RelayError::Internal(format!("failed to build response: {e}")))
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    let health_status = serde_json::json!({
        "status": "healthy",
        "service": "stream-relay",
        "version": env!("CARGO_PKG_VERSION")
    });

    (StatusCode::OK, JsonResponse(health_status))
}
