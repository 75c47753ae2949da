#[cfg(feature = "server")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(feature = "server")]
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the relay, either before the stream exists
/// (`UpstreamStatus`, `Transport`, `Config`) or through it
/// (`StreamDecode`, `Transport`).
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream service answered with a non-success status. Carries the
    /// remote status text.
    #[error("upstream returned an error: {0}")]
    UpstreamStatus(String),

    /// An inbound event payload was not valid JSON, lacked the expected
    /// content field, or was not valid UTF-8. Terminal for the stream.
    #[error("stream decode error: {0}")]
    StreamDecode(String),

    /// Connection-level failure talking to the upstream service.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid configuration detected while constructing the relay.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "server")]
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            RelayError::UpstreamStatus(_) => (StatusCode::BAD_GATEWAY, "upstream_status_error"),
            RelayError::StreamDecode(_) => (StatusCode::BAD_GATEWAY, "stream_decode_error"),
            RelayError::Transport(_) => (StatusCode::BAD_GATEWAY, "transport_error"),
            RelayError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            RelayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": kind,
                "code": null
            }
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for RelayError {
    /// Classify reqwest failures the way the rest of the crate reports them:
    /// timeouts and connect failures become `Transport` with a stable message,
    /// anything else carries the client's own description.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Transport("request timeout - upstream did not respond in time".to_string())
        } else if err.is_connect() {
            RelayError::Transport("connection failed - unable to reach upstream".to_string())
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::StreamDecode(format!("malformed event payload: {err}"))
    }
}
