//! # Relay Module
//!
//! The [`StreamRelay`] component: one outbound chat-completion request per
//! invocation, a status gate, and an incrementally decoded output stream.

pub mod stream;

pub use stream::{DeltaStream, StreamState};

use crate::{
    config::Config,
    core::http_client::HttpClientBuilder,
    error::RelayError,
    schemas::{ChatMessage, CompletionRequest, ModelDescriptor},
};
use reqwest::{header, Client};
use tracing::debug;
use uuid::Uuid;

/// # Stream Relay
///
/// Forwards a chat conversation to the configured completions endpoint and
/// adapts the server-sent-event response body into a plain byte stream of
/// text fragments.
///
/// Invocations are independent: no shared mutable state, no retries, no
/// caching. Cloning is cheap (the underlying HTTP client is a handle to a
/// shared connection pool).
#[derive(Clone)]
pub struct StreamRelay {
    /// HTTP client with connection pooling
    client: Client,
    /// Base URL of the completions service, without trailing slash
    base_url: String,
    /// Process-wide fallback bearer secret
    fallback_api_key: Option<String>,
}

impl StreamRelay {
    /// Create a new relay against `base_url`, with an optional fallback
    /// bearer secret used when an invocation carries no key of its own.
    pub fn new(client: Client, base_url: impl Into<String>, fallback_api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            fallback_api_key,
        }
    }

    /// Build a relay from application configuration, constructing the HTTP
    /// client through the shared factory.
    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        let client = HttpClientBuilder::from_config(config)
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        Ok(Self::new(
            client,
            config.upstream_url.clone(),
            config.api_key.clone(),
        ))
    }

    /// Forward `messages` to the upstream model and return the decoded
    /// output stream.
    ///
    /// A system message containing `system_prompt` is prepended to the
    /// conversation, and the envelope is sent with the fixed generation
    /// parameters ([`crate::schemas::MAX_COMPLETION_TOKENS`],
    /// [`crate::schemas::SAMPLING_TEMPERATURE`], streaming on).
    ///
    /// The response status is inspected before any streaming begins: a
    /// non-success status fails with [`RelayError::UpstreamStatus`] carrying
    /// the remote status text. On success the returned [`DeltaStream`]
    /// yields text fragments as they arrive; dropping it releases the
    /// upstream connection.
    pub async fn invoke(
        &self,
        model: &ModelDescriptor,
        system_prompt: &str,
        api_key: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<DeltaStream, RelayError> {
        let request_id = format!("relay-{}", &Uuid::new_v4().to_string()[..8]);
        let envelope = CompletionRequest::new(model, system_prompt, messages);
        let token = self.resolve_token(api_key);

        debug!(
            %request_id,
            model = %envelope.model,
            messages = envelope.messages.len(),
            "forwarding chat completion upstream"
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        debug!(%request_id, %status, "upstream responded");

        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| status.to_string());
            return Err(RelayError::UpstreamStatus(reason));
        }

        Ok(DeltaStream::new(response.bytes_stream()))
    }

    /// Resolution order: explicit non-empty key, else the configured
    /// fallback, else empty — authentication then fails at the remote
    /// service, never locally.
    fn resolve_token(&self, api_key: Option<&str>) -> String {
        api_key
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
            .or_else(|| self.fallback_api_key.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(fallback: Option<&str>) -> StreamRelay {
        let client = HttpClientBuilder::new().build().unwrap();
        StreamRelay::new(client, "http://localhost:8000/", fallback.map(str::to_owned))
    }

    #[test]
    fn explicit_key_wins_over_fallback() {
        let relay = relay(Some("sk-fallback"));
        assert_eq!(relay.resolve_token(Some("sk-explicit")), "sk-explicit");
    }

    #[test]
    fn empty_key_falls_back() {
        let relay = relay(Some("sk-fallback"));
        assert_eq!(relay.resolve_token(Some("")), "sk-fallback");
        assert_eq!(relay.resolve_token(None), "sk-fallback");
    }

    #[test]
    fn missing_keys_resolve_to_empty() {
        let relay = relay(None);
        assert_eq!(relay.resolve_token(None), "");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let relay = relay(None);
        assert_eq!(relay.base_url, "http://localhost:8000");
    }
}
