//! # Schemas Module
//!
//! Wire types for the relay: the caller-supplied conversation, the outbound
//! request envelope, and the inbound streaming chunk shapes.

use serde::{Deserialize, Serialize};

/// Maximum number of tokens requested from the upstream model.
pub const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Sampling temperature sent with every request.
pub const SAMPLING_TEMPERATURE: f32 = 1.0;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Identifies which remote model variant to invoke.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelDescriptor {
    pub id: String,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// # Completion Request
///
/// The outbound request envelope, constructed once per invocation: the
/// caller's messages with a synthesized leading system message, plus fixed
/// generation parameters and streaming enabled.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

impl CompletionRequest {
    /// Build the envelope for one invocation. The system prompt always leads
    /// the message list, ahead of whatever the caller supplied.
    pub fn new(model: &ModelDescriptor, system_prompt: &str, messages: &[ChatMessage]) -> Self {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(system_prompt));
        all.extend_from_slice(messages);

        Self {
            model: model.id.clone(),
            messages: all,
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: SAMPLING_TEMPERATURE,
            stream: true,
        }
    }
}

/// # Streaming Chunk Structures
///
/// Inbound data-event payloads are JSON of this shape; only the first
/// choice's incremental content is relevant to the relay. Unknown fields
/// (id, object, created, finish_reason, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct CompletionChunk {
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    /// Content delta; absent on role-only or finish chunks
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_prepends_system_message() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("bye"),
        ];
        let envelope =
            CompletionRequest::new(&ModelDescriptor::new("gpt-4"), "Be brief.", &messages);

        assert_eq!(envelope.model, "gpt-4");
        assert_eq!(envelope.messages.len(), 4);
        assert_eq!(envelope.messages[0], ChatMessage::system("Be brief."));
        assert_eq!(envelope.messages[1..], messages);
        assert_eq!(envelope.max_tokens, 1000);
        assert_eq!(envelope.temperature, 1.0);
        assert!(envelope.stream);
    }

    #[test]
    fn envelope_serializes_to_wire_format() {
        let envelope = CompletionRequest::new(
            &ModelDescriptor::new("gpt-3.5-turbo"),
            "Be brief.",
            &[ChatMessage::user("hi")],
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 1000,
                "temperature": 1.0,
                "stream": true
            })
        );
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn chunk_parses_with_unknown_fields() {
        let payload = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion.chunk",
            "created": 1694268190,
            "model": "gpt-4",
            "choices": [{"index": 0, "delta": {"content": "Hel"}, "finish_reason": null}]
        }"#;
        let chunk: CompletionChunk = serde_json::from_str(payload).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
    }
}
