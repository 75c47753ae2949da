//! # Stream Relay
//!
//! A small Rust library that forwards a chat conversation to an
//! OpenAI-compatible completions API and re-emits the model's incrementally
//! streamed response as a plain byte stream, suitable for piping directly
//! into an HTTP response body.
//!
//! ## Features
//!
//! - **One-shot relay**: a single outbound request per invocation, no retries,
//!   no shared state between invocations
//! - **Incremental decoding**: server-sent events are decoded as chunks
//!   arrive, including UTF-8 codepoints split across network reads
//! - **Bounded memory**: the response body is never buffered in full
//! - **Prompt cancellation**: dropping the output stream releases the
//!   upstream connection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stream_relay::{ChatMessage, HttpClientBuilder, ModelDescriptor, StreamRelay};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClientBuilder::new().build()?;
//!     let relay = StreamRelay::new(client, "https://api.openai.com", None);
//!
//!     let mut deltas = relay
//!         .invoke(
//!             &ModelDescriptor::new("gpt-4"),
//!             "You are a helpful assistant.",
//!             Some("sk-my-key"),
//!             &[ChatMessage::user("Say hello")],
//!         )
//!         .await?;
//!
//!     while let Some(fragment) = deltas.next().await {
//!         print!("{}", String::from_utf8_lossy(&fragment?));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`relay`] - the [`StreamRelay`] component and its output stream
//! - [`schemas`] - request/response data structures
//! - [`config`] - configuration with CLI and environment support
//! - [`error`] - error types and conversions
//! - [`core`] - HTTP client factory
//! - [`server`] - optional HTTP endpoint piping relay output to callers

// Core infrastructure
pub mod config;
pub mod core;
pub mod error;
pub mod schemas;

// Domain modules
pub mod relay;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types for convenience
pub use config::Config;
pub use crate::core::http_client::{HttpClientBuilder, HttpClientConfig};
pub use error::RelayError;
pub use relay::{DeltaStream, StreamRelay, StreamState};
pub use schemas::{ChatMessage, CompletionRequest, ModelDescriptor, Role};

// Server re-exports (feature-gated)
#[cfg(feature = "server")]
pub use server::{create_router, AppState};

/// The result type used throughout the library
pub type Result<T> = std::result::Result<T, RelayError>;
