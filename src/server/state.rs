//! # Application State
//!
//! Shared state passed to all HTTP handlers: the configuration and the
//! relay built from it.

use crate::{config::Config, error::RelayError, relay::StreamRelay};

/// # Application State
///
/// Cloned into every handler; the relay's HTTP client is a pooled handle,
/// so clones stay cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Relay for forwarding conversations upstream
    pub relay: StreamRelay,
}

impl AppState {
    /// Create new application state from configuration
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let relay = StreamRelay::from_config(&config)?;
        Ok(Self { config, relay })
    }

    /// Get a reference to the config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the relay
    pub fn relay(&self) -> &StreamRelay {
        &self.relay
    }
}
