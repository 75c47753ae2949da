//! # Stream Relay Server
//!
//! Binds the relay behind its HTTP endpoint.

use stream_relay::{create_router, AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from CLI args, environment, and .env file
    let config = Config::parse_args();

    let state = AppState::new(config.clone())?;
    let app = create_router(state);

    // Log upstream URL safely (host only, no credentials or paths)
    let safe_upstream = match url::Url::parse(&config.upstream_url) {
        Ok(url) => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("unknown")),
        Err(_) => "invalid-url".to_string(),
    };

    info!("stream-relay listening on http://{}:{}", config.host, config.port);
    info!("Upstream: {}", safe_upstream);
    info!("Default model: {}", config.default_model);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
