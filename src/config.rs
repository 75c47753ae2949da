#[cfg(feature = "cli")]
use clap::Parser;
use url::Url;

/// # Stream Relay Configuration
///
/// Configuration from command-line arguments, environment variables, and an
/// optional `.env` file. The fallback API key follows a documented
/// resolution order: a per-request key wins when present and non-empty,
/// otherwise the key configured here (sourced from `OPENAI_API_KEY`) is
/// used, otherwise the request goes out unauthenticated and the upstream
/// rejects it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "stream-relay"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Relays chat conversations to an OpenAI-compatible completions API and streams the response back as plain text")
)]
#[cfg_attr(feature = "cli", command(version))]
pub struct Config {
    // =============================================================================
    // SERVER CONFIGURATION
    // =============================================================================
    /// Server port to listen on
    #[cfg_attr(feature = "cli", arg(short, long, env = "PORT", default_value = "8080"))]
    pub port: u16,

    /// Server host to bind to
    #[cfg_attr(feature = "cli", arg(long, env = "HOST", default_value = "0.0.0.0"))]
    pub host: String,

    // =============================================================================
    // UPSTREAM CONFIGURATION
    // =============================================================================
    /// Base URL of the completions service
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "OPENAI_API_HOST", default_value = "https://api.openai.com")
    )]
    pub upstream_url: String,

    /// Fallback bearer secret for requests that carry no key of their own
    #[cfg_attr(feature = "cli", arg(long, env = "OPENAI_API_KEY"))]
    pub api_key: Option<String>,

    /// Model id used when a request does not name one
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "RELAY_MODEL", default_value = "gpt-3.5-turbo")
    )]
    pub default_model: String,

    /// System prompt used when a request does not carry one
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            env = "RELAY_SYSTEM_PROMPT",
            default_value = "You are a helpful assistant."
        )
    )]
    pub system_prompt: String,

    // =============================================================================
    // HTTP CLIENT
    // =============================================================================
    /// Connect timeout in seconds
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "HTTP_CLIENT_CONNECT_TIMEOUT", default_value = "10")
    )]
    pub http_client_connect_timeout: u64,

    /// Maximum idle connections per host
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "HTTP_CLIENT_MAX_CONNECTIONS_PER_HOST", default_value = "10")
    )]
    pub http_client_max_connections_per_host: usize,

    // =============================================================================
    // LOGGING
    // =============================================================================
    /// Log filter (error, warn, info, debug, trace)
    #[cfg_attr(feature = "cli", arg(long, env = "RUST_LOG", default_value = "info"))]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments and environment
    /// variables, loading a `.env` file first when one exists, then set up
    /// logging and validate.
    #[cfg(feature = "cli")]
    pub fn parse_args() -> Self {
        // Load .env file if it exists (ignore errors if file doesn't exist)
        let _ = dotenv::dotenv();

        let config = Self::parse();

        config.setup_logging();

        if let Err(err) = config.validate() {
            eprintln!("Configuration validation failed: {}", err);
            std::process::exit(1);
        }

        config
    }

    /// Create a test configuration with minimal required fields.
    /// This is used for testing purposes only.
    pub fn for_test() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            upstream_url: "http://localhost:8000".to_string(),
            api_key: None,
            default_model: "test-model".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            http_client_connect_timeout: 10,
            http_client_max_connections_per_host: 10,
            log_level: "info".to_string(),
        }
    }

    /// Initialize the tracing subscriber with the configured filter.
    #[cfg(feature = "cli")]
    fn setup_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(&self.log_level)
            .with_target(false)
            .try_init();
    }

    /// Validate configuration values and provide helpful error messages.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0. Please specify a valid port number (1-65535).".to_string());
        }

        if self.host.is_empty() {
            return Err("Host cannot be empty. Please specify a valid host (e.g., '0.0.0.0', 'localhost', or an IP address).".to_string());
        }

        if self.upstream_url.is_empty() {
            return Err("Upstream URL cannot be empty. Please specify a valid completions service URL.".to_string());
        }

        match Url::parse(&self.upstream_url) {
            Ok(url) => {
                if !["http", "https"].contains(&url.scheme()) {
                    return Err(format!(
                        "Upstream URL scheme '{}' is not supported. Use http or https.",
                        url.scheme()
                    ));
                }
            }
            Err(err) => {
                return Err(format!(
                    "Upstream URL '{}' is not a valid URL: {}",
                    self.upstream_url, err
                ));
            }
        }

        Ok(())
    }
}
