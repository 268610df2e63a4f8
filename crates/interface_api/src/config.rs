//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Every field has a default, so any subset may be supplied through `API_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Page size used when a list request does not give one
    pub default_page_size: u32,
    /// Upper bound for a requested page size
    pub max_page_size: u32,
    /// Scheme and authority for pagination links, e.g. `https://api.example.com`.
    /// When unset, links are built from the request's `Host` header.
    pub public_base_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/expenses".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            default_page_size: 10,
            max_page_size: 100,
            public_base_url: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
