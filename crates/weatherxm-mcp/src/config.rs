//! Startup configuration for the WeatherXM MCP server.

/// Environment variable holding the WeatherXM Pro API key.
pub const API_KEY_ENV: &str = "WEATHERXM_API_KEY";

/// Default base URL of the WeatherXM Pro API.
pub const DEFAULT_BASE_URL: &str = "https://pro.weatherxm.com/api/v1";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("WEATHERXM_API_KEY not set")]
    MissingApiKey,
}

/// Server configuration: the upstream API key and base URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    /// Load configuration from the `WEATHERXM_API_KEY` environment variable.
    ///
    /// `base_url` overrides the default upstream URL when given.
    pub fn from_env(base_url: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
        })
    }
}
