//! Raw reqwest client for the WeatherXM Pro API.
//!
//! Issues a single GET per call and translates HTTP status codes and
//! transport failures into a typed error taxonomy. The JSON body is
//! returned un-validated — deserialization into typed shapes is the
//! caller's job.

use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;

// ── Constants ───────────────────────────────────────────────────────

/// Header carrying the WeatherXM Pro API key.
const API_KEY_HEADER: &str = "X-API-KEY";

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("weatherxm-mcp/", env!("CARGO_PKG_VERSION"));

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from WeatherXM API operations.
///
/// Display strings are user-facing: tool handlers flatten them into
/// `"Error: <message>"` lines.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid API key. Please check your WeatherXM API key.")]
    InvalidApiKey,

    #[error("Resource not found. Check the station ID or coordinates.")]
    NotFound,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("WeatherXM service is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("WeatherXM API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: unable to reach the WeatherXM API.")]
    NetworkUnavailable(#[source] reqwest::Error),

    #[error("Malformed response from the WeatherXM API: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Map a non-success HTTP status to its `ApiError`.
///
/// `detail` is the error message extracted from the response body, when
/// one was present; the `Upstream` variant prefers it over the bare
/// status text.
fn classify_status(status: StatusCode, detail: Option<String>) -> ApiError {
    match status.as_u16() {
        401 => ApiError::InvalidApiKey,
        404 => ApiError::NotFound,
        429 => ApiError::RateLimited,
        500 => ApiError::ServiceUnavailable,
        code => ApiError::Upstream {
            status: code,
            message: detail.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            }),
        },
    }
}

/// Pull `error.message` out of an upstream error body, if it parses.
fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .pointer("/error/message")?
        .as_str()
        .map(str::to_string)
}

// ── Client ──────────────────────────────────────────────────────────

/// A minimal WeatherXM Pro API client.
#[derive(Debug, Clone)]
pub struct WxmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WxmClient {
    /// Create a client from startup configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `base_url + path` with the given query parameters.
    ///
    /// Returns the parsed JSON body on success or an `ApiError` describing
    /// the failure. Exactly one request per call — no retries.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} params {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                log::error!("Request to {} failed: {}", url, e);
                ApiError::NetworkUnavailable(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("WeatherXM API returned {} for {}", status, url);
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, error_detail(&body)));
        }

        let body = response
            .text()
            .await
            .map_err(ApiError::NetworkUnavailable)?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
