//! Outbound HTTP client construction shared by upstream API clients.

use crate::config::HttpConfig;
use crate::error::AppError;
use reqwest::Client;
use uuid::Uuid;

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build a `reqwest::Client` with the configured timeouts.
///
/// The request timeout is the only bound on a hung upstream call; callers
/// should share one client per upstream rather than building one per request.
pub fn build_client(config: &HttpConfig, user_agent: &str) -> Result<Client, AppError> {
    Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

/// Generate a fresh correlation ID for an outbound request.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}
