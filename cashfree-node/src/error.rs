use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Missing credential: {field} is required")]
    MissingCredential { field: &'static str },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to generate signature: {0}")]
    Signature(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("{operation} failed with status {status}: {body}")]
    Operation {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<validator::ValidationErrors> for ConnectorError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConnectorError::InvalidRequest(err.to_string())
    }
}

impl From<ConnectorError> for AppError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::MissingCredential { .. } | ConnectorError::Config(_) => {
                AppError::ConfigError(anyhow::anyhow!(err.to_string()))
            }
            ConnectorError::InvalidRequest(_) | ConnectorError::Signature(_) => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            ConnectorError::Authorization(_) => {
                AppError::Unauthorized(anyhow::anyhow!(err.to_string()))
            }
            ConnectorError::Operation { .. } | ConnectorError::Json(_) => {
                AppError::BadGateway(err.to_string())
            }
            ConnectorError::Http(e) => AppError::from(e),
        }
    }
}
