/*
[INPUT]:  Error sources (HTTP transport, Supabase API responses, serialization, URLs)
[OUTPUT]: Structured error type with retry and client-error hints
[POS]:    Error handling layer - unified error type for the whole crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Supabase adapter
#[derive(Error, Debug)]
pub enum AdapterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdapterError {
    /// Check if the error is worth retrying by the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            AdapterError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            AdapterError::Api { status, .. } => *status == 429 || *status >= 500,
            AdapterError::InvalidResponse(_) => true,
            _ => false,
        }
    }

    /// Check if the server rejected the request itself (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, AdapterError::Api { status, .. } if (400..500).contains(status))
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        AdapterError::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
