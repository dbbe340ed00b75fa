use thiserror::Error;

/// Errors that can occur when talking to the Ollama API
#[derive(Error, Debug)]
pub enum OracleApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested model is not pulled on the server
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Server encountered an internal error
    #[error("Oracle server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// Judge reply did not contain a parseable verdict
    #[error("Malformed verdict: {0}")]
    MalformedVerdict(String),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OracleApiError {
    /// Returns true if this error is transient and should be retried
    ///
    /// Transient errors include rate limiting, server errors (5xx),
    /// timeouts, and network failures. A missing model or a malformed
    /// verdict will not get better by retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded | Self::ServerError(_) | Self::Timeout => true,
            Self::NetworkError(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }

    /// Create error from HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            404 => Self::ModelNotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError(body),
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}
