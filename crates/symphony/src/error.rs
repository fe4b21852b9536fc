//! Error types for the Symphony SDK.

use thiserror::Error;

/// Errors that can occur when using the Symphony SDK.
#[derive(Error, Debug)]
pub enum SymError {
    /// An error returned by the pod or agent API.
    #[error("API error ({status}, {code}): {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The error code from the response body, or the status text.
        code: String,
        /// The error message from the response body.
        message: String,
    },

    /// An HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication against the session or key manager endpoint failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The bot configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A local I/O error (certificate or config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload decoding failed (e.g. base64 attachment content).
    #[error("decode error: {0}")]
    Decode(String),

    /// The response was invalid or malformed.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The worker or service has been shut down.
    #[error("worker is not running")]
    NotRunning,
}

impl SymError {
    /// Create a new API error.
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => (500..=599).contains(status),
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this is a rate-limit error (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }

    /// Check if this is a not-found error (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if this is an authentication/authorization rejection (HTTP 401 or 403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: 401 | 403,
                ..
            }
        )
    }

    /// Get the HTTP status code, if this is an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the API error code, if this is an API error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for SymError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for Symphony operations.
pub type Result<T> = std::result::Result<T, SymError>;
