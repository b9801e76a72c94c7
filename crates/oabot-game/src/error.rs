//! Error types for the OABot game backend.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the upstream HTTP clients.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Map a transport error, turning reqwest timeouts into [`ClientError::Timeout`].
    #[must_use]
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() { Self::Timeout(timeout) } else { Self::Http(err) }
    }
}

/// Errors from the decision log store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Filesystem failure (permission denied, disk full, ...)
    #[error("Log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row does not have the expected three fields
    #[error("Malformed log row {row}: expected 3 fields, found {found}")]
    Malformed {
        /// 1-based row number in the file
        row: usize,
        /// Number of fields actually present
        found: usize,
    },
}

/// Errors surfaced by the `/api` endpoint.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Missing or invalid query parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// JSONP callback name is not a plain identifier path
    #[error("Invalid callback name: {0}")]
    InvalidCallback(String),

    /// Action not handled by this endpoint
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Candidate source failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),

    /// Decision log failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidCallback(_) => StatusCode::BAD_REQUEST,
            Self::UnknownAction(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for log store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
