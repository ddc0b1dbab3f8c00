//! Error types for the scholar-relay server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

use serde::Serialize;

/// Stable classification of a failed upstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input failed validation, or upstream rejected the request shape.
    InvalidRequest,
    /// Upstream has no such paper or author.
    NotFound,
    /// Upstream throttled the request.
    RateLimited,
    /// Network failure, timeout or 5xx.
    UpstreamUnavailable,
    /// Success status but the body does not have the expected shape.
    MalformedResponse,
}

impl ErrorKind {
    /// Snake-case name used in failure descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Local validation failed or upstream answered with a 4xx other than 404/429.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request
        message: String,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Rate limited by Semantic Scholar API (429 response)
    #[error("Rate limited by upstream{}", .retry_after.map(|d| format!(", retry after {d:?}")).unwrap_or_default())]
    RateLimited {
        /// Wait suggested by the `Retry-After` header, if any
        retry_after: Option<Duration>,
    },

    /// Transport failure, timeout, or 5xx response
    #[error("Upstream unavailable{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    UpstreamUnavailable {
        /// HTTP status code, absent for transport failures
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Body could not be parsed or lacks the fields the operation needs
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What was missing or unparseable
        message: String,
    },
}

impl ClientError {
    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a rate limited error with an optional retry-after in seconds.
    #[must_use]
    pub fn rate_limited(seconds: Option<u64>) -> Self {
        Self::RateLimited { retry_after: seconds.map(Duration::from_secs) }
    }

    /// Create an upstream error for a 5xx (or otherwise unusable) status.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable { status: Some(status), message: message.into() }
    }

    /// Create an upstream error for a transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable { status: None, message: message.into() }
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Returns true if re-invoking later may succeed.
    ///
    /// Nothing in this crate retries; callers decide.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::UpstreamUnavailable { .. })
    }

    /// Get the retry-after duration if upstream supplied one.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        Self::UpstreamUnavailable { status: err.status().map(|s| s.as_u16()), message }
    }
}

impl From<reqwest_middleware::Error> for ClientError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::from(e),
            reqwest_middleware::Error::Middleware(e) => Self::transport(e.to_string()),
        }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Tool arguments did not match the input schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    /// Internal tool logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classification of the underlying client failure, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Client(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::RateLimited { retry_after: Some(wait) }) => {
                format!(
                    "Rate limited by Semantic Scholar API. Please wait {:?} before retrying.",
                    wait
                )
            }
            Self::Client(ClientError::RateLimited { retry_after: None }) => {
                "Rate limited by Semantic Scholar API. Please try again later.".to_string()
            }
            Self::Client(ClientError::NotFound { resource }) => {
                format!("No result for {resource}. Please check the ID is correct.")
            }
            Self::Client(ClientError::InvalidRequest { message }) => {
                format!("Invalid request: {message}")
            }
            Self::Client(ClientError::UpstreamUnavailable { .. }) => {
                format!("Semantic Scholar is temporarily unavailable ({self}). Try again later.")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
