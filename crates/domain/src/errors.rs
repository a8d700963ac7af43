//! Error types used throughout the client
//!
//! [`ApiError`] is the single error surface of every public operation. Only
//! transport and status failures are ever retried; the transport layer
//! surfaces the last one after the attempt budget runs out.

use std::time::Duration;

use thiserror::Error;

/// A non-2xx response from the remote API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{result}: {message}, HTTP status code: {status_code}")]
pub struct StatusError {
    /// HTTP status code
    pub status_code: u16,
    /// Human readable message extracted from the body
    pub message: String,
    /// Short classification, e.g. `NOT_FOUND` or `Not Found`
    pub result: String,
    /// Server supplied `Retry-After` delay
    pub retry_after: Option<Duration>,
}

impl StatusError {
    pub fn new(status_code: u16, message: impl Into<String>, result: impl Into<String>) -> Self {
        Self { status_code, message: message.into(), result: result.into(), retry_after: None }
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// 404: the resource no longer exists remotely
    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403)
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// 404
    NotFound,
    /// Client errors (4xx except auth, 404 and 429)
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Malformed or unrecognized payloads - never retried
    Decode,
    /// Invalid caller input - never retried
    Config,
    /// Caller cancelled
    Cancelled,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained (connect failure, timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Malformed response body or a shape that cannot be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The discriminators name no known feed configuration
    #[error(
        "Unrecognized feed configuration: source type `{source_type}`, log type `{log_type}`"
    )]
    UnrecognizedConfiguration { source_type: String, log_type: String },

    /// Invalid caller input, detected before any network activity
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Status code of a [`ApiError::Status`] error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status.status_code),
            _ => None,
        }
    }

    /// True when the remote resource is gone (HTTP 404)
    ///
    /// Delete and read paths treat this as "already deleted".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status(status) if status.is_not_found())
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Transport(_) => ApiErrorCategory::Network,
            Self::Status(status) => match status.status_code {
                401 | 403 => ApiErrorCategory::Authentication,
                404 => ApiErrorCategory::NotFound,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Decode(_) | Self::UnrecognizedConfiguration { .. } => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Cancelled => ApiErrorCategory::Cancelled,
        }
    }

    /// Transport failures, 429 and 5xx
    pub fn is_transient(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Network | ApiErrorCategory::RateLimit | ApiErrorCategory::Server
        )
    }

    /// Whether the transport's retry loop may try again after this error
    ///
    /// Decode, configuration and cancellation errors never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status(_))
    }

    /// Delay the server asked for before the next attempt, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status(status) => status.retry_after,
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
