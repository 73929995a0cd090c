//! Internal error types for analytics service calls.
//!
//! These errors are internal to `facecoder-analytics` and are mapped to the
//! core port error at the boundary.

use thiserror::Error;

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors related to calls to the face analytics service.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Request failed with an HTTP error status.
    #[error("Analytics request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Analytics request timed out: {url}")]
    Timeout {
        /// The URL that was requested
        url: String,
    },

    /// The service answered with a different number of embeddings than
    /// routes submitted.
    #[error("Expected {expected} embeddings, received {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Service returned an invalid or unexpected response.
    #[error("Invalid response from analytics service: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
