//! External encoding service port.
//!
//! The analytics service receives a batch of image routes and answers with
//! one embedding per route, in submission order. There is no correlation
//! key in the response; position is the only link between a route and its
//! embedding.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Embedding;

/// Errors from the encoding service port.
///
/// Every variant means the whole batch failed and no embedding may be used.
#[derive(Debug, Error)]
pub enum EncodingServiceError {
    /// Connection failure or other transport error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request did not complete within the configured timeout.
    #[error("Encoding request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("Encoding service returned status {status}")]
    Status { status: u16 },

    /// The response body could not be understood.
    #[error("Invalid encoding response: {message}")]
    InvalidResponse { message: String },

    /// The response carried a different number of embeddings than routes
    /// submitted, so positions cannot be trusted.
    #[error("Expected {expected} embeddings, received {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The client is misconfigured (bad base URL, etc.).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Batch face encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EncodingServicePort: Send + Sync {
    /// Encode every route in one round trip.
    ///
    /// On success the returned vector has exactly one embedding per route,
    /// where element `i` belongs to `routes[i]`.
    async fn encode_batch(&self, routes: &[String])
    -> Result<Vec<Embedding>, EncodingServiceError>;
}
