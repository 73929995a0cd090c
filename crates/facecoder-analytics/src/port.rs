//! Port trait implementation for `AnalyticsClient`.
//!
//! Implements the core-owned `EncodingServicePort` and converts internal
//! errors into `EncodingServiceError`.

use async_trait::async_trait;
use facecoder_core::{Embedding, EncodingServiceError, EncodingServicePort};

use crate::client::AnalyticsClient;
use crate::error::AnalyticsError;
use crate::http::HttpBackend;

/// Convert internal `AnalyticsError` to core `EncodingServiceError`.
pub(crate) fn map_error(err: AnalyticsError) -> EncodingServiceError {
    match err {
        AnalyticsError::ApiRequestFailed { status, .. } => EncodingServiceError::Status { status },
        AnalyticsError::Timeout { .. } => EncodingServiceError::Timeout,
        AnalyticsError::LengthMismatch { expected, actual } => {
            EncodingServiceError::LengthMismatch { expected, actual }
        }
        AnalyticsError::InvalidResponse { message } => {
            EncodingServiceError::InvalidResponse { message }
        }
        AnalyticsError::Network(e) if e.is_builder() => EncodingServiceError::Configuration {
            message: e.to_string(),
        },
        AnalyticsError::Network(e) if e.is_decode() => EncodingServiceError::InvalidResponse {
            message: e.to_string(),
        },
        AnalyticsError::Network(e) => EncodingServiceError::Network {
            message: e.to_string(),
        },
        AnalyticsError::InvalidUrl(e) => EncodingServiceError::Configuration {
            message: e.to_string(),
        },
        AnalyticsError::JsonParse(e) => EncodingServiceError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl<B: HttpBackend> EncodingServicePort for AnalyticsClient<B> {
    async fn encode_batch(
        &self,
        routes: &[String],
    ) -> Result<Vec<Embedding>, EncodingServiceError> {
        self.encode_images(routes).await.map_err(map_error)
    }
}
