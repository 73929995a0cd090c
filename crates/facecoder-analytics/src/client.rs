//! Analytics service client.

use facecoder_core::Embedding;
use tracing::debug;
use url::Url;

use crate::config::AnalyticsClientConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{EncodeImagesRequest, EncodeImagesResponse};

/// Path of the batch encoding endpoint, relative to the base URL.
const ENCODE_IMAGES_PATH: &str = "encode_images";

// ============================================================================
// Type Aliases
// ============================================================================

/// Default analytics client using the reqwest HTTP backend.
pub type DefaultAnalyticsClient = AnalyticsClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the face analytics service.
///
/// Generic over an HTTP backend for testing. Use `DefaultAnalyticsClient`
/// in production code.
pub struct AnalyticsClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) encode_url: Url,
}

impl DefaultAnalyticsClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &AnalyticsClientConfig) -> Result<Self, facecoder_core::EncodingServiceError> {
        Self::build(config).map_err(crate::port::map_error)
    }

    fn build(config: &AnalyticsClientConfig) -> AnalyticsResult<Self> {
        let encode_url = encode_url(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self {
            backend,
            encode_url,
        })
    }
}

impl<B: HttpBackend> AnalyticsClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(base_url: &str, backend: B) -> AnalyticsResult<Self> {
        Ok(Self {
            backend,
            encode_url: encode_url(base_url)?,
        })
    }

    /// Encode the files at `routes` in one request.
    ///
    /// The result has exactly one embedding per route, in route order.
    pub(crate) async fn encode_images(&self, routes: &[String]) -> AnalyticsResult<Vec<Embedding>> {
        if routes.is_empty() {
            return Ok(Vec::new());
        }

        let response: EncodeImagesResponse = self
            .backend
            .post_json(&self.encode_url, &EncodeImagesRequest::routes(routes))
            .await?;

        if response.embeddings.len() != routes.len() {
            return Err(AnalyticsError::LengthMismatch {
                expected: routes.len(),
                actual: response.embeddings.len(),
            });
        }

        debug!(
            target: "facecoder.analytics",
            count = routes.len(),
            "Received embeddings"
        );
        Ok(response
            .embeddings
            .into_iter()
            .map(|e| Embedding::new(e.embedding))
            .collect())
    }
}

/// Resolve the endpoint URL, keeping any path prefix of the base URL.
fn encode_url(base_url: &str) -> AnalyticsResult<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(ENCODE_IMAGES_PATH)?)
}
