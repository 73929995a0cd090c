//! HTTP backend abstraction for the analytics service.
//!
//! The production implementation uses reqwest with automatic retry for
//! transient errors. Tests inject [`testing::FakeBackend`] instead.

use crate::config::AnalyticsClientConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST a JSON body and decode a JSON reply.
///
/// This is an implementation detail - external code should use the
/// `EncodingServicePort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` as JSON to `url` and deserialize the response.
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> AnalyticsResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Network errors and 5xx responses are retried with exponential backoff
/// up to `max_retries` times. Timeouts and 4xx responses fail at once.
/// The configured timeout bounds the whole exchange, retries included.
pub struct ReqwestBackend {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &AnalyticsClientConfig) -> AnalyticsResult<Self> {
        // The analytics service is reached directly, never through a proxy
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    fn backoff(&self, attempt: u8) -> Duration {
        let factor = 2u32.saturating_pow(u32::from(attempt).saturating_sub(1));
        self.retry_base_delay.saturating_mul(factor)
    }

    /// POST a body with automatic retry for transient errors.
    async fn post_with_retry(&self, url: &Url, body: &[u8]) -> AnalyticsResult<reqwest::Response> {
        let mut last_error: Option<AnalyticsError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }

            let request = self
                .client
                .post(url.as_str())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.to_vec());

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let error = AnalyticsError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        warn!(
                            target: "facecoder.analytics",
                            status = status.as_u16(),
                            attempt,
                            "Analytics server error, retrying"
                        );
                        last_error = Some(error);
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(error);
                }
                Err(e) if e.is_timeout() => {
                    return Err(AnalyticsError::Timeout {
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        warn!(
                            target: "facecoder.analytics",
                            error = %e,
                            attempt,
                            "Analytics request failed, retrying"
                        );
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AnalyticsError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> AnalyticsResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let payload = serde_json::to_vec(body)?;
        debug!(
            target: "facecoder.analytics",
            url = %url,
            bytes = payload.len(),
            "Posting to analytics service"
        );

        let timed_out = || AnalyticsError::Timeout {
            url: url.to_string(),
        };
        let exchange = async {
            let response = self.post_with_retry(url, &payload).await?;
            response
                .bytes()
                .await
                .map_err(|e| if e.is_timeout() { timed_out() } else { e.into() })
        };
        let bytes = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| timed_out())??;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
