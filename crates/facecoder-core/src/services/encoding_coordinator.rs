//! Encoding coordinator - batches images through the analytics service.
//!
//! One `request_encoding` call resolves the requested ids, sends every
//! resolved route to the encoding service in a single request, pairs the
//! response back to the images by position and persists each embedding
//! on its own. Nothing is written until the full response has arrived.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{
    BatchOutcome, Embedding, GroupEmbedding, GroupId, ImageEncodingOutcome, ImageFilter, ImageId,
};
use crate::ports::{
    CoreError, EncodingServiceError, EncodingServicePort, GroupMembershipIndex, ImageRepository,
    RepositoryError,
};

/// Default bound on a single embedding write.
pub const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for the encoding coordinator, supplied by the composition root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCoordinatorConfig {
    /// Upper bound on each per-image write. `None` waits indefinitely.
    pub persist_timeout: Option<Duration>,
}

impl Default for EncodingCoordinatorConfig {
    fn default() -> Self {
        Self {
            persist_timeout: Some(DEFAULT_PERSIST_TIMEOUT),
        }
    }
}

impl EncodingCoordinatorConfig {
    #[must_use]
    pub const fn with_persist_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.persist_timeout = timeout;
        self
    }
}

/// Service deciding what to encode and reconciling batch results.
pub struct EncodingCoordinator {
    images: Arc<dyn ImageRepository>,
    membership: Arc<dyn GroupMembershipIndex>,
    encoder: Arc<dyn EncodingServicePort>,
    config: EncodingCoordinatorConfig,
}

impl EncodingCoordinator {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        membership: Arc<dyn GroupMembershipIndex>,
        encoder: Arc<dyn EncodingServicePort>,
        config: EncodingCoordinatorConfig,
    ) -> Self {
        Self {
            images,
            membership,
            encoder,
            config,
        }
    }

    /// Encode the given images in one batch and persist the results.
    ///
    /// Ids that do not resolve are reported in `unresolved` and otherwise
    /// ignored. The current encoded flag is not consulted: already encoded
    /// images are encoded again. A failing batch call yields
    /// `BatchOutcome::ServiceUnavailable` with nothing written; a failing
    /// write only marks that image's outcome as failed.
    ///
    /// Only a failure to resolve the ids at all is returned as `Err`.
    pub async fn request_encoding(&self, ids: &[ImageId]) -> Result<BatchOutcome, CoreError> {
        let requested = dedup_preserving_order(ids);
        if requested.is_empty() {
            return Ok(BatchOutcome::Completed {
                outcomes: Vec::new(),
                unresolved: Vec::new(),
            });
        }

        let resolved: Vec<(ImageId, String)> = self
            .images
            .list(&ImageFilter::by_ids(requested.clone()))
            .await?
            .into_iter()
            .map(|image| (image.id, image.route))
            .collect();

        let found: HashSet<ImageId> = resolved.iter().map(|(id, _)| *id).collect();
        let unresolved: Vec<ImageId> = requested
            .into_iter()
            .filter(|id| !found.contains(id))
            .collect();
        if !unresolved.is_empty() {
            debug!(
                target: "facecoder.encoding",
                ?unresolved,
                "Dropping ids that do not resolve to an image"
            );
        }

        if resolved.is_empty() {
            return Ok(BatchOutcome::Completed {
                outcomes: Vec::new(),
                unresolved,
            });
        }

        let routes: Vec<String> = resolved.iter().map(|(_, route)| route.clone()).collect();
        info!(
            target: "facecoder.encoding",
            images = routes.len(),
            "Requesting batch encoding"
        );

        let embeddings = match self.encoder.encode_batch(&routes).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!(target: "facecoder.encoding", error = %e, "Batch encoding failed");
                return Ok(BatchOutcome::ServiceUnavailable {
                    reason: e.to_string(),
                });
            }
        };

        let pairs = match correlate(resolved, embeddings) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(target: "facecoder.encoding", error = %e, "Discarding batch response");
                return Ok(BatchOutcome::ServiceUnavailable {
                    reason: e.to_string(),
                });
            }
        };

        let mut outcomes = Vec::with_capacity(pairs.len());
        for (id, embedding) in pairs {
            outcomes.push(self.persist(id, &embedding).await);
        }

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        info!(
            target: "facecoder.encoding",
            encoded = outcomes.len() - failed,
            failed,
            unresolved = unresolved.len(),
            "Batch encoding reconciled"
        );

        Ok(BatchOutcome::Completed {
            outcomes,
            unresolved,
        })
    }

    /// Ids of the group's images whose embedding is not current.
    pub async fn images_needing_encoding(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ImageId>, CoreError> {
        Ok(self.membership.unencoded_images_of_group(group_id).await?)
    }

    /// Stored embeddings of every image in the group, fresh or not.
    pub async fn embeddings_for_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupEmbedding>, CoreError> {
        Ok(self.membership.embeddings_of_group(group_id).await?)
    }

    /// Encode every stale image of a group.
    pub async fn refresh_group(&self, group_id: GroupId) -> Result<BatchOutcome, CoreError> {
        let pending = self.images_needing_encoding(group_id).await?;
        debug!(
            target: "facecoder.encoding",
            group_id,
            pending = pending.len(),
            "Refreshing group encodings"
        );
        self.request_encoding(&pending).await
    }

    async fn persist(&self, id: ImageId, embedding: &Embedding) -> ImageEncodingOutcome {
        let write = self.images.update_encoding(id, embedding, true);
        let result = match self.config.persist_timeout {
            Some(limit) => tokio::time::timeout(limit, write).await.unwrap_or_else(|_| {
                Err(RepositoryError::Storage(format!(
                    "write timed out after {}ms",
                    limit.as_millis()
                )))
            }),
            None => write.await,
        };

        match result {
            Ok(()) => ImageEncodingOutcome::encoded(id),
            Err(e) => {
                warn!(
                    target: "facecoder.encoding",
                    image_id = id,
                    error = %e,
                    "Failed to persist embedding"
                );
                ImageEncodingOutcome::failed(id, e.to_string())
            }
        }
    }
}

/// Pair the i-th resolved image with the i-th embedding.
fn correlate(
    resolved: Vec<(ImageId, String)>,
    embeddings: Vec<Embedding>,
) -> Result<Vec<(ImageId, Embedding)>, EncodingServiceError> {
    if embeddings.len() != resolved.len() {
        return Err(EncodingServiceError::LengthMismatch {
            expected: resolved.len(),
            actual: embeddings.len(),
        });
    }
    Ok(resolved
        .into_iter()
        .map(|(id, _)| id)
        .zip(embeddings)
        .collect())
}

fn dedup_preserving_order(ids: &[ImageId]) -> Vec<ImageId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
