//! Outcome types for encoding and invalidation.
//!
//! Every operation that can partially fail reports its result as one of
//! these closed enums. Callers discriminate on the variant, never on the
//! presence of a field.

use serde::{Deserialize, Serialize};

use super::image::{GroupId, Image, ImageId};

/// Message attached to a successfully persisted embedding.
pub const ENCODED_MESSAGE: &str = "Embedding extracted and saved";

// ─────────────────────────────────────────────────────────────────────────────
// Batch Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Result of persisting one image's embedding after a successful batch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageEncodingOutcome {
    /// The embedding was stored and the image marked encoded.
    Encoded { id: ImageId, message: String },
    /// Storing the embedding failed; siblings were not affected.
    Failed { id: ImageId, error: String },
}

impl ImageEncodingOutcome {
    pub fn encoded(id: ImageId) -> Self {
        Self::Encoded {
            id,
            message: ENCODED_MESSAGE.to_string(),
        }
    }

    pub fn failed(id: ImageId, error: impl Into<String>) -> Self {
        Self::Failed {
            id,
            error: error.into(),
        }
    }

    /// Image this outcome refers to.
    pub const fn id(&self) -> ImageId {
        match self {
            Self::Encoded { id, .. } | Self::Failed { id, .. } => *id,
        }
    }

    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Encoded { .. })
    }
}

/// Result of one `RequestEncoding` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The batch call succeeded; one outcome per resolved image, in
    /// resolution order.
    Completed {
        outcomes: Vec<ImageEncodingOutcome>,
        /// Requested ids that did not resolve to an image. They were not
        /// sent to the analytics service and nothing was written for them.
        unresolved: Vec<ImageId>,
    },
    /// The batch call failed. No image was modified.
    ServiceUnavailable { reason: String },
}

impl BatchOutcome {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Per-image outcomes, empty when the batch call failed.
    pub fn outcomes(&self) -> &[ImageEncodingOutcome] {
        match self {
            Self::Completed { outcomes, .. } => outcomes,
            Self::ServiceUnavailable { .. } => &[],
        }
    }

    /// Ids whose embedding could not be persisted, for a targeted retry.
    pub fn failed_ids(&self) -> Vec<ImageId> {
        self.outcomes()
            .iter()
            .filter(|o| !o.succeeded())
            .map(ImageEncodingOutcome::id)
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalidation
// ─────────────────────────────────────────────────────────────────────────────

/// Result of marking one group's images stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupReset {
    /// Every image of the group is now unencoded.
    Cleared { group_id: GroupId, images: u64 },
    /// The group could not be marked stale.
    Failed { group_id: GroupId, error: String },
}

impl GroupReset {
    pub const fn group_id(&self) -> GroupId {
        match self {
            Self::Cleared { group_id, .. } | Self::Failed { group_id, .. } => *group_id,
        }
    }

    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Cleared { .. })
    }
}

/// Result of the invalidation that follows an image registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvalidationOutcome {
    /// The profile's groups were resolved; one entry per group.
    Reset { groups: Vec<GroupReset> },
    /// The profile's groups could not be resolved; nothing was cleared.
    Failed { error: String },
}

impl InvalidationOutcome {
    /// Whether every group of the profile was marked stale.
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Reset { groups } => groups.iter().all(GroupReset::succeeded),
            Self::Failed { .. } => false,
        }
    }
}

/// A freshly registered image together with the invalidation it triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRegistration {
    pub image: Image,
    pub group_update: InvalidationOutcome,
}
