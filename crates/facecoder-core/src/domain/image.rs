//! Image domain types.
//!
//! These types represent stored pictures and their face embeddings,
//! independent of any infrastructure concerns (database, HTTP, etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database identifier of an image.
pub type ImageId = i64;
/// Database identifier of a profile.
pub type ProfileId = i64;
/// Database identifier of a profile group.
pub type GroupId = i64;

// ─────────────────────────────────────────────────────────────────────────────
// Embedding
// ─────────────────────────────────────────────────────────────────────────────

/// A face embedding produced by the analytics service.
///
/// The vector is opaque to this crate: it is stored, returned and
/// replaced as a whole, never interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(pub Vec<f64>);

impl Embedding {
    /// Wrap a raw vector.
    pub const fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Borrow the raw values.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Types
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted image record.
///
/// `is_encoded == true` means `embedding` is present and reflects the most
/// recent successful encoding. When `is_encoded` is false the embedding is
/// stale or absent and must not be trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Database ID of the image.
    pub id: ImageId,
    /// Profile that owns the image.
    pub profile_id: ProfileId,
    /// Storage route of the file, unique across all images.
    pub route: String,
    /// Last embedding written by the encoding coordinator.
    pub embedding: Option<Embedding>,
    /// Whether `embedding` is current.
    pub is_encoded: bool,
    /// UTC timestamp of when the record was created.
    pub created_at: DateTime<Utc>,
}

impl Image {
    /// The embedding, but only when it can be trusted.
    pub fn current_embedding(&self) -> Option<&Embedding> {
        if self.is_encoded {
            self.embedding.as_ref()
        } else {
            None
        }
    }
}

/// An image record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    /// Profile that will own the image.
    pub profile_id: ProfileId,
    /// Storage route of the uploaded file.
    pub route: String,
}

impl NewImage {
    pub fn new(profile_id: ProfileId, route: impl Into<String>) -> Self {
        Self {
            profile_id,
            route: route.into(),
        }
    }
}

/// Partial update of an image record's descriptive fields.
///
/// Embedding state is never written through this type; the encoding
/// coordinator and the invalidation trigger own it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpdate {
    /// New storage route.
    #[serde(default)]
    pub route: Option<String>,
    /// New owning profile.
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
}

impl ImageUpdate {
    /// Whether the update carries no changes.
    pub const fn is_empty(&self) -> bool {
        self.route.is_none() && self.profile_id.is_none()
    }
}

/// Filter for listing images. Empty fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFilter {
    /// Restrict to these ids.
    pub ids: Option<Vec<ImageId>>,
    /// Restrict to images of this profile.
    pub profile_id: Option<ProfileId>,
    /// Restrict to this encoded state.
    pub is_encoded: Option<bool>,
}

impl ImageFilter {
    /// Match every image.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the given ids.
    pub fn by_ids(ids: impl Into<Vec<ImageId>>) -> Self {
        Self {
            ids: Some(ids.into()),
            ..Self::default()
        }
    }

    /// Match the images of one profile.
    pub fn by_profile(profile_id: ProfileId) -> Self {
        Self {
            profile_id: Some(profile_id),
            ..Self::default()
        }
    }

    /// Additionally restrict to an encoded state.
    #[must_use]
    pub const fn with_encoded(mut self, is_encoded: bool) -> Self {
        self.is_encoded = Some(is_encoded);
        self
    }
}

/// Embedding row returned for a group, one per image of any member profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEmbedding {
    /// Image the embedding belongs to.
    pub image_id: ImageId,
    /// Profile that owns the image.
    pub profile_id: ProfileId,
    /// Whether the stored embedding is current.
    pub is_encoded: bool,
    /// Stored embedding, regardless of freshness.
    pub embedding: Option<Embedding>,
}
