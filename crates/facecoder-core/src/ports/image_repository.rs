//! Image repository trait definition.
//!
//! This port defines the interface for image record persistence.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Embedding, GroupId, Image, ImageFilter, ImageId, ImageUpdate, NewImage};

/// Repository for image records.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - `list` returns images in ascending id order so callers get a stable
///   resolution order
/// - Writes to different ids never block each other; there is no
///   repository-wide lock
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// List the images matching a filter, ordered by id.
    ///
    /// Ids in the filter that do not exist are silently skipped.
    async fn list(&self, filter: &ImageFilter) -> Result<Vec<Image>, RepositoryError>;

    /// Get an image by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the image doesn't exist.
    async fn get_by_id(&self, id: ImageId) -> Result<Image, RepositoryError>;

    /// Insert a new image record, unencoded.
    ///
    /// Returns `Err(RepositoryError::AlreadyExists)` if the route is already
    /// registered.
    async fn insert(&self, image: &NewImage) -> Result<Image, RepositoryError>;

    /// Update the route and/or owner of an image.
    ///
    /// A route change clears the encoded flag. Returns
    /// `Err(RepositoryError::NotFound)` if the image doesn't exist.
    async fn update(&self, id: ImageId, update: &ImageUpdate) -> Result<Image, RepositoryError>;

    /// Store an embedding and set the encoded flag for one image.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the image doesn't exist.
    async fn update_encoding(
        &self,
        id: ImageId,
        embedding: &Embedding,
        is_encoded: bool,
    ) -> Result<(), RepositoryError>;

    /// Clear the encoded flag of the given images, leaving embeddings in
    /// place. Unknown ids are ignored.
    ///
    /// Returns the number of rows touched.
    async fn clear_encoding(&self, ids: &[ImageId]) -> Result<u64, RepositoryError>;

    /// Clear the encoded flag of every image owned by a profile related to
    /// the group, in one statement. Embeddings stay in place.
    ///
    /// Returns the number of rows touched.
    async fn clear_group_encoding(&self, group_id: GroupId) -> Result<u64, RepositoryError>;

    /// Delete an image by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the image doesn't exist.
    async fn delete(&self, id: ImageId) -> Result<(), RepositoryError>;
}
