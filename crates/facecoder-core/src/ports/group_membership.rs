//! Group membership port.
//!
//! Membership is computed, never stored on images: a group contains the
//! images of every profile that has a relation pointing at the group.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{GroupEmbedding, GroupId, ImageId, ProfileId};

/// Read-only queries over the group → relation → profile → image chain.
///
/// Implementations must not cache across calls. Every answer reflects the
/// relation rows as they are at query time, since the invalidation trigger
/// depends on it.
#[async_trait]
pub trait GroupMembershipIndex: Send + Sync {
    /// Ids of every image whose owning profile is related to the group,
    /// ascending.
    async fn images_of_group(&self, group_id: GroupId) -> Result<Vec<ImageId>, RepositoryError>;

    /// Ids of every group the profile participates in, ascending.
    async fn groups_of_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<GroupId>, RepositoryError>;

    /// Ids of every profile related to the group, ascending.
    async fn profiles_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ProfileId>, RepositoryError>;

    /// Ids of the group's images whose encoded flag is false, ascending.
    async fn unencoded_images_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ImageId>, RepositoryError>;

    /// Stored embedding of every image of the group, regardless of
    /// encoded state, ordered by image id.
    async fn embeddings_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupEmbedding>, RepositoryError>;
}
