//! Invalidation trigger - marks a group's embeddings stale.
//!
//! A new image for a profile can change group-level matching decisions,
//! so every image of every group the profile belongs to loses its
//! encoded flag. Embeddings are left in place; only the flag is cleared.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{GroupId, GroupReset, InvalidationOutcome, ProfileId};
use crate::ports::{GroupMembershipIndex, ImageRepository};

/// Service clearing encoded flags after membership-relevant changes.
pub struct InvalidationService {
    images: Arc<dyn ImageRepository>,
    membership: Arc<dyn GroupMembershipIndex>,
}

impl InvalidationService {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        membership: Arc<dyn GroupMembershipIndex>,
    ) -> Self {
        Self { images, membership }
    }

    /// Mark every image in the profile's groups as needing re-encoding.
    ///
    /// Idempotent. Failures are logged and reported in the outcome, never
    /// returned as errors, since the image that triggered the call is
    /// already committed.
    pub async fn on_image_created(&self, profile_id: ProfileId) -> InvalidationOutcome {
        let groups = match self.membership.groups_of_profile(profile_id).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(
                    target: "facecoder.invalidation",
                    profile_id,
                    error = %e,
                    "Could not resolve groups of profile"
                );
                return InvalidationOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let mut resets = Vec::with_capacity(groups.len());
        for group_id in groups {
            resets.push(self.reset_group(group_id).await);
        }

        info!(
            target: "facecoder.invalidation",
            profile_id,
            groups = resets.len(),
            "Group encodings reset"
        );
        InvalidationOutcome::Reset { groups: resets }
    }

    /// Clear the encoded flag of every image in one group.
    pub async fn reset_group(&self, group_id: GroupId) -> GroupReset {
        match self.images.clear_group_encoding(group_id).await {
            Ok(images) => GroupReset::Cleared { group_id, images },
            Err(e) => {
                warn!(
                    target: "facecoder.invalidation",
                    group_id,
                    error = %e,
                    "Failed to reset group encodings"
                );
                GroupReset::Failed {
                    group_id,
                    error: e.to_string(),
                }
            }
        }
    }

}
