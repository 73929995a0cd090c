//! Group service - read-only membership queries.

use crate::domain::{GroupId, ProfileId};
use crate::ports::{CoreError, GroupMembershipIndex};
use std::sync::Arc;

/// Thin facade over the membership index for adapters.
pub struct GroupService {
    membership: Arc<dyn GroupMembershipIndex>,
}

impl GroupService {
    pub fn new(membership: Arc<dyn GroupMembershipIndex>) -> Self {
        Self { membership }
    }

    /// Profiles related to a group.
    pub async fn profiles(&self, group_id: GroupId) -> Result<Vec<ProfileId>, CoreError> {
        Ok(self.membership.profiles_of_group(group_id).await?)
    }
}
