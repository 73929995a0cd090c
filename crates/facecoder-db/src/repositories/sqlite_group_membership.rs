//! `SQLite` implementation of the `GroupMembershipIndex` trait.
//!
//! Every answer is a join over `relations`, read at call time.

use async_trait::async_trait;
use sqlx::SqlitePool;

use facecoder_core::{
    GroupEmbedding, GroupId, GroupMembershipIndex, ImageId, ProfileId, RepositoryError,
};

use super::row_mappers::row_to_group_embedding;

const GROUP_IMAGES_JOIN: &str = "FROM images i \
     JOIN relations r ON r.profile_id = i.profile_id \
     WHERE r.profile_group_id = ?";

/// `SQLite` implementation of the `GroupMembershipIndex` trait.
pub struct SqliteGroupMembershipIndex {
    pool: SqlitePool,
}

impl SqliteGroupMembershipIndex {
    /// Create a new `SQLite` membership index.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_ids(&self, query: &str, key: i64) -> Result<Vec<i64>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(query)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[async_trait]
impl GroupMembershipIndex for SqliteGroupMembershipIndex {
    async fn images_of_group(&self, group_id: GroupId) -> Result<Vec<ImageId>, RepositoryError> {
        let query = format!("SELECT DISTINCT i.id {GROUP_IMAGES_JOIN} ORDER BY i.id");
        self.fetch_ids(&query, group_id).await
    }

    async fn groups_of_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<GroupId>, RepositoryError> {
        self.fetch_ids(
            "SELECT DISTINCT profile_group_id FROM relations WHERE profile_id = ? ORDER BY profile_group_id",
            profile_id,
        )
        .await
    }

    async fn profiles_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ProfileId>, RepositoryError> {
        self.fetch_ids(
            "SELECT DISTINCT profile_id FROM relations WHERE profile_group_id = ? ORDER BY profile_id",
            group_id,
        )
        .await
    }

    async fn unencoded_images_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ImageId>, RepositoryError> {
        let query =
            format!("SELECT DISTINCT i.id {GROUP_IMAGES_JOIN} AND i.is_encoded = 0 ORDER BY i.id");
        self.fetch_ids(&query, group_id).await
    }

    async fn embeddings_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupEmbedding>, RepositoryError> {
        let query = format!(
            "SELECT DISTINCT i.id, i.profile_id, i.is_encoded, i.embedding {GROUP_IMAGES_JOIN} ORDER BY i.id"
        );

        let rows = sqlx::query(&query)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        rows.iter().map(row_to_group_embedding).collect()
    }
}
