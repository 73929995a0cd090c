//! Wiring of the `SQLite` repositories into the core's `Repos` container.

use sqlx::SqlitePool;
use std::sync::Arc;

use facecoder_core::Repos;

use crate::repositories::{SqliteGroupMembershipIndex, SqliteImageRepository};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    ///
    /// Returns a `Repos` struct from `facecoder-core` containing
    /// trait-object-wrapped repositories sharing the pool.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteImageRepository::new(pool.clone())),
            Arc::new(SqliteGroupMembershipIndex::new(pool)),
        )
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema
/// applied, plus seeding helpers for the rows this crate only reads
/// (users, profiles, groups and relations).
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Build a `Repos` container over this database.
    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    /// Create an image repository using this test database.
    pub fn image_repository(&self) -> SqliteImageRepository {
        SqliteImageRepository::new(self.pool.clone())
    }

    /// Create a membership index using this test database.
    pub fn membership_index(&self) -> SqliteGroupMembershipIndex {
        SqliteGroupMembershipIndex::new(self.pool.clone())
    }

    /// Insert a user and return its id.
    pub async fn insert_user(&self, name: &str) -> anyhow::Result<i64> {
        let result = sqlx::query("INSERT INTO users (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Insert a profile owned by `user_id` and return its id.
    pub async fn insert_profile(&self, user_id: i64, name: &str) -> anyhow::Result<i64> {
        let result = sqlx::query("INSERT INTO profiles (user_id, name) VALUES (?, ?)")
            .bind(user_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Insert a profile group and return its id.
    pub async fn insert_group(&self, name: &str) -> anyhow::Result<i64> {
        let result = sqlx::query("INSERT INTO profile_groups (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Add a profile to a group. Relating twice is a no-op.
    pub async fn relate(&self, profile_id: i64, group_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO relations (profile_id, profile_group_id) VALUES (?, ?)",
        )
        .bind(profile_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
