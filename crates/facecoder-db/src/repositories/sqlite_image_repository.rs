//! `SQLite` implementation of the `ImageRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use facecoder_core::{
    Embedding, GroupId, Image, ImageFilter, ImageId, ImageRepository, ImageUpdate, NewImage,
    RepositoryError,
};

use super::row_mappers::{IMAGE_SELECT_COLUMNS, embedding_to_json, row_to_image};

/// Ids bound per statement. Keeps `IN (...)` lists under the `SQLite`
/// host parameter limit.
const ID_CHUNK: usize = 900;

/// Map a write error, turning the route uniqueness violation into
/// `AlreadyExists`.
fn map_write_error(err: sqlx::Error, route: &str) -> RepositoryError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepositoryError::AlreadyExists(format!("Image with route '{route}'"))
        }
        Some(db) if db.is_foreign_key_violation() || db.is_check_violation() => {
            RepositoryError::Constraint(db.message().to_string())
        }
        _ => RepositoryError::Storage(err.to_string()),
    }
}

/// `SQLite` implementation of the `ImageRepository` trait.
pub struct SqliteImageRepository {
    pool: SqlitePool,
}

impl SqliteImageRepository {
    /// Create a new `SQLite` image repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One `SELECT` for the filter, restricted to `ids` when given.
    async fn list_chunk(
        &self,
        filter: &ImageFilter,
        ids: Option<&[ImageId]>,
    ) -> Result<Vec<Image>, RepositoryError> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {IMAGE_SELECT_COLUMNS} FROM images WHERE 1 = 1"));

        if let Some(ids) = ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query.push(" AND id IN (");
            let mut separated = query.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        if let Some(profile_id) = filter.profile_id {
            query.push(" AND profile_id = ").push_bind(profile_id);
        }
        if let Some(is_encoded) = filter.is_encoded {
            query.push(" AND is_encoded = ").push_bind(is_encoded);
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        rows.iter().map(row_to_image).collect()
    }
}

#[async_trait]
impl ImageRepository for SqliteImageRepository {
    async fn list(&self, filter: &ImageFilter) -> Result<Vec<Image>, RepositoryError> {
        let Some(ids) = &filter.ids else {
            return self.list_chunk(filter, None).await;
        };

        let mut images = Vec::new();
        for chunk in ids.chunks(ID_CHUNK) {
            images.extend(self.list_chunk(filter, Some(chunk)).await?);
        }
        if ids.len() > ID_CHUNK {
            images.sort_by_key(|i| i.id);
            images.dedup_by_key(|i| i.id);
        }
        Ok(images)
    }

    async fn get_by_id(&self, id: ImageId) -> Result<Image, RepositoryError> {
        let query = format!("SELECT {IMAGE_SELECT_COLUMNS} FROM images WHERE id = ?");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?
            .ok_or_else(|| RepositoryError::NotFound(format!("Image with ID {id}")))?;

        row_to_image(&row)
    }

    async fn insert(&self, image: &NewImage) -> Result<Image, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO images (profile_id, route, embedding, is_encoded, created_at) VALUES (?, ?, NULL, 0, ?)",
        )
        .bind(image.profile_id)
        .bind(&image.route)
        .bind(Utc::now().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &image.route))?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn update(&self, id: ImageId, update: &ImageUpdate) -> Result<Image, RepositoryError> {
        let current = self.get_by_id(id).await?;

        let route = update.route.as_ref().unwrap_or(&current.route);
        let profile_id = update.profile_id.unwrap_or(current.profile_id);
        // A moved file is no longer described by the stored embedding
        let is_encoded = current.is_encoded && *route == current.route;

        let result = sqlx::query(
            "UPDATE images SET route = ?, profile_id = ?, is_encoded = ? WHERE id = ?",
        )
        .bind(route)
        .bind(profile_id)
        .bind(is_encoded)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, route))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Image with ID {id}")));
        }

        self.get_by_id(id).await
    }

    async fn update_encoding(
        &self,
        id: ImageId,
        embedding: &Embedding,
        is_encoded: bool,
    ) -> Result<(), RepositoryError> {
        let embedding_json = embedding_to_json(embedding)?;

        let result = sqlx::query("UPDATE images SET embedding = ?, is_encoded = ? WHERE id = ?")
            .bind(&embedding_json)
            .bind(is_encoded)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Image with ID {id}")));
        }

        Ok(())
    }

    async fn clear_encoding(&self, ids: &[ImageId]) -> Result<u64, RepositoryError> {
        let mut touched = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let mut query: QueryBuilder<'_, Sqlite> =
                QueryBuilder::new("UPDATE images SET is_encoded = 0 WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            let result = query
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::Storage(e.to_string()))?;
            touched += result.rows_affected();
        }

        Ok(touched)
    }

    async fn clear_group_encoding(&self, group_id: GroupId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE images SET is_encoded = 0 WHERE profile_id IN \
             (SELECT profile_id FROM relations WHERE profile_group_id = ?)",
        )
        .bind(group_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: ImageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Image with ID {id}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::TestDb;
    use crate::setup::setup_test_database;

    /// More ids than `SQLite` accepts as bound parameters in one statement.
    const PAST_PARAMETER_LIMIT: i64 = 40_001;

    async fn repo() -> SqliteImageRepository {
        SqliteImageRepository::new(setup_test_database().await.unwrap())
    }

    /// Insert `count` encoded images for a profile in one statement.
    async fn bulk_insert_encoded(pool: &SqlitePool, profile_id: i64, count: i64) {
        sqlx::query(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?) \
             INSERT INTO images (profile_id, route, embedding, is_encoded) \
             SELECT ?, '/bulk/' || ? || '/' || n || '.jpg', '[1.0]', 1 FROM seq",
        )
        .bind(count)
        .bind(profile_id)
        .bind(profile_id)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_large_id_sets_are_listed_and_cleared() {
        let pool = setup_test_database().await.unwrap();
        bulk_insert_encoded(&pool, 1, PAST_PARAMETER_LIMIT).await;
        let repo = SqliteImageRepository::new(pool);
        let mut ids: Vec<ImageId> = (1..=PAST_PARAMETER_LIMIT).rev().collect();
        ids.push(PAST_PARAMETER_LIMIT + 10);

        let images = repo.list(&ImageFilter::by_ids(ids.clone())).await.unwrap();
        assert_eq!(images.len(), 40_001);
        assert_eq!(images.first().unwrap().id, 1);
        assert_eq!(images.last().unwrap().id, PAST_PARAMETER_LIMIT);
        assert!(images.windows(2).all(|w| w[0].id < w[1].id));

        assert_eq!(repo.clear_encoding(&ids).await.unwrap(), 40_001);
        assert!(
            repo.list(&ImageFilter::all().with_encoded(true))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_clear_group_encoding_covers_large_groups_only() {
        let db = TestDb::new().await.unwrap();
        let user = db.insert_user("owner").await.unwrap();
        let member = db.insert_profile(user, "member").await.unwrap();
        let outsider = db.insert_profile(user, "outsider").await.unwrap();
        let group = db.insert_group("family").await.unwrap();
        db.relate(member, group).await.unwrap();
        bulk_insert_encoded(db.pool(), member, PAST_PARAMETER_LIMIT).await;
        bulk_insert_encoded(db.pool(), outsider, 3).await;
        let repo = db.image_repository();

        assert_eq!(repo.clear_group_encoding(group).await.unwrap(), 40_001);

        let still_encoded = repo
            .list(&ImageFilter::all().with_encoded(true))
            .await
            .unwrap();
        assert_eq!(still_encoded.len(), 3);
        assert!(still_encoded.iter().all(|i| i.profile_id == outsider));
        let cleared = repo.list(&ImageFilter::by_profile(member)).await.unwrap();
        assert!(cleared.iter().all(|i| i.embedding.is_some()));
        assert_eq!(repo.clear_group_encoding(group + 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;

        let image = repo.insert(&NewImage::new(4, "/user_data/4/a.jpg")).await.unwrap();

        assert_eq!(image.profile_id, 4);
        assert_eq!(image.route, "/user_data/4/a.jpg");
        assert!(!image.is_encoded);
        assert!(image.embedding.is_none());
        assert_eq!(repo.get_by_id(image.id).await.unwrap(), image);
    }

    #[tokio::test]
    async fn test_duplicate_route_is_already_exists() {
        let repo = repo().await;
        repo.insert(&NewImage::new(1, "/same.jpg")).await.unwrap();

        let err = repo.insert(&NewImage::new(2, "/same.jpg")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.get_by_id(99).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_encoding_round_trips_embedding() {
        let repo = repo().await;
        let id = repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap().id;

        repo.update_encoding(id, &Embedding::new(vec![0.25, -3.5, 7.0]), true)
            .await
            .unwrap();

        let image = repo.get_by_id(id).await.unwrap();
        assert!(image.is_encoded);
        assert_eq!(
            image.current_embedding().unwrap().as_slice(),
            &[0.25, -3.5, 7.0]
        );
    }

    #[tokio::test]
    async fn test_embedding_keeps_full_precision() {
        let repo = repo().await;
        let id = repo.insert(&NewImage::new(1, "/precise.jpg")).await.unwrap().id;
        let values = vec![-0.091_234_567_890_123_4, 0.1, 1e-300];

        repo.update_encoding(id, &Embedding::new(values.clone()), true)
            .await
            .unwrap();

        let image = repo.get_by_id(id).await.unwrap();
        assert_eq!(image.embedding.unwrap().as_slice(), values.as_slice());
    }

    #[tokio::test]
    async fn test_update_encoding_missing_image() {
        let repo = repo().await;
        let err = repo
            .update_encoding(12, &Embedding::new(vec![1.0]), true)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_by_id() {
        let repo = repo().await;
        let a = repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap().id;
        let b = repo.insert(&NewImage::new(2, "/b.jpg")).await.unwrap().id;
        let c = repo.insert(&NewImage::new(1, "/c.jpg")).await.unwrap().id;
        repo.update_encoding(c, &Embedding::new(vec![1.0]), true)
            .await
            .unwrap();

        let ids = |images: Vec<Image>| images.into_iter().map(|i| i.id).collect::<Vec<_>>();

        assert_eq!(ids(repo.list(&ImageFilter::all()).await.unwrap()), vec![a, b, c]);
        assert_eq!(
            ids(repo.list(&ImageFilter::by_ids(vec![c, 404, a])).await.unwrap()),
            vec![a, c]
        );
        assert_eq!(
            ids(repo.list(&ImageFilter::by_profile(1)).await.unwrap()),
            vec![a, c]
        );
        assert_eq!(
            ids(repo
                .list(&ImageFilter::by_profile(1).with_encoded(false))
                .await
                .unwrap()),
            vec![a]
        );
        assert!(
            repo.list(&ImageFilter::by_ids(Vec::new()))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_clear_encoding_keeps_embedding() {
        let repo = repo().await;
        let a = repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap().id;
        let b = repo.insert(&NewImage::new(1, "/b.jpg")).await.unwrap().id;
        repo.update_encoding(a, &Embedding::new(vec![2.0]), true)
            .await
            .unwrap();

        assert_eq!(repo.clear_encoding(&[a, b]).await.unwrap(), 2);
        assert_eq!(repo.clear_encoding(&[]).await.unwrap(), 0);

        let a = repo.get_by_id(a).await.unwrap();
        assert!(!a.is_encoded);
        assert_eq!(a.embedding.unwrap().as_slice(), &[2.0]);
    }

    #[tokio::test]
    async fn test_update_route_clears_flag_but_owner_change_does_not() {
        let repo = repo().await;
        let id = repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap().id;
        repo.update_encoding(id, &Embedding::new(vec![1.0]), true)
            .await
            .unwrap();

        let moved_owner = repo
            .update(
                id,
                &ImageUpdate {
                    route: None,
                    profile_id: Some(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved_owner.profile_id, 2);
        assert!(moved_owner.is_encoded);

        let moved_file = repo
            .update(
                id,
                &ImageUpdate {
                    route: Some("/b.jpg".to_string()),
                    profile_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(moved_file.route, "/b.jpg");
        assert!(!moved_file.is_encoded);
    }

    #[tokio::test]
    async fn test_update_to_taken_route_is_already_exists() {
        let repo = repo().await;
        repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap();
        let b = repo.insert(&NewImage::new(1, "/b.jpg")).await.unwrap().id;

        let err = repo
            .update(
                b,
                &ImageUpdate {
                    route: Some("/a.jpg".to_string()),
                    profile_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let id = repo.insert(&NewImage::new(1, "/a.jpg")).await.unwrap().id;

        repo.delete(id).await.unwrap();
        assert!(matches!(
            repo.delete(id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
