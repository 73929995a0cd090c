//! In-memory port implementations shared by the service tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Embedding, GroupEmbedding, GroupId, Image, ImageFilter, ImageId, ImageUpdate, NewImage,
    ProfileId,
};
use crate::ports::{
    EncodingServiceError, EncodingServicePort, GroupMembershipIndex, ImageRepository,
    RepositoryError,
};

/// Image registry and membership index backed by vectors.
#[derive(Default)]
pub struct MemoryStore {
    images: Mutex<Vec<Image>>,
    relations: Mutex<Vec<(ProfileId, GroupId)>>,
    failing_writes: Mutex<HashSet<ImageId>>,
    hanging_writes: Mutex<HashSet<ImageId>>,
    fail_clear: Mutex<bool>,
    fail_membership: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an image directly, bypassing the invalidation trigger.
    pub fn seed_image(&self, profile_id: ProfileId, embedding: Option<Vec<f64>>) -> ImageId {
        let mut images = self.images.lock().unwrap();
        let id = images.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let is_encoded = embedding.is_some();
        images.push(Image {
            id,
            profile_id,
            route: format!("/user_data/{profile_id}/{id}.jpg"),
            embedding: embedding.map(Embedding::new),
            is_encoded,
            created_at: Utc::now(),
        });
        id
    }

    pub fn relate(&self, profile_id: ProfileId, group_id: GroupId) {
        self.relations.lock().unwrap().push((profile_id, group_id));
    }

    /// Make every `update_encoding` call for this image fail.
    pub fn fail_writes_for(&self, id: ImageId) {
        self.failing_writes.lock().unwrap().insert(id);
    }

    /// Make every `update_encoding` call for this image never complete.
    pub fn hang_writes_for(&self, id: ImageId) {
        self.hanging_writes.lock().unwrap().insert(id);
    }

    pub fn fail_clear(&self) {
        *self.fail_clear.lock().unwrap() = true;
    }

    pub fn fail_membership(&self) {
        *self.fail_membership.lock().unwrap() = true;
    }

    pub fn image(&self, id: ImageId) -> Image {
        self.images
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .unwrap()
    }

    pub fn stale_ids(&self) -> Vec<ImageId> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| !i.is_encoded)
            .map(|i| i.id)
            .collect()
    }

    fn check_membership(&self) -> Result<(), RepositoryError> {
        if *self.fail_membership.lock().unwrap() {
            return Err(RepositoryError::Storage("relations unavailable".to_string()));
        }
        Ok(())
    }

    fn profiles_in(&self, group_id: GroupId) -> Vec<ProfileId> {
        let mut profiles: Vec<ProfileId> = self
            .relations
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, g)| *g == group_id)
            .map(|(p, _)| *p)
            .collect();
        profiles.sort_unstable();
        profiles.dedup();
        profiles
    }

    fn group_images(&self, group_id: GroupId) -> Vec<Image> {
        let profiles = self.profiles_in(group_id);
        self.images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| profiles.contains(&i.profile_id))
            .cloned()
            .collect()
    }
}

/// The `ImageFilter` semantics the `SQLite` repository implements in SQL.
fn filter_matches(filter: &ImageFilter, image: &Image) -> bool {
    filter.ids.as_ref().is_none_or(|ids| ids.contains(&image.id))
        && filter.profile_id.is_none_or(|p| p == image.profile_id)
        && filter.is_encoded.is_none_or(|e| e == image.is_encoded)
}

#[async_trait]
impl ImageRepository for MemoryStore {
    async fn list(&self, filter: &ImageFilter) -> Result<Vec<Image>, RepositoryError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| filter_matches(filter, i))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: ImageId) -> Result<Image, RepositoryError> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Image with ID {id}")))
    }

    async fn insert(&self, image: &NewImage) -> Result<Image, RepositoryError> {
        let mut images = self.images.lock().unwrap();
        if images.iter().any(|i| i.route == image.route) {
            return Err(RepositoryError::AlreadyExists(image.route.clone()));
        }
        let persisted = Image {
            id: images.iter().map(|i| i.id).max().unwrap_or(0) + 1,
            profile_id: image.profile_id,
            route: image.route.clone(),
            embedding: None,
            is_encoded: false,
            created_at: Utc::now(),
        };
        images.push(persisted.clone());
        Ok(persisted)
    }

    async fn update(&self, id: ImageId, update: &ImageUpdate) -> Result<Image, RepositoryError> {
        let mut images = self.images.lock().unwrap();
        let image = images
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Image with ID {id}")))?;
        if let Some(route) = &update.route {
            if *route != image.route {
                image.route.clone_from(route);
                image.is_encoded = false;
            }
        }
        if let Some(profile_id) = update.profile_id {
            image.profile_id = profile_id;
        }
        Ok(image.clone())
    }

    async fn update_encoding(
        &self,
        id: ImageId,
        embedding: &Embedding,
        is_encoded: bool,
    ) -> Result<(), RepositoryError> {
        if self.failing_writes.lock().unwrap().contains(&id) {
            return Err(RepositoryError::Storage(format!("write rejected for {id}")));
        }
        let hangs = self.hanging_writes.lock().unwrap().contains(&id);
        if hangs {
            std::future::pending::<()>().await;
        }
        let mut images = self.images.lock().unwrap();
        let image = images
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Image with ID {id}")))?;
        image.embedding = Some(embedding.clone());
        image.is_encoded = is_encoded;
        Ok(())
    }

    async fn clear_encoding(&self, ids: &[ImageId]) -> Result<u64, RepositoryError> {
        if *self.fail_clear.lock().unwrap() {
            return Err(RepositoryError::Storage("database is locked".to_string()));
        }
        let mut touched = 0;
        for image in self.images.lock().unwrap().iter_mut() {
            if ids.contains(&image.id) {
                image.is_encoded = false;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn clear_group_encoding(&self, group_id: GroupId) -> Result<u64, RepositoryError> {
        let ids: Vec<ImageId> = self.group_images(group_id).iter().map(|i| i.id).collect();
        self.clear_encoding(&ids).await
    }

    async fn delete(&self, id: ImageId) -> Result<(), RepositoryError> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| i.id != id);
        if images.len() == before {
            return Err(RepositoryError::NotFound(format!("Image with ID {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl GroupMembershipIndex for MemoryStore {
    async fn images_of_group(&self, group_id: GroupId) -> Result<Vec<ImageId>, RepositoryError> {
        self.check_membership()?;
        Ok(self.group_images(group_id).iter().map(|i| i.id).collect())
    }

    async fn groups_of_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<GroupId>, RepositoryError> {
        self.check_membership()?;
        let mut groups: Vec<GroupId> = self
            .relations
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == profile_id)
            .map(|(_, g)| *g)
            .collect();
        groups.sort_unstable();
        groups.dedup();
        Ok(groups)
    }

    async fn profiles_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ProfileId>, RepositoryError> {
        self.check_membership()?;
        Ok(self.profiles_in(group_id))
    }

    async fn unencoded_images_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ImageId>, RepositoryError> {
        self.check_membership()?;
        Ok(self
            .group_images(group_id)
            .iter()
            .filter(|i| !i.is_encoded)
            .map(|i| i.id)
            .collect())
    }

    async fn embeddings_of_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupEmbedding>, RepositoryError> {
        self.check_membership()?;
        Ok(self
            .group_images(group_id)
            .into_iter()
            .map(|i| GroupEmbedding {
                image_id: i.id,
                profile_id: i.profile_id,
                is_encoded: i.is_encoded,
                embedding: i.embedding,
            })
            .collect())
    }
}

/// Encoder that answers `[position]` for each route and records every batch.
#[derive(Default)]
pub struct PositionalEncoder {
    pub batches: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl EncodingServicePort for PositionalEncoder {
    async fn encode_batch(
        &self,
        routes: &[String],
    ) -> Result<Vec<Embedding>, EncodingServiceError> {
        self.batches.lock().unwrap().push(routes.to_vec());
        #[allow(clippy::cast_precision_loss)]
        Ok((0..routes.len())
            .map(|i| Embedding::new(vec![i as f64]))
            .collect())
    }
}

/// Encoder returning a fixed list of embeddings whatever the input.
pub struct CannedEncoder(pub Vec<Vec<f64>>);

#[async_trait]
impl EncodingServicePort for CannedEncoder {
    async fn encode_batch(
        &self,
        _routes: &[String],
    ) -> Result<Vec<Embedding>, EncodingServiceError> {
        Ok(self.0.iter().cloned().map(Embedding::new).collect())
    }
}

#[test]
fn test_filter_matches_all_constraints() {
    let store = MemoryStore::new();
    let a = store.seed_image(2, None);
    let b = store.seed_image(2, Some(vec![1.0]));
    let c = store.seed_image(3, None);
    let [a, b, c] = [a, b, c].map(|id| store.image(id));

    let filter = ImageFilter::by_profile(2).with_encoded(false);
    assert!(filter_matches(&filter, &a));
    assert!(!filter_matches(&filter, &b));
    assert!(!filter_matches(&filter, &c));

    let filter = ImageFilter::by_ids(vec![b.id, c.id]);
    assert!(filter_matches(&filter, &c));
    assert!(!filter_matches(&filter, &a));
    assert!(filter_matches(&ImageFilter::all(), &a));
}
