//! Image service - registration and CRUD for image records.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::InvalidationService;
use crate::domain::{Image, ImageFilter, ImageId, ImageRegistration, ImageUpdate, NewImage, ProfileId};
use crate::ports::{CoreError, ImageRepository};

/// Service for image record operations.
///
/// Registration is the only operation with a side effect beyond its own
/// row: it runs the invalidation trigger for the owning profile.
pub struct ImageService {
    repo: Arc<dyn ImageRepository>,
    invalidation: Arc<InvalidationService>,
}

impl ImageService {
    pub fn new(repo: Arc<dyn ImageRepository>, invalidation: Arc<InvalidationService>) -> Self {
        Self { repo, invalidation }
    }

    /// Register an uploaded file for a profile.
    ///
    /// Fails with `AlreadyExists` if the route is taken. Once the record is
    /// committed the profile's groups are marked stale; the outcome of that
    /// step is returned alongside the image and never fails the call.
    pub async fn register(
        &self,
        profile_id: ProfileId,
        route: &str,
    ) -> Result<ImageRegistration, CoreError> {
        let route = validate_route(route)?;
        let image = self.repo.insert(&NewImage::new(profile_id, route)).await?;
        info!(
            target: "facecoder.images",
            image_id = image.id,
            profile_id,
            "Image registered"
        );

        let group_update = self.invalidation.on_image_created(profile_id).await;
        if !group_update.succeeded() {
            warn!(
                target: "facecoder.images",
                image_id = image.id,
                "Image registered but group invalidation was incomplete"
            );
        }

        Ok(ImageRegistration {
            image,
            group_update,
        })
    }

    /// List every image.
    pub async fn list(&self) -> Result<Vec<Image>, CoreError> {
        Ok(self.repo.list(&ImageFilter::all()).await?)
    }

    /// List the images of one profile.
    pub async fn list_by_profile(&self, profile_id: ProfileId) -> Result<Vec<Image>, CoreError> {
        Ok(self.repo.list(&ImageFilter::by_profile(profile_id)).await?)
    }

    /// Get an image by id. Returns `NotFound` if missing.
    pub async fn get(&self, id: ImageId) -> Result<Image, CoreError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Change the route and/or owner of an image.
    pub async fn update(&self, id: ImageId, update: ImageUpdate) -> Result<Image, CoreError> {
        if update.is_empty() {
            return Err(CoreError::Validation("Nothing to update".to_string()));
        }
        let update = ImageUpdate {
            route: update.route.as_deref().map(validate_route).transpose()?,
            ..update
        };
        let image = self.repo.update(id, &update).await?;
        debug!(target: "facecoder.images", image_id = id, "Image updated");
        Ok(image)
    }

    /// Delete an image record.
    pub async fn delete(&self, id: ImageId) -> Result<(), CoreError> {
        self.repo.delete(id).await?;
        debug!(target: "facecoder.images", image_id = id, "Image deleted");
        Ok(())
    }
}

fn validate_route(route: &str) -> Result<String, CoreError> {
    let trimmed = route.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Image route cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
