//! `AppCore` - the primary application facade.
//!
//! This is the composition root for core services. Adapters receive an
//! `AppCore` instance and use it to access all functionality.

use std::sync::Arc;

use crate::ports::{EncodingServicePort, Repos};

use super::{
    EncodingCoordinator, EncodingCoordinatorConfig, GroupService, ImageService,
    InvalidationService,
};

/// The core application facade.
///
/// # Example
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool);
/// let encoder = Arc::new(DefaultAnalyticsClient::new(&config)?);
/// let core = AppCore::new(repos, encoder, EncodingCoordinatorConfig::default());
///
/// let outcome = core.encoding().request_encoding(&[1, 2, 3]).await?;
/// ```
pub struct AppCore {
    images: ImageService,
    encoding: EncodingCoordinator,
    invalidation: Arc<InvalidationService>,
    groups: GroupService,
}

impl AppCore {
    /// Create a new `AppCore` from repositories and an encoding service.
    pub fn new(
        repos: Repos,
        encoder: Arc<dyn EncodingServicePort>,
        config: EncodingCoordinatorConfig,
    ) -> Self {
        let invalidation = Arc::new(InvalidationService::new(
            repos.images.clone(),
            repos.membership.clone(),
        ));
        Self {
            images: ImageService::new(repos.images.clone(), invalidation.clone()),
            encoding: EncodingCoordinator::new(
                repos.images,
                repos.membership.clone(),
                encoder,
                config,
            ),
            invalidation,
            groups: GroupService::new(repos.membership),
        }
    }

    /// Access the image service.
    pub const fn images(&self) -> &ImageService {
        &self.images
    }

    /// Access the encoding coordinator.
    pub const fn encoding(&self) -> &EncodingCoordinator {
        &self.encoding
    }

    /// Access the invalidation trigger.
    pub fn invalidation(&self) -> &InvalidationService {
        &self.invalidation
    }

    /// Access the group service.
    pub const fn groups(&self) -> &GroupService {
        &self.groups
    }
}
