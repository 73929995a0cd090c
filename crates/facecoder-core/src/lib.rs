//! Core domain types, ports and services for facecoder.
//!
//! The crate owns the encoding-state rules: which images need an embedding,
//! how one batch request to the analytics service is reconciled into
//! per-image records, and how a group's embeddings are invalidated when a
//! member profile gains an image. Storage and HTTP live in adapter crates
//! behind the traits in [`ports`].
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    BatchOutcome, ENCODED_MESSAGE, Embedding, GroupEmbedding, GroupId, GroupReset, Image,
    ImageEncodingOutcome, ImageFilter, ImageId, ImageRegistration, ImageUpdate,
    InvalidationOutcome, NewImage, ProfileId,
};
pub use paths::{PathError, data_root, database_path};
pub use ports::{
    CoreError, EncodingServiceError, EncodingServicePort, GroupMembershipIndex, ImageRepository,
    Repos, RepositoryError,
};
pub use services::{
    AppCore, EncodingCoordinator, EncodingCoordinatorConfig, GroupService, ImageService,
    InvalidationService,
};
