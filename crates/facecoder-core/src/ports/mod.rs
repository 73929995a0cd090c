//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repository traits are minimal and CRUD-focused
//! - The encoding service port is intent-based: one batch in, one batch out

pub mod encoding_service;
pub mod group_membership;
pub mod image_repository;

use std::sync::Arc;
use thiserror::Error;

pub use encoding_service::{EncodingServiceError, EncodingServicePort};
#[cfg(test)]
pub use encoding_service::MockEncodingServicePort;
pub use group_membership::GroupMembershipIndex;
pub use image_repository::ImageRepository;

/// Container for all repository trait objects.
///
/// Adapters obtain this from the storage crate's factory and hand it to
/// `AppCore`, so the core never depends on a concrete backend.
#[derive(Clone)]
pub struct Repos {
    /// Image registry.
    pub images: Arc<dyn ImageRepository>,
    /// Group membership queries.
    pub membership: Arc<dyn GroupMembershipIndex>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(images: Arc<dyn ImageRepository>, membership: Arc<dyn GroupMembershipIndex>) -> Self {
        Self { images, membership }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes, exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
