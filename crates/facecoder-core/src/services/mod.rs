//! Core services - the application's business logic layer.
//!
//! This module contains high-level service abstractions that orchestrate
//! between ports (trait interfaces) and domain logic. Services here are
//! pure orchestrators - they don't know about concrete implementations.

mod app_core;
mod encoding_coordinator;
mod group_service;
mod image_service;
mod invalidation;

#[cfg(test)]
mod test_support;

pub use app_core::AppCore;
pub use encoding_coordinator::{
    DEFAULT_PERSIST_TIMEOUT, EncodingCoordinator, EncodingCoordinatorConfig,
};
pub use group_service::GroupService;
pub use image_service::ImageService;
pub use invalidation::InvalidationService;
