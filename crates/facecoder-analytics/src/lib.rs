//! Client for the face analytics service.
//!
//! The service turns a batch of stored image routes into face embeddings,
//! one per route and in submission order. [`DefaultAnalyticsClient`]
//! implements `facecoder_core::EncodingServicePort` on top of reqwest;
//! everything else in this crate is an implementation detail.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultAnalyticsClient is meant to be used through EncodingServicePort,
// not through its generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultAnalyticsClient;

// Configuration
pub use config::{AnalyticsClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
