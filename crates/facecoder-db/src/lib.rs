//! `SQLite` storage for facecoder.
//!
//! Implements the image registry and group membership ports from
//! `facecoder-core` on top of `sqlx`. Group membership is answered with
//! joins over `relations`, so there is no cached index to keep in sync.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Linked for the bundled SQLite build only.
use libsqlite3_sys as _;

pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export factory for convenient access
pub use factory::CoreFactory;

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

// Re-export repository implementations
pub use repositories::{SqliteGroupMembershipIndex, SqliteImageRepository};

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
