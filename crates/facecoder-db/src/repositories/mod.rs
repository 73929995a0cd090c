//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_group_membership;
mod sqlite_image_repository;

pub use sqlite_group_membership::SqliteGroupMembershipIndex;
pub use sqlite_image_repository::SqliteImageRepository;
