//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use facecoder_core::{Embedding, GroupEmbedding, Image, RepositoryError};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Shared SELECT column list for image queries.
pub const IMAGE_SELECT_COLUMNS: &str = "id, profile_id, route, embedding, is_encoded, created_at";

/// Helper to parse datetime strings that may have "UTC" suffix.
pub fn parse_datetime(datetime_str: Option<String>) -> Option<DateTime<Utc>> {
    datetime_str.and_then(|s| {
        let trimmed = s.trim_end_matches(" UTC");
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
            .ok()
    })
}

/// Serialize an embedding into its JSON column representation.
pub fn embedding_to_json(embedding: &Embedding) -> Result<String, RepositoryError> {
    serde_json::to_string(embedding).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Parse the nullable JSON `embedding` column.
pub fn embedding_from_json(json: Option<String>) -> Result<Option<Embedding>, RepositoryError> {
    json.map(|s| {
        serde_json::from_str(&s).map_err(|e| RepositoryError::Serialization(e.to_string()))
    })
    .transpose()
}

/// Parse a database row into an Image.
pub fn row_to_image(row: &SqliteRow) -> Result<Image, RepositoryError> {
    let embedding_json: Option<String> = row
        .try_get("embedding")
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

    let created_at_str: Option<String> = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

    Ok(Image {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        profile_id: row
            .try_get("profile_id")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        route: row
            .try_get("route")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        embedding: embedding_from_json(embedding_json)?,
        is_encoded: row
            .try_get("is_encoded")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        created_at: parse_datetime(created_at_str).unwrap_or_else(Utc::now),
    })
}

/// Parse a group listing row (`id, profile_id, is_encoded, embedding`).
pub fn row_to_group_embedding(row: &SqliteRow) -> Result<GroupEmbedding, RepositoryError> {
    let embedding_json: Option<String> = row
        .try_get("embedding")
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

    Ok(GroupEmbedding {
        image_id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        profile_id: row
            .try_get("profile_id")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        is_encoded: row
            .try_get("is_encoded")
            .map_err(|e| RepositoryError::Storage(e.to_string()))?,
        embedding: embedding_from_json(embedding_json)?,
    })
}
