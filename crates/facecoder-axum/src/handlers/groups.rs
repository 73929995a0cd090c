//! Group read-model handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::error::HttpError;
use crate::state::AppState;
use facecoder_core::{GroupEmbedding, GroupId, ProfileId};

/// Stored embeddings of every image in the group, stale ones included.
pub async fn embeddings(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Vec<GroupEmbedding>>, HttpError> {
    Ok(Json(state.core.encoding().embeddings_for_group(group_id).await?))
}

/// Profiles related to the group.
pub async fn profiles(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Vec<ProfileId>>, HttpError> {
    Ok(Json(state.core.groups().profiles(group_id).await?))
}
