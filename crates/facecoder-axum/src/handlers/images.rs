//! Image handlers - registration and CRUD for image records.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;
use facecoder_core::{Image, ImageId, ImageRegistration, ImageUpdate, ProfileId};

/// Request body for registering an uploaded file.
#[derive(Debug, Deserialize)]
pub struct RegisterImageRequest {
    pub route: String,
}

/// List all images.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Image>>, HttpError> {
    Ok(Json(state.core.images().list().await?))
}

/// Get a single image by ID.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<Json<Image>, HttpError> {
    Ok(Json(state.core.images().get(id).await?))
}

/// Update the route and/or owner of an image.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
    Json(req): Json<ImageUpdate>,
) -> Result<Json<Image>, HttpError> {
    Ok(Json(state.core.images().update(id, req).await?))
}

/// Delete an image record.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<StatusCode, HttpError> {
    state.core.images().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the images of one profile.
pub async fn list_by_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<ProfileId>,
) -> Result<Json<Vec<Image>>, HttpError> {
    Ok(Json(state.core.images().list_by_profile(profile_id).await?))
}

/// Register an uploaded file for a profile.
///
/// The response carries the new record and the outcome of marking the
/// profile's groups stale.
pub async fn register(
    State(state): State<AppState>,
    Path(profile_id): Path<ProfileId>,
    Json(req): Json<RegisterImageRequest>,
) -> Result<(StatusCode, Json<ImageRegistration>), HttpError> {
    let registration = state.core.images().register(profile_id, &req.route).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}
