//! Encoding handlers.
//!
//! A failed batch call is not an `HttpError`: the `BatchOutcome` body is
//! returned as-is with `503` so clients see the same `status`-tagged shape
//! for both results.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;
use facecoder_core::{BatchOutcome, GroupId, ImageId};

/// Request body for `POST /api/images/encode`.
#[derive(Debug, Deserialize)]
pub struct EncodeRequest {
    pub images_ids: Vec<ImageId>,
}

fn outcome_response(outcome: BatchOutcome) -> Response {
    let status = if outcome.is_completed() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(outcome)).into_response()
}

/// Encode the given images in one batch.
pub async fn encode(
    State(state): State<AppState>,
    Json(req): Json<EncodeRequest>,
) -> Result<Response, HttpError> {
    let outcome = state.core.encoding().request_encoding(&req.images_ids).await?;
    Ok(outcome_response(outcome))
}

/// Encode every image of the group that is not currently encoded.
pub async fn refresh_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<Response, HttpError> {
    let outcome = state.core.encoding().refresh_group(group_id).await?;
    Ok(outcome_response(outcome))
}
