//! Durable image CRUD routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use canvas::{CanvasItem, ItemId, Position, SaveOutcome};

use crate::services::images::{self, ImageError, ImagePatch};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveResponse {
    pub id: ItemId,
    pub created: bool,
}

impl From<SaveOutcome> for SaveResponse {
    fn from(outcome: SaveOutcome) -> Self {
        Self { id: outcome.id(), created: matches!(outcome, SaveOutcome::Inserted(_)) }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageBody {
    pub prompt: Option<String>,
    pub position: Option<Position>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// `GET /api/images`: every stored item, oldest first.
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<CanvasItem>>, StatusCode> {
    let items = images::list_images(&state.pool)
        .await
        .map_err(image_error_to_status)?;
    Ok(Json(items))
}

/// `GET /api/images/{id}`: one stored item.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<CanvasItem>, StatusCode> {
    let item = images::get_image(&state.pool, id)
        .await
        .map_err(image_error_to_status)?;
    Ok(Json(item))
}

/// `POST /api/images`: create or update from a canvas item.
pub async fn save_image(
    State(state): State<AppState>,
    Json(item): Json<CanvasItem>,
) -> Result<(StatusCode, Json<SaveResponse>), StatusCode> {
    if item.image_url.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let outcome = images::save_image(&state.pool, &item)
        .await
        .map_err(image_error_to_status)?;
    let status = match outcome {
        SaveOutcome::Inserted(_) => StatusCode::CREATED,
        SaveOutcome::Updated(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into())))
}

/// `PUT /api/images/{id}`: update prompt and/or position.
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(body): Json<UpdateImageBody>,
) -> Result<Json<CanvasItem>, StatusCode> {
    let patch = ImagePatch { prompt: body.prompt, position: body.position };
    let item = images::update_image(&state.pool, id, patch)
        .await
        .map_err(image_error_to_status)?;
    Ok(Json(item))
}

/// `DELETE /api/images/{id}`: remove one row.
pub async fn delete_image(State(state): State<AppState>, Path(id): Path<ItemId>) -> Result<StatusCode, StatusCode> {
    images::delete_image(&state.pool, id)
        .await
        .map_err(image_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/images`: remove every row.
pub async fn clear_images(State(state): State<AppState>) -> Result<Json<ClearResponse>, StatusCode> {
    let deleted = images::clear_images(&state.pool)
        .await
        .map_err(image_error_to_status)?;
    Ok(Json(ClearResponse { deleted }))
}

pub(crate) fn image_error_to_status(err: ImageError) -> StatusCode {
    match err {
        ImageError::NotFound(_) => StatusCode::NOT_FOUND,
        ImageError::Database(e) => {
            tracing::error!(error = %e, "image query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
