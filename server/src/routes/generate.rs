//! Generation proxy routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use canvas::Variation;

use crate::services::generation::{self, GenerateError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VariationsResponse {
    pub variations: Vec<Variation>,
}

/// `POST /api/generate`: one image for a prompt.
pub async fn generate_image(
    State(state): State<AppState>,
    Json(body): Json<PromptBody>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let image_url = generation::generate_image(&state, &body.prompt)
        .await
        .map_err(generate_error_to_status)?;
    Ok(Json(GenerateResponse { image_url }))
}

/// `POST /api/variations`: four variations, ordered left, right, top, bottom.
pub async fn generate_variations(
    State(state): State<AppState>,
    Json(body): Json<PromptBody>,
) -> Result<Json<VariationsResponse>, StatusCode> {
    let variations = generation::generate_variations(&state, &body.prompt)
        .await
        .map_err(generate_error_to_status)?;
    Ok(Json(VariationsResponse { variations: variations.into() }))
}

pub(crate) fn generate_error_to_status(err: GenerateError) -> StatusCode {
    match err {
        GenerateError::EmptyPrompt => StatusCode::BAD_REQUEST,
        GenerateError::ImagesUnavailable | GenerateError::LlmUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        GenerateError::Fal(_)
        | GenerateError::Llm(_)
        | GenerateError::MalformedPrompts(_)
        | GenerateError::Variation(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
