//! Generation service: prompt to image, prompt to four variations.
//!
//! DESIGN
//! ======
//! Image generation is a thin pass-through to the [`ImageGenerator`].
//! Variations take two steps: the LLM is asked for a JSON object
//! `{"prompts": [...]}` holding four paraphrases of the original prompt, then
//! the four images are generated concurrently. Anything short of four usable
//! prompt/image pairs fails the whole request; partial results are never
//! returned.

use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{info, warn};

use canvas::Variation;
use canvas::consts::VARIATION_COUNT;
use canvas::gateway::{VariationError, take_variations};

use crate::fal::{FalError, ImageGenerator};
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message, ResponseFormat};
use crate::state::AppState;

const VARIATION_MAX_TOKENS: u32 = 400;

const VARIATION_SYSTEM_PROMPT: &str = "You write prompts for a text-to-image model. \
Respond with a single JSON object of the form {\"prompts\": [\"...\", \"...\", \"...\", \"...\"]} \
containing exactly four prompts and nothing else.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("image generation is not configured")]
    ImagesUnavailable,
    #[error("variation prompts are not configured")]
    LlmUnavailable,
    #[error(transparent)]
    Fal(#[from] FalError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("variation prompts malformed: {0}")]
    MalformedPrompts(String),
    #[error(transparent)]
    Variation(#[from] VariationError),
}

#[derive(Deserialize)]
struct PromptList {
    prompts: Vec<String>,
}

// =============================================================================
// IMAGE
// =============================================================================

/// Generate one image for `prompt` and return its URL.
///
/// # Errors
///
/// `EmptyPrompt`, `ImagesUnavailable`, or the upstream failure.
pub async fn generate_image(state: &AppState, prompt: &str) -> Result<String, GenerateError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerateError::EmptyPrompt);
    }
    let images = state.images.as_deref().ok_or(GenerateError::ImagesUnavailable)?;
    let url = images
        .generate(prompt)
        .await
        .inspect_err(|e| warn!(error = %e, "image generation failed"))?;
    info!(%prompt, %url, "image generated");
    Ok(url)
}

// =============================================================================
// VARIATIONS
// =============================================================================

/// Produce four paraphrases of `prompt` and an image for each, in slot order.
///
/// # Errors
///
/// `EmptyPrompt`, `ImagesUnavailable`/`LlmUnavailable`, a malformed or short
/// prompt list, or any upstream failure.
pub async fn generate_variations(state: &AppState, prompt: &str) -> Result<[Variation; VARIATION_COUNT], GenerateError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerateError::EmptyPrompt);
    }
    let images = state.images.as_deref().ok_or(GenerateError::ImagesUnavailable)?;
    let llm = state.llm.as_deref().ok_or(GenerateError::LlmUnavailable)?;

    let prompts = variation_prompts(llm, prompt).await?;
    let urls = render_all(images, &prompts).await?;
    let variations = prompts
        .into_iter()
        .zip(urls)
        .map(|(prompt, url)| Variation::new(prompt, url))
        .collect();
    let variations = take_variations(variations)?;
    info!(%prompt, "variations generated");
    Ok(variations)
}

/// Ask the LLM for exactly four paraphrases of `prompt`.
///
/// # Errors
///
/// `Llm` if the call fails, `MalformedPrompts` if the reply is not the
/// expected JSON object, `Variation(TooFew)` if fewer than four survive.
pub async fn variation_prompts(llm: &dyn LlmChat, prompt: &str) -> Result<Vec<String>, GenerateError> {
    let request = format!(
        "Generate 4 slight variations of this image prompt, keeping the same general theme \
         with small changes. Original prompt: \"{prompt}\""
    );
    let response = llm
        .chat(VARIATION_MAX_TOKENS, VARIATION_SYSTEM_PROMPT, &[Message::user(request)], ResponseFormat::JsonObject)
        .await
        .inspect_err(|e| warn!(error = %e, retryable = e.retryable(), "variation prompt request failed"))?;
    parse_prompt_list(&response.text())
}

/// Validate a `{"prompts": [...]}` reply into four trimmed, non-empty prompts.
pub(crate) fn parse_prompt_list(text: &str) -> Result<Vec<String>, GenerateError> {
    let list: PromptList =
        serde_json::from_str(text.trim()).map_err(|e| GenerateError::MalformedPrompts(e.to_string()))?;
    let prompts: Vec<String> = list
        .prompts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .take(VARIATION_COUNT)
        .map(str::to_owned)
        .collect();
    if prompts.len() < VARIATION_COUNT {
        return Err(VariationError::TooFew(prompts.len()).into());
    }
    Ok(prompts)
}

async fn render_all(images: &dyn ImageGenerator, prompts: &[String]) -> Result<Vec<String>, GenerateError> {
    let urls = try_join_all(prompts.iter().map(|p| images.generate(p)))
        .await
        .inspect_err(|e| warn!(error = %e, "variation image generation failed"))?;
    Ok(urls)
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;
