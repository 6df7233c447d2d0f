//! fal.ai: text-to-image generation.
//!
//! DESIGN
//! ======
//! The generation service depends on the [`ImageGenerator`] trait, so it can
//! be exercised with a mock; [`FalClient`] is the production implementation
//! calling the synchronous `fal-ai/flux/schnell` endpoint.

pub mod client;

use crate::config::parse_or;

pub use client::FalClient;

pub const DEFAULT_FAL_BASE_URL: &str = "https://fal.run";
pub const DEFAULT_FAL_MODEL: &str = "fal-ai/flux/schnell";
pub const DEFAULT_FAL_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Edge length requested for every generated image, matching the canvas tile.
pub const IMAGE_EDGE_PX: u32 = 200;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FalError {
    #[error("missing fal credentials: set FAL_KEY")]
    MissingKey,
    #[error("fal request failed: {0}")]
    Request(String),
    #[error("fal response error: status {status}")]
    Response { status: u16, body: String },
    #[error("fal response parse failed: {0}")]
    Parse(String),
    #[error("fal response contained no image url")]
    MissingImage,
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FalConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

impl FalConfig {
    /// - `FAL_KEY` (or the older `FAL_AI_KEY`): required
    /// - `FAL_BASE_URL`: default `https://fal.run`
    /// - `FAL_MODEL`: default `fal-ai/flux/schnell`
    /// - `FAL_REQUEST_TIMEOUT_SECS`: default 120
    ///
    /// # Errors
    ///
    /// Returns [`FalError::MissingKey`] when no key is set.
    pub fn from_env() -> Result<Self, FalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`FalConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FalError> {
        let api_key = lookup("FAL_KEY")
            .or_else(|| lookup("FAL_AI_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or(FalError::MissingKey)?;
        let base_url = lookup("FAL_BASE_URL")
            .unwrap_or_else(|| DEFAULT_FAL_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = lookup("FAL_MODEL")
            .unwrap_or_else(|| DEFAULT_FAL_MODEL.to_string())
            .trim_matches('/')
            .to_string();
        let request_timeout_secs = parse_or(lookup("FAL_REQUEST_TIMEOUT_SECS"), DEFAULT_FAL_REQUEST_TIMEOUT_SECS);
        Ok(Self { api_key, base_url, model, request_timeout_secs })
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Prompt-to-image capability. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and return its URL.
    ///
    /// # Errors
    ///
    /// Returns a [`FalError`] if the call fails or yields no image.
    async fn generate(&self, prompt: &str) -> Result<String, FalError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
