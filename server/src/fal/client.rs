//! HTTP client for fal.ai's synchronous run endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{FalConfig, FalError, IMAGE_EDGE_PX, ImageGenerator};

pub struct FalClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl FalClient {
    /// # Errors
    ///
    /// Returns [`FalError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: FalConfig) -> Result<Self, FalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FalError::HttpClientBuild(e.to_string()))?;
        let endpoint = format!("{}/{}", config.base_url, config.model);
        Ok(Self { http, api_key: config.api_key, endpoint })
    }

    /// Build from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, FalError> {
        Self::new(FalConfig::from_env()?)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ImageGenerator for FalClient {
    async fn generate(&self, prompt: &str) -> Result<String, FalError> {
        let body = RunRequest {
            prompt,
            image_size: ImageSize { width: IMAGE_EDGE_PX, height: IMAGE_EDGE_PX },
            num_images: 1,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| FalError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| FalError::Request(e.to_string()))?;
        if status != 200 {
            return Err(FalError::Response { status, body: text });
        }
        parse_run_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct RunRequest<'a> {
    prompt: &'a str,
    image_size: ImageSize,
    num_images: u32,
}

#[derive(Serialize)]
struct ImageSize {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RunResponse {
    #[serde(default)]
    images: Vec<RunImage>,
}

#[derive(Deserialize)]
struct RunImage {
    #[serde(default)]
    url: String,
}

/// Extract `images[0].url` from a run response.
pub(crate) fn parse_run_response(json_text: &str) -> Result<String, FalError> {
    let parsed: RunResponse = serde_json::from_str(json_text).map_err(|e| FalError::Parse(e.to_string()))?;
    parsed
        .images
        .into_iter()
        .next()
        .map(|image| image.url)
        .filter(|url| !url.trim().is_empty())
        .ok_or(FalError::MissingImage)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
