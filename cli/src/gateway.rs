//! HTTP implementations of the canvas gateways, talking to the canvas server.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use canvas::consts::VARIATION_COUNT;
use canvas::gateway::{
    GenerationError, GenerationGateway, PersistenceError, PersistenceGateway, SaveOutcome, VariationError,
    take_variations,
};
use canvas::{CanvasItem, ItemId, Variation};

const REQUEST_TIMEOUT_SECS: u64 = 180;

#[derive(Deserialize)]
struct SaveResponse {
    id: ItemId,
    created: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct VariationsResponse {
    #[serde(default)]
    variations: Vec<Variation>,
}

/// A non-success reply, with whatever body the server sent.
#[derive(Debug)]
pub struct HttpFailure {
    pub status: StatusCode,
    pub body: String,
}

/// Both gateways over one `reqwest` client.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON reply. A 204 decodes from `null`.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Result<T, HttpFailure>, String> {
        let request = self.client.request(method, self.url(path));
        let request = if let Some(json) = body { request.json(&json) } else { request };
        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Ok(Err(HttpFailure { status, body: text }));
        }
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text)
            .map(Ok)
            .map_err(|e| format!("decode {path}: {e}"))
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for HttpGateway {
    async fn save(&self, item: &CanvasItem) -> Result<SaveOutcome, PersistenceError> {
        let body = serde_json::to_value(item).map_err(|e| PersistenceError::Decode(e.to_string()))?;
        let reply: SaveResponse = self
            .request(Method::POST, "/api/images", Some(body))
            .await
            .map_err(PersistenceError::Request)?
            .map_err(persistence_failure)?;
        Ok(if reply.created { SaveOutcome::Inserted(reply.id) } else { SaveOutcome::Updated(reply.id) })
    }

    async fn delete(&self, id: ItemId) -> Result<(), PersistenceError> {
        let result: Result<Value, HttpFailure> = self
            .request(Method::DELETE, &format!("/api/images/{id}"), None)
            .await
            .map_err(PersistenceError::Request)?;
        match result {
            Ok(_) => Ok(()),
            // Already gone.
            Err(failure) if failure.status == StatusCode::NOT_FOUND => Ok(()),
            Err(failure) => Err(persistence_failure(failure)),
        }
    }

    async fn load_all(&self) -> Result<Vec<CanvasItem>, PersistenceError> {
        self.request(Method::GET, "/api/images", None)
            .await
            .map_err(PersistenceError::Request)?
            .map_err(persistence_failure)
    }
}

#[async_trait::async_trait]
impl GenerationGateway for HttpGateway {
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        let reply: GenerateResponse = self
            .request(Method::POST, "/api/generate", Some(json!({ "prompt": prompt })))
            .await
            .map_err(GenerationError::Request)?
            .map_err(|f| GenerationError::Request(describe(&f)))?;
        reply
            .image_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(GenerationError::MissingImage)
    }

    async fn generate_variations(&self, prompt: &str) -> Result<[Variation; VARIATION_COUNT], VariationError> {
        let reply: VariationsResponse = self
            .request(Method::POST, "/api/variations", Some(json!({ "prompt": prompt })))
            .await
            .map_err(VariationError::Request)?
            .map_err(|f| VariationError::Request(describe(&f)))?;
        take_variations(reply.variations)
    }
}

fn persistence_failure(failure: HttpFailure) -> PersistenceError {
    tracing::debug!(status = failure.status.as_u16(), body = %failure.body, "storage request rejected");
    PersistenceError::Status { status: failure.status.as_u16() }
}

fn describe(failure: &HttpFailure) -> String {
    if failure.body.trim().is_empty() {
        format!("status {}", failure.status.as_u16())
    } else {
        format!("status {}: {}", failure.status.as_u16(), failure.body.trim())
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
