//! LLM: chat completions adapter used to paraphrase prompts for variations.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables (see [`LlmConfig`]).
//! Callers depend on the [`LlmChat`] trait so the variation service can be
//! tested with a mock; [`LlmClient`] is the production implementation over
//! any OpenAI-compatible `/chat/completions` endpoint.

pub mod config;
pub mod openai;
pub mod types;

pub use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message, ResponseFormat};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client. Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gpt-3.5-turbo"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
        format: ResponseFormat,
    ) -> Result<ChatResponse, LlmError> {
        self.inner
            .chat(&self.model, max_tokens, system, messages, format)
            .await
    }
}
