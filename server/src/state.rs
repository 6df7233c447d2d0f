//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the two optional generation collaborators.
//! Either collaborator may be absent when its credentials are not configured;
//! the routes that need it then answer 503 instead of the server refusing to
//! start.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::fal::ImageGenerator;
use crate::llm::LlmChat;

/// Shared application state, injected into Axum handlers via State extractor.
/// Cheap to clone: every field is a pool handle or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Text-to-image client. `None` if fal credentials are not configured.
    pub images: Option<Arc<dyn ImageGenerator>>,
    /// Prompt paraphraser for variations. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: SqlitePool, images: Option<Arc<dyn ImageGenerator>>, llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { pool, images, llm }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
