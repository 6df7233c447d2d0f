//! Collaborator contracts: durable storage and image generation.
//!
//! The canvas core never talks to the network itself. The host injects
//! implementations of these traits (HTTP clients in the CLI, in-memory fakes
//! in tests) into a [`crate::workspace::Workspace`].

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use crate::consts::VARIATION_COUNT;
use crate::item::{CanvasItem, ItemId, Variation};

// =============================================================================
// ERRORS
// =============================================================================

/// Upstream image generation failed or returned nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generation response had no image url")]
    MissingImage,
}

/// Variations could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariationError {
    #[error("variation request failed: {0}")]
    Request(String),
    #[error("expected 4 variations, got {0}")]
    TooFew(usize),
    #[error("origin image no longer on canvas: {0}")]
    OriginMissing(String),
}

/// Durable storage could not be reached or refused the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("storage returned status {status}")]
    Status { status: u16 },
    #[error("storage response malformed: {0}")]
    Decode(String),
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// What a save did to durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was created.
    Inserted(ItemId),
    /// An existing row (matched by id, or by image url) was updated.
    Updated(ItemId),
}

impl SaveOutcome {
    /// The row the item now maps to.
    #[must_use]
    pub fn id(self) -> ItemId {
        match self {
            Self::Inserted(id) | Self::Updated(id) => id,
        }
    }
}

/// Durable CRUD for canvas items.
#[async_trait::async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Write an item. With an `id` the row with that id is updated. Without
    /// one, an existing row with the same `image_url` is updated, otherwise a
    /// row is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if storage is unreachable or refuses the write.
    async fn save(&self, item: &CanvasItem) -> Result<SaveOutcome, PersistenceError>;

    /// Remove a row.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if storage is unreachable or refuses the delete.
    async fn delete(&self, id: ItemId) -> Result<(), PersistenceError>;

    /// Every stored item, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if storage is unreachable.
    async fn load_all(&self) -> Result<Vec<CanvasItem>, PersistenceError>;
}

// =============================================================================
// GENERATION
// =============================================================================

/// Prompt-to-image and prompt-to-variations capabilities.
#[async_trait::async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate one image and return its reference.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if the upstream call fails or yields no image.
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Generate exactly four variations, ordered left, right, top, bottom.
    ///
    /// # Errors
    ///
    /// Returns [`VariationError`] if fewer than four valid results are obtainable.
    async fn generate_variations(&self, prompt: &str) -> Result<[Variation; VARIATION_COUNT], VariationError>;
}

/// Validate a gateway's raw variation list into the fixed four slots.
///
/// Entries with a blank prompt or image are dropped; the first four valid
/// ones are kept in order.
///
/// # Errors
///
/// Returns [`VariationError::TooFew`] when fewer than four entries survive.
pub fn take_variations(raw: Vec<Variation>) -> Result<[Variation; VARIATION_COUNT], VariationError> {
    let valid: Vec<Variation> = raw
        .into_iter()
        .filter(|v| !v.prompt.trim().is_empty() && !v.image_url.trim().is_empty())
        .map(|v| Variation::new(v.prompt.trim(), v.image_url.trim()))
        .take(VARIATION_COUNT)
        .collect();
    let count = valid.len();
    valid.try_into().map_err(|_| VariationError::TooFew(count))
}
