//! Canvas items: a generated image, its prompt, and where it sits.
//!
//! Items are identified by `image_url` rather than `id`: locally generated
//! images have no durable row yet, and a duplicate deliberately drops the
//! source's `id` so saving it can never overwrite the original's row.

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use serde::{Deserialize, Serialize};

use crate::consts::{SPAWN_X, SPAWN_Y};
use crate::geometry::Position;
use crate::layout;

/// Durable row key assigned by the persistence layer.
pub type ItemId = i64;

/// An image on the canvas, as rendered and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasItem {
    /// Present once the item has a durable row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Text the image was generated from.
    pub prompt: String,
    /// Opaque image reference (URL or data URI). Never changes once set.
    pub image_url: String,
    /// Top-left corner of the tile on the canvas.
    pub position: Position,
}

impl CanvasItem {
    /// A fresh, unsaved item.
    #[must_use]
    pub fn new(prompt: impl Into<String>, image_url: impl Into<String>, position: Position) -> Self {
        Self { id: None, prompt: prompt.into(), image_url: image_url.into(), position }
    }

    /// A freshly generated item at the default spawn point.
    #[must_use]
    pub fn spawned(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self::new(prompt, image_url, Position::new(SPAWN_X, SPAWN_Y))
    }

    /// Builder-style durable id, used when hydrating from storage.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether the item has a durable row.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// A copy of this item nudged by the duplicate offset, with `id` cleared.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: None,
            prompt: self.prompt.clone(),
            image_url: self.image_url.clone(),
            position: layout::duplicate_position(self.position),
        }
    }
}

/// A variation returned by the generation gateway: a paraphrased prompt and
/// the image generated from it. Positions are assigned by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub prompt: String,
    pub image_url: String,
}

impl Variation {
    #[must_use]
    pub fn new(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), image_url: image_url.into() }
    }

    /// Place this variation on the canvas.
    #[must_use]
    pub fn into_item(self, position: Position) -> CanvasItem {
        CanvasItem::new(self.prompt, self.image_url, position)
    }
}
