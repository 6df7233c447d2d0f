//! Canvas store: the ordered, authoritative sequence of canvas items.
//!
//! Order is insertion order, which doubles as recency and the baseline
//! stacking order. Items are matched by `image_url`. Every mutation that
//! changes anything bumps [`CanvasStore::revision`] exactly once, so a batch
//! (`add_items`, `apply_positions`) is observed as a single update.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use crate::geometry::Position;
use crate::item::{CanvasItem, ItemId};

/// Immutable copy of the store's items, safe to iterate while the store
/// keeps changing.
pub type Snapshot = Arc<[CanvasItem]>;

/// In-memory store of canvas items.
#[derive(Debug, Default)]
pub struct CanvasStore {
    items: Vec<CanvasItem>,
    revision: u64,
}

impl CanvasStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence, e.g. with rows loaded at startup.
    pub fn load(&mut self, items: Vec<CanvasItem>) {
        self.items = items;
        self.bump();
    }

    /// Append one item.
    pub fn add_item(&mut self, item: CanvasItem) {
        self.items.push(item);
        self.bump();
    }

    /// Append several items as one update.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = CanvasItem>) {
        let before = self.items.len();
        self.items.extend(items);
        if self.items.len() != before {
            self.bump();
        }
    }

    /// Remove every item whose `image_url` matches, returning the removed items
    /// in their original order.
    pub fn remove_item(&mut self, image_url: &str) -> Vec<CanvasItem> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.image_url == image_url);
        self.items = kept;
        if !removed.is_empty() {
            self.bump();
        }
        removed
    }

    /// Move every item whose `image_url` matches. Returns false (and changes
    /// nothing) if no item matches.
    pub fn update_position(&mut self, image_url: &str, position: Position) -> bool {
        let mut matched = false;
        for item in self.items.iter_mut().filter(|item| item.image_url == image_url) {
            item.position = position;
            matched = true;
        }
        if matched {
            self.bump();
        }
        matched
    }

    /// Substitute the first item whose `image_url` matches, keeping its slot.
    pub fn replace_item(&mut self, image_url: &str, replacement: CanvasItem) -> bool {
        let Some(slot) = self.items.iter_mut().find(|item| item.image_url == image_url) else {
            return false;
        };
        *slot = replacement;
        self.bump();
        true
    }

    /// Record the durable id returned by a completed save.
    ///
    /// Only the `id` field is touched, so positions changed while the save was
    /// in flight survive. The id lands on the first item with this URL that is
    /// either unsaved or already carries the same id; if the item was deleted
    /// in the meantime nothing happens.
    pub fn apply_saved_id(&mut self, image_url: &str, id: ItemId) -> bool {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.image_url == image_url && item.id.is_none_or(|current| current == id))
        else {
            return false;
        };
        if item.id == Some(id) {
            return true;
        }
        item.id = Some(id);
        self.bump();
        true
    }

    /// Overwrite positions index-by-index, as one update. Extra positions (or
    /// extra items) are ignored.
    pub fn apply_positions(&mut self, positions: &[Position]) {
        self.apply_positions_where(positions, |_| true);
    }

    /// Like [`CanvasStore::apply_positions`], but items rejected by `accept`
    /// keep their position. Returns how many items moved.
    pub fn apply_positions_where(&mut self, positions: &[Position], accept: impl Fn(&CanvasItem) -> bool) -> usize {
        let mut moved = 0;
        for (item, position) in self.items.iter_mut().zip(positions) {
            if accept(item) {
                item.position = *position;
                moved += 1;
            }
        }
        if moved > 0 {
            self.bump();
        }
        moved
    }

    /// Copy of the current sequence for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::from(self.items.as_slice())
    }

    /// First item with this `image_url`.
    #[must_use]
    pub fn get(&self, image_url: &str) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.image_url == image_url)
    }

    /// Items in order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasItem> {
        self.items.iter()
    }

    /// Borrow the items in order.
    #[must_use]
    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mutation counter; changes exactly once per applied mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
