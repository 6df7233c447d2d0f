//! Per-item drag state machine.
//!
//! A `DragController` tracks one tile between pointer-down and pointer-up.
//! Every pointer-move yields the new clamped position, which the caller writes
//! straight into the store, so the rendered tile and the store never diverge
//! mid-drag. While a drag is active the controller refuses positions pushed
//! from outside (e.g. a grid re-layout) so it never fights the pointer.
//! Hover is tracked separately and has no effect on layout.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::consts::ITEM_SIZE;
use crate::geometry::{Bounds, Position, item_contains};

/// Active gesture for one item.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The user is moving the item.
    Dragging {
        /// Pointer position at pointer-down.
        start_pointer: Position,
        /// Item position at pointer-down.
        start_position: Position,
        /// Container the item must stay inside.
        bounds: Bounds,
    },
}

/// Drag and hover state for a single canvas item.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    hovered: bool,
    position: Position,
    item_size: f64,
}

impl DragController {
    /// Controller for an item currently shown at `position`.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self::with_item_size(position, ITEM_SIZE)
    }

    /// Controller for an item of a non-default tile size.
    #[must_use]
    pub fn with_item_size(position: Position, item_size: f64) -> Self {
        Self { state: DragState::Idle, hovered: false, position, item_size }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Position the tile is currently drawn at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// CSS cursor for the tile.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        if self.is_dragging() { "grabbing" } else { "grab" }
    }

    /// Begin a drag if `pointer` lands on the tile. Returns whether a drag started.
    pub fn pointer_down(&mut self, pointer: Position, bounds: Bounds) -> bool {
        if self.is_dragging() || !item_contains(self.position, self.item_size, pointer) {
            return false;
        }
        self.state = DragState::Dragging { start_pointer: pointer, start_position: self.position, bounds };
        true
    }

    /// Follow the pointer. Returns the new position while dragging, `None` otherwise.
    pub fn pointer_move(&mut self, pointer: Position) -> Option<Position> {
        let DragState::Dragging { start_pointer, start_position, bounds } = self.state else {
            return None;
        };
        let (dx, dy) = pointer.delta_from(start_pointer);
        self.position = bounds.clamp_item(start_position.offset(dx, dy), self.item_size);
        Some(self.position)
    }

    /// End the drag. The last reported position is already in the store.
    /// Returns the final position if a drag was active.
    pub fn pointer_up(&mut self) -> Option<Position> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        Some(self.position)
    }

    /// Abort the drag the same way a release does; moves already reported stand.
    pub fn pointer_cancel(&mut self) -> Option<Position> {
        self.pointer_up()
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    /// Accept a position decided elsewhere. Ignored mid-drag; returns whether
    /// it was applied.
    pub fn sync_external(&mut self, position: Position) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.position = position;
        true
    }
}
