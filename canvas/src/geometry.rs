#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point on the canvas plane. Unbounded; containers clip, the model does not.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Vector from `origin` to `self`.
    #[must_use]
    pub fn delta_from(self, origin: Self) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let (dx, dy) = self.delta_from(other);
        dx.hypot(dy)
    }
}

/// The visible canvas container an item is dragged within.
///
/// The container's origin is the canvas origin; `width`/`height` are in
/// canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp the top-left corner of a square item of `item_size` so the whole
    /// item stays inside the container. A container narrower or shorter than
    /// the item pins that axis to 0.
    #[must_use]
    pub fn clamp_item(&self, position: Position, item_size: f64) -> Position {
        let max_x = (self.width - item_size).max(0.0);
        let max_y = (self.height - item_size).max(0.0);
        Position { x: position.x.clamp(0.0, max_x), y: position.y.clamp(0.0, max_y) }
    }
}

/// Whether `pointer` falls inside the square item anchored at `origin`.
#[must_use]
pub fn item_contains(origin: Position, item_size: f64, pointer: Position) -> bool {
    pointer.x >= origin.x
        && pointer.x <= origin.x + item_size
        && pointer.y >= origin.y
        && pointer.y <= origin.y + item_size
}
