//! Layout engine: pure position computations for canvas items.
//!
//! Nothing here reads or writes the store. Callers pass the current item
//! order in and apply the returned positions through the store's mutation
//! path, which keeps every function trivially testable and deterministic.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{DUPLICATE_OFFSET, GRID_GAP, GRID_RESERVED_TOP, ITEM_SIZE, VARIATION_COUNT, VARIATION_GAP};
use crate::geometry::Position;
use crate::item::CanvasItem;

// =============================================================================
// GRID
// =============================================================================

/// Geometry for [`arrange_grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    /// Edge length of one square cell's content.
    pub item_size: f64,
    /// Space between cells and around the grid.
    pub gap: f64,
    /// Height of the band above the grid that stays free.
    pub reserved_top: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self { item_size: ITEM_SIZE, gap: GRID_GAP, reserved_top: GRID_RESERVED_TOP }
    }
}

impl GridParams {
    /// Distance between the origins of two adjacent cells.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.item_size + self.gap
    }
}

/// Result of a grid arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct GridArrangement {
    /// New position for each input item, index-aligned with the input.
    pub positions: Vec<Position>,
    /// Number of columns used (always at least 1).
    pub columns: usize,
    /// Number of rows used.
    pub rows: usize,
    /// Container height needed to show every row below the reserved band.
    pub container_height: f64,
}

/// Column count for a viewport. Never zero: a viewport narrower than one
/// cell (or a non-finite width) still gets a single column.
#[must_use]
pub fn grid_columns(viewport_width: f64, params: GridParams) -> usize {
    let raw = ((viewport_width - 2.0 * params.gap) / params.pitch()).floor();
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let columns = raw as usize;
    columns
}

/// Top-left corner of the cell at `index` in a row-major grid.
#[must_use]
pub fn grid_cell(index: usize, columns: usize, params: GridParams) -> Position {
    let columns = columns.max(1);
    let row = index / columns;
    let col = index % columns;
    #[allow(clippy::cast_precision_loss)]
    let (row, col) = (row as f64, col as f64);
    Position {
        x: col * params.pitch() + params.gap,
        y: params.reserved_top + row * params.pitch() + params.gap,
    }
}

/// Pack `items` into a row-major grid in their current order.
///
/// Prior positions are ignored entirely, so the result depends only on the
/// item count, the viewport width and `params`.
#[must_use]
pub fn arrange_grid(items: &[CanvasItem], viewport_width: f64, params: GridParams) -> GridArrangement {
    let columns = grid_columns(viewport_width, params);
    let positions = (0..items.len())
        .map(|index| grid_cell(index, columns, params))
        .collect();
    let rows = items.len().div_ceil(columns);
    #[allow(clippy::cast_precision_loss)]
    let container_height = rows as f64 * params.pitch() + params.reserved_top;
    GridArrangement { positions, columns, rows, container_height }
}

// =============================================================================
// VARIATIONS
// =============================================================================

/// Geometry for [`place_variations`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationParams {
    pub item_size: f64,
    pub gap: f64,
}

impl Default for VariationParams {
    fn default() -> Self {
        Self { item_size: ITEM_SIZE, gap: VARIATION_GAP }
    }
}

/// Unit directions for the variation slots: left, right, top, bottom.
///
/// Slots are filled by index. Callers must supply variations in this order.
const VARIATION_SLOTS: [(f64, f64); VARIATION_COUNT] = [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)];

/// Four positions around `origin`, one tile plus a gap away on each side.
///
/// Overlap with existing items is not checked.
#[must_use]
pub fn place_variations(origin: Position, params: VariationParams) -> [Position; VARIATION_COUNT] {
    let step = params.item_size + params.gap;
    VARIATION_SLOTS.map(|(dx, dy)| origin.offset(dx * step, dy * step))
}

// =============================================================================
// DUPLICATES
// =============================================================================

/// Where a duplicate of an item at `source` is placed.
#[must_use]
pub fn duplicate_position(source: Position) -> Position {
    source.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET)
}
