//! Shared numeric constants for the canvas crate.

// ── Items ───────────────────────────────────────────────────────

/// Edge length of a rendered image tile, in canvas pixels.
pub const ITEM_SIZE: f64 = 200.0;

/// Where a freshly generated image lands before the user moves it.
pub const SPAWN_X: f64 = 50.0;
pub const SPAWN_Y: f64 = 50.0;

/// Offset applied to a duplicate relative to its source, on both axes.
pub const DUPLICATE_OFFSET: f64 = 20.0;

// ── Grid layout ─────────────────────────────────────────────────

/// Gap between grid cells and around the grid edge.
pub const GRID_GAP: f64 = 10.0;

/// Vertical band above the grid kept free for the prompt bar and loose items.
pub const GRID_RESERVED_TOP: f64 = 700.0;

// ── Variations ──────────────────────────────────────────────────

/// Gap between an origin image and each of its variations.
pub const VARIATION_GAP: f64 = 20.0;

/// Number of variations produced per request (left, right, top, bottom).
pub const VARIATION_COUNT: usize = 4;
