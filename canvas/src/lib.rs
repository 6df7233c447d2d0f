//! Layout and positioning engine for a canvas of AI-generated images.
//!
//! The crate owns the in-memory canvas: which images are on it, where each
//! one sits, how pointer gestures move them, and where new images land. It
//! does no I/O of its own. Durable storage and image generation are reached
//! through the collaborator traits in [`gateway`], injected by the host (the
//! HTTP CLI, or fakes in tests).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`workspace`] | Session owner tying store, drags and gateways together |
//! | [`store`] | Ordered item collection with identity-based updates |
//! | [`item`] | `CanvasItem` and `Variation` value types |
//! | [`layout`] | Pure placement: grid, variation slots, duplicates |
//! | [`drag`] | Per-item drag and hover state machine |
//! | [`geometry`] | Positions, bounds and clamping |
//! | [`gateway`] | Persistence and generation traits and their errors |
//! | [`consts`] | Tile size, spawn point and layout constants |

pub mod consts;
pub mod drag;
pub mod gateway;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod store;
pub mod workspace;

pub use gateway::{GenerationGateway, PersistenceGateway, SaveOutcome};
pub use geometry::{Bounds, Position};
pub use item::{CanvasItem, ItemId, Variation};
pub use store::CanvasStore;
pub use workspace::{PersistenceEvent, Workspace, WorkspaceError};
