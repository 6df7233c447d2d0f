//! Workspace: the UI-facing owner of a canvas session.
//!
//! DESIGN
//! ======
//! A `Workspace` owns the [`CanvasStore`], one [`DragController`] per touched
//! item, the viewport geometry and every outstanding gateway call. All of it
//! is mutated through `&mut self` on a single task; gateway calls run as
//! spawned tokio tasks and their results are folded back in only through
//! [`Workspace::poll_generation`] / [`Workspace::finish_generation`] and
//! [`Workspace::pump_persistence`] / [`Workspace::flush_persistence`].
//!
//! Mutations are optimistic: the store changes first, persistence follows
//! and is never rolled back. A completed save only contributes its row id.
//!
//! Must be used from inside a tokio runtime. Dropping a workspace aborts
//! persistence calls that have not completed; call `flush_persistence` first
//! when that matters.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::consts::VARIATION_COUNT;
use crate::drag::{DragController, DragState};
use crate::gateway::{
    GenerationError, GenerationGateway, PersistenceError, PersistenceGateway, SaveOutcome, VariationError,
};
use crate::geometry::{Bounds, Position};
use crate::item::{CanvasItem, ItemId, Variation};
use crate::layout::{self, GridArrangement, GridParams, VariationParams};
use crate::store::{CanvasStore, Snapshot};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("a generation request is already in flight")]
    Busy,
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("no item with image url {0}")]
    UnknownItem(String),
    #[error("no generation request in flight")]
    NoRequestInFlight,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Variation(#[from] VariationError),
    #[error("generation task failed: {0}")]
    Task(String),
}

/// A completed persistence call, as applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceEvent {
    Saved { image_url: String, result: Result<SaveOutcome, PersistenceError> },
    Deleted { id: ItemId, result: Result<(), PersistenceError> },
}

enum GenerationOutcome {
    Image { prompt: String, result: Result<String, GenerationError> },
    Variations { origin_url: String, result: Result<[Variation; VARIATION_COUNT], VariationError> },
}

// =============================================================================
// WORKSPACE
// =============================================================================

pub struct Workspace {
    store: CanvasStore,
    drags: HashMap<String, DragController>,
    persistence: Arc<dyn PersistenceGateway>,
    generation: Arc<dyn GenerationGateway>,
    viewport: Bounds,
    grid_height: f64,
    grid: GridParams,
    variations: VariationParams,
    in_flight: Option<JoinHandle<GenerationOutcome>>,
    persistence_tasks: JoinSet<PersistenceEvent>,
    /// Rows repositioned by the last grid arrangement, saved on `layout_settled`.
    settling: Vec<ItemId>,
}

impl Workspace {
    #[must_use]
    pub fn new(persistence: Arc<dyn PersistenceGateway>, generation: Arc<dyn GenerationGateway>) -> Self {
        Self {
            store: CanvasStore::new(),
            drags: HashMap::new(),
            persistence,
            generation,
            viewport: Bounds::new(0.0, 0.0),
            grid_height: 0.0,
            grid: GridParams::default(),
            variations: VariationParams::default(),
            in_flight: None,
            persistence_tasks: JoinSet::new(),
            settling: Vec::new(),
        }
    }

    /// Override the tile geometry used for grids and variations.
    #[must_use]
    pub fn with_layout(mut self, grid: GridParams, variations: VariationParams) -> Self {
        self.grid = grid;
        self.variations = variations;
        self
    }

    // --- Startup ---

    /// Seed the store from durable storage. A failed load leaves an empty
    /// canvas. Returns the number of items loaded.
    pub async fn load(&mut self) -> usize {
        let items = match self.persistence.load_all().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "could not load saved canvas; starting empty");
                Vec::new()
            }
        };
        let count = items.len();
        self.store.load(items);
        self.drags.clear();
        info!(count, "canvas loaded");
        count
    }

    // --- Viewport ---

    /// Record the visible viewport size in canvas pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Bounds::new(width, height);
    }

    #[must_use]
    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    /// Height of the scrollable canvas: the viewport, grown to fit the last
    /// grid and the lowest item.
    #[must_use]
    pub fn container_height(&self) -> f64 {
        let item_size = self.grid.item_size;
        let content = self
            .store
            .iter()
            .map(|item| item.position.y + item_size)
            .fold(0.0, f64::max);
        self.viewport.height.max(self.grid_height).max(content)
    }

    fn container_bounds(&self) -> Bounds {
        Bounds::new(self.viewport.width, self.container_height())
    }

    // --- Generation ---

    /// Whether a generation or variation request is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kick off image generation for `prompt`.
    ///
    /// # Errors
    ///
    /// `Busy` while another request is in flight, `EmptyPrompt` for a blank prompt.
    pub fn start_generation(&mut self, prompt: &str) -> Result<(), WorkspaceError> {
        if self.is_busy() {
            return Err(WorkspaceError::Busy);
        }
        if prompt.trim().is_empty() {
            return Err(WorkspaceError::EmptyPrompt);
        }
        let gateway = Arc::clone(&self.generation);
        let prompt = prompt.to_owned();
        info!(%prompt, "image generation requested");
        self.in_flight = Some(tokio::spawn(async move {
            let result = gateway.generate_image(&prompt).await;
            GenerationOutcome::Image { prompt, result }
        }));
        Ok(())
    }

    /// Kick off variations of the item showing `image_url`.
    ///
    /// # Errors
    ///
    /// `Busy` while another request is in flight, `UnknownItem` if no item
    /// shows that image.
    pub fn start_variations(&mut self, image_url: &str) -> Result<(), WorkspaceError> {
        if self.is_busy() {
            return Err(WorkspaceError::Busy);
        }
        let origin = self
            .store
            .get(image_url)
            .ok_or_else(|| WorkspaceError::UnknownItem(image_url.to_owned()))?;
        let prompt = origin.prompt.clone();
        let origin_url = origin.image_url.clone();
        let gateway = Arc::clone(&self.generation);
        info!(%prompt, %origin_url, "variations requested");
        self.in_flight = Some(tokio::spawn(async move {
            let result = gateway.generate_variations(&prompt).await;
            GenerationOutcome::Variations { origin_url, result }
        }));
        Ok(())
    }

    /// Apply the outstanding request if it has finished, without waiting.
    /// Returns `None` while it is still running (or nothing is in flight).
    pub fn poll_generation(&mut self) -> Option<Result<Vec<CanvasItem>, WorkspaceError>> {
        let handle = self.in_flight.take()?;
        if !handle.is_finished() {
            self.in_flight = Some(handle);
            return None;
        }
        let mut handle = handle;
        match (&mut handle).now_or_never() {
            Some(joined) => Some(self.apply_generation(joined)),
            None => {
                self.in_flight = Some(handle);
                None
            }
        }
    }

    /// Wait for the outstanding request and apply it. The busy flag is
    /// cleared whatever the outcome; on failure the store is left unchanged.
    ///
    /// # Errors
    ///
    /// `NoRequestInFlight`, or the generation/variation failure.
    pub async fn finish_generation(&mut self) -> Result<Vec<CanvasItem>, WorkspaceError> {
        let handle = self.in_flight.take().ok_or(WorkspaceError::NoRequestInFlight)?;
        let joined = handle.await;
        self.apply_generation(joined)
    }

    /// Generate an image for `prompt` and place it at the spawn point.
    ///
    /// # Errors
    ///
    /// See [`Workspace::start_generation`] and [`Workspace::finish_generation`].
    pub async fn generate(&mut self, prompt: &str) -> Result<CanvasItem, WorkspaceError> {
        self.start_generation(prompt)?;
        let mut added = self.finish_generation().await?;
        added.pop().ok_or(WorkspaceError::Generation(GenerationError::MissingImage))
    }

    /// Generate four variations of the item at `image_url` and place them around it.
    ///
    /// # Errors
    ///
    /// See [`Workspace::start_variations`] and [`Workspace::finish_generation`].
    pub async fn generate_variations(&mut self, image_url: &str) -> Result<Vec<CanvasItem>, WorkspaceError> {
        self.start_variations(image_url)?;
        self.finish_generation().await
    }

    fn apply_generation(
        &mut self,
        joined: Result<GenerationOutcome, JoinError>,
    ) -> Result<Vec<CanvasItem>, WorkspaceError> {
        let outcome = joined.map_err(|e| {
            warn!(error = %e, "generation task did not complete");
            WorkspaceError::Task(e.to_string())
        })?;

        match outcome {
            GenerationOutcome::Image { prompt, result } => {
                let image_url = result.inspect_err(|e| warn!(error = %e, "image generation failed"))?;
                let item = CanvasItem::spawned(prompt, image_url);
                self.store.add_item(item.clone());
                info!(image_url = %item.image_url, "generated image added");
                Ok(vec![item])
            }
            GenerationOutcome::Variations { origin_url, result } => {
                let variations = result.inspect_err(|e| warn!(error = %e, "variation generation failed"))?;
                // The origin may have moved (or gone) while the request ran.
                let Some(origin) = self.store.get(&origin_url) else {
                    warn!(%origin_url, "variation origin removed before results arrived");
                    return Err(VariationError::OriginMissing(origin_url).into());
                };
                let slots = layout::place_variations(origin.position, self.variations);
                let items: Vec<CanvasItem> = variations
                    .into_iter()
                    .zip(slots)
                    .map(|(variation, position)| variation.into_item(position))
                    .collect();
                self.store.add_items(items.iter().cloned());
                info!(%origin_url, count = items.len(), "variations added");
                Ok(items)
            }
        }
    }

    // --- Item actions ---

    /// Append a copy of the item at `image_url`, offset and without a row id.
    pub fn duplicate(&mut self, image_url: &str) -> Option<CanvasItem> {
        let copy = self.store.get(image_url)?.duplicate();
        self.store.add_item(copy.clone());
        debug!(%image_url, "item duplicated");
        Some(copy)
    }

    /// Remove every item showing `image_url` and request deletion of their rows.
    pub fn delete(&mut self, image_url: &str) -> Vec<CanvasItem> {
        let removed = self.store.remove_item(image_url);
        self.drags.remove(image_url);

        let mut ids: Vec<ItemId> = removed.iter().filter_map(|item| item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        self.settling.retain(|id| !ids.contains(id));
        for id in ids {
            let gateway = Arc::clone(&self.persistence);
            self.persistence_tasks.spawn(async move {
                let result = gateway.delete(id).await;
                PersistenceEvent::Deleted { id, result }
            });
        }
        debug!(%image_url, count = removed.len(), "items deleted");
        removed
    }

    /// Persist the current state of the item at `image_url`. Returns false if
    /// no such item exists.
    pub fn save(&mut self, image_url: &str) -> bool {
        let Some(item) = self.store.get(image_url).cloned() else {
            return false;
        };
        self.spawn_save(item);
        true
    }

    fn spawn_save(&mut self, item: CanvasItem) {
        let gateway = Arc::clone(&self.persistence);
        self.persistence_tasks.spawn(async move {
            let result = gateway.save(&item).await;
            PersistenceEvent::Saved { image_url: item.image_url, result }
        });
    }

    // --- Layout ---

    /// Re-pack every item into a grid sized to the viewport.
    ///
    /// Positions change immediately. Durable saves for the repositioned rows
    /// wait for [`Workspace::layout_settled`]. Items being dragged are left
    /// where the pointer holds them and are not queued for saving.
    pub fn arrange_grid(&mut self) -> GridArrangement {
        let arrangement = layout::arrange_grid(self.store.items(), self.viewport.width, self.grid);
        let drags = &self.drags;
        let held = |item: &CanvasItem| drags.get(&item.image_url).is_some_and(DragController::is_dragging);

        // A tile under the pointer keeps its drag position; its grid cell stays empty.
        self.store.apply_positions_where(&arrangement.positions, |item| !held(item));
        let mut ids: Vec<ItemId> = self
            .store
            .iter()
            .filter(|item| !held(item))
            .filter_map(|item| item.id)
            .collect();
        ids.dedup();
        self.settling = ids;
        self.grid_height = arrangement.container_height;
        self.sync_drags();

        info!(
            count = arrangement.positions.len(),
            columns = arrangement.columns,
            container_height = arrangement.container_height,
            "grid arranged"
        );
        arrangement
    }

    /// Signal that the visual re-layout transition has finished; saves every
    /// row the last arrangement moved, using its current position. Returns
    /// the number of saves started.
    pub fn layout_settled(&mut self) -> usize {
        let ids = std::mem::take(&mut self.settling);
        let items: Vec<CanvasItem> = ids
            .iter()
            .filter_map(|id| self.store.iter().find(|item| item.id == Some(*id)).cloned())
            .collect();
        let count = items.len();
        for item in items {
            self.spawn_save(item);
        }
        debug!(count, "layout settled; saving positions");
        count
    }

    /// Rows waiting for `layout_settled`.
    #[must_use]
    pub fn settling(&self) -> &[ItemId] {
        &self.settling
    }

    fn sync_drags(&mut self) {
        for (image_url, controller) in &mut self.drags {
            if let Some(item) = self.store.get(image_url) {
                controller.sync_external(item.position);
            }
        }
    }

    // --- Pointer input ---

    fn controller(&mut self, image_url: &str) -> Option<&mut DragController> {
        let position = self.store.get(image_url)?.position;
        let item_size = self.grid.item_size;
        let controller = self
            .drags
            .entry(image_url.to_owned())
            .or_insert_with(|| DragController::with_item_size(position, item_size));
        controller.sync_external(position);
        Some(controller)
    }

    /// Pointer pressed over the tile at `image_url`. Returns whether a drag began.
    pub fn pointer_down(&mut self, image_url: &str, pointer: Position) -> bool {
        let bounds = self.container_bounds();
        self.controller(image_url)
            .is_some_and(|controller| controller.pointer_down(pointer, bounds))
    }

    /// Pointer moved during a drag; the new position goes straight into the store.
    pub fn pointer_move(&mut self, image_url: &str, pointer: Position) -> Option<Position> {
        let position = self.drags.get_mut(image_url)?.pointer_move(pointer)?;
        self.store.update_position(image_url, position);
        Some(position)
    }

    /// Pointer released. Nothing is persisted; use [`Workspace::save`].
    pub fn pointer_up(&mut self, image_url: &str) -> Option<Position> {
        let released = self.drags.get_mut(image_url)?.pointer_up();
        self.sync_drags();
        released
    }

    /// Pointer capture lost; treated like a release.
    pub fn pointer_cancel(&mut self, image_url: &str) -> Option<Position> {
        let released = self.drags.get_mut(image_url)?.pointer_cancel();
        self.sync_drags();
        released
    }

    pub fn pointer_enter(&mut self, image_url: &str) {
        if let Some(controller) = self.controller(image_url) {
            controller.pointer_enter();
        }
    }

    pub fn pointer_leave(&mut self, image_url: &str) {
        if let Some(controller) = self.drags.get_mut(image_url) {
            controller.pointer_leave();
        }
    }

    #[must_use]
    pub fn drag_state(&self, image_url: &str) -> DragState {
        self.drags
            .get(image_url)
            .map_or(DragState::Idle, DragController::state)
    }

    #[must_use]
    pub fn is_hovered(&self, image_url: &str) -> bool {
        self.drags
            .get(image_url)
            .is_some_and(DragController::is_hovered)
    }

    /// Where the tile should be drawn: the pointer's position mid-drag,
    /// otherwise the store's.
    #[must_use]
    pub fn displayed_position(&self, image_url: &str) -> Option<Position> {
        match self.drags.get(image_url) {
            Some(controller) if controller.is_dragging() => Some(controller.position()),
            _ => self.store.get(image_url).map(|item| item.position),
        }
    }

    // --- Persistence completions ---

    /// Number of persistence calls not yet applied.
    #[must_use]
    pub fn pending_persistence(&self) -> usize {
        self.persistence_tasks.len()
    }

    /// Apply every persistence call that has already completed.
    pub fn pump_persistence(&mut self) -> Vec<PersistenceEvent> {
        let mut applied = Vec::new();
        while let Some(joined) = self.persistence_tasks.try_join_next() {
            if let Some(event) = self.apply_persistence(joined) {
                applied.push(event);
            }
        }
        applied
    }

    /// Wait for every outstanding persistence call and apply it.
    pub async fn flush_persistence(&mut self) -> Vec<PersistenceEvent> {
        let mut applied = Vec::new();
        while let Some(joined) = self.persistence_tasks.join_next().await {
            if let Some(event) = self.apply_persistence(joined) {
                applied.push(event);
            }
        }
        applied
    }

    fn apply_persistence(&mut self, joined: Result<PersistenceEvent, JoinError>) -> Option<PersistenceEvent> {
        let event = match joined {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "persistence task did not complete");
                return None;
            }
        };
        match &event {
            PersistenceEvent::Saved { image_url, result: Ok(outcome) } => {
                if self.store.apply_saved_id(image_url, outcome.id()) {
                    debug!(%image_url, id = outcome.id(), "save applied");
                } else {
                    debug!(%image_url, id = outcome.id(), "save completed for item no longer on canvas");
                }
            }
            PersistenceEvent::Saved { image_url, result: Err(e) } => {
                warn!(%image_url, error = %e, "save failed; item stays unsaved");
            }
            PersistenceEvent::Deleted { id, result: Ok(()) } => {
                debug!(id, "row deleted");
            }
            PersistenceEvent::Deleted { id, result: Err(e) } => {
                warn!(id, error = %e, "delete failed");
            }
        }
        Some(event)
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// Copy of the items for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }
}
