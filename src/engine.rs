//! Top-level engine: composes the store, the gesture state machine, and the
//! reconciler, and executes the actions the machine emits.
//!
//! The engine runs entirely on the host's UI task. Pointer handlers run the
//! pure state machine against a snapshot of the store, then execute the
//! returned actions; the only suspension points are the awaited network
//! calls inside the store operations. Each handler returns whether the host
//! should schedule a redraw — multiple state changes within one tick can
//! coalesce into a single paint.
//!
//! Transient network failures behind drawing, erasing, and drag-commit are
//! swallowed with a logged diagnostic; the next poll cycle brings local and
//! server state back together. Undo and redo return their errors so the
//! host can surface them.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use uuid::Uuid;

use crate::api::ObjectApi;
use crate::geom::Point;
use crate::input::{Action, InteractionState, Tool};
use crate::render::{self, DrawCmd};
use crate::store::{CanvasObjectStore, StoreError};
use crate::sync::SyncReconciler;

/// The canvas engine for one room.
pub struct CanvasEngine<A> {
    store: CanvasObjectStore<A>,
    input: InteractionState,
    sync: SyncReconciler,
}

impl<A: ObjectApi> CanvasEngine<A> {
    /// Create an engine for `room_id` backed by `api`.
    pub fn new(api: A, room_id: Uuid) -> Self {
        Self {
            store: CanvasObjectStore::new(api, room_id),
            input: InteractionState::new(),
            sync: SyncReconciler::default(),
        }
    }

    // --- Queries ---

    /// The local object store.
    #[must_use]
    pub fn store(&self) -> &CanvasObjectStore<A> {
        &self.store
    }

    /// The interaction state (tool, selection, gesture).
    #[must_use]
    pub fn input(&self) -> &InteractionState {
        &self.input
    }

    /// The draw list for the current frame.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawCmd> {
        render::draw_list(self.store.objects(), &self.input)
    }

    // --- Tool / style ---

    /// Switch the active tool. Switching away from select clears the
    /// selection.
    pub fn set_tool(&mut self, tool: Tool) {
        self.input.set_tool(tool);
    }

    /// Set the stroke color applied to newly drawn objects.
    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.input.stroke_color = color.into();
    }

    /// Set the stroke width applied to newly drawn objects.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.input.stroke_width = width;
    }

    /// Set the eraser circle radius.
    pub fn set_eraser_radius(&mut self, radius: f64) {
        self.input.eraser_radius = radius;
    }

    // --- Pointer events ---

    /// Handle pointer-down. Returns whether a redraw is needed.
    pub async fn pointer_down(&mut self, pos: Point) -> bool {
        let actions = self.input.pointer_down(pos, self.store.objects());
        self.execute(actions).await
    }

    /// Handle pointer-move. Returns whether a redraw is needed.
    pub async fn pointer_move(&mut self, pos: Point) -> bool {
        let actions = self.input.pointer_move(pos, self.store.objects());
        self.execute(actions).await
    }

    /// Handle pointer-up. Returns whether a redraw is needed.
    pub async fn pointer_up(&mut self, pos: Point) -> bool {
        let actions = self.input.pointer_up(pos, self.store.objects());
        self.execute(actions).await
    }

    /// Handle the pointer leaving the canvas: cancels any in-progress
    /// gesture without committing. Returns whether a redraw is needed.
    pub fn pointer_leave(&mut self) -> bool {
        let actions = self.input.pointer_leave();
        !actions.is_empty()
    }

    // --- History ---

    /// Undo the most recent creation in the room. Guarded no-op when the
    /// local list is empty.
    ///
    /// # Errors
    ///
    /// Propagates the remote failure for the host to surface.
    pub async fn undo(&mut self) -> Result<(), StoreError> {
        self.store.undo().await
    }

    /// Redo the most recent deletion in the room. Nothing-to-restore is a
    /// benign no-op.
    ///
    /// # Errors
    ///
    /// Propagates any other remote failure for the host to surface.
    pub async fn redo(&mut self) -> Result<(), StoreError> {
        self.store.redo().await
    }

    // --- Sync ---

    /// Initial load: fetch the room's object list once before the periodic
    /// loop starts. Returns whether the local list changed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the fetch fails.
    pub async fn load(&mut self) -> Result<bool, StoreError> {
        self.poll_once().await
    }

    /// One reconciler cycle, guarded against the active drag session.
    /// Returns whether the local list was replaced.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the fetch fails; the local list is
    /// untouched in that case.
    pub async fn poll_once(&mut self) -> Result<bool, StoreError> {
        let dragged = self.input.dragged_ids();
        self.sync.tick(&mut self.store, &dragged).await
    }

    /// Run the periodic reconciliation loop forever. Tick failures are
    /// logged and polling continues; the caller typically selects this
    /// future against the rest of the UI loop.
    pub async fn run_sync(&mut self) {
        let period = self.sync.period();
        // First fire lands one full period out; `load()` already did the
        // initial fetch.
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = self.poll_once().await {
                log::warn!("sync poll failed, retrying next tick: {err}");
            }
        }
    }

    // --- Action execution ---

    async fn execute(&mut self, actions: Vec<Action>) -> bool {
        let mut redraw = false;
        for action in actions {
            match action {
                Action::RenderNeeded => redraw = true,
                Action::CreateObject { data } => {
                    if let Err(err) = self.store.create(&data).await {
                        log::warn!("failed to save drawn object: {err}");
                    }
                    redraw = true;
                }
                Action::DeleteObject { id } => {
                    if let Err(err) = self.store.delete(id).await {
                        log::warn!("failed to erase object {id}: {err}");
                    }
                    redraw = true;
                }
                Action::CommitDrag { updates } => {
                    if let Err(err) = self.store.update_many(updates).await {
                        log::warn!("drag commit incomplete, next poll will resolve: {err}");
                    }
                    redraw = true;
                }
            }
        }
        redraw
    }
}
