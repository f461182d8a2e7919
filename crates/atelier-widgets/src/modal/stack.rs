#![forbid(unsafe_code)]

//! Modal stack: nested modals with z-ordering and input routing.
//!
//! The stack owns every open modal in LIFO order. Only the topmost modal
//! receives input; all modals render bottom to top, with lower backdrops
//! dimmed so depth reads visually.
//!
//! Invariants:
//! - Only the top modal receives input events.
//! - A modal is removed only via a `Close` event or an explicit pop; an
//!   `Emit` event hands its outcome to the caller while the modal stays
//!   open (a submit shows its spinner in place).
//! - Close ordering is LIFO by default; pop-by-id removes from any
//!   position.
//!
//! Failure modes:
//! - `pop()` on an empty stack returns `None` (no panic).
//! - `pop_id()` for a non-existent id returns `None`.

use std::sync::atomic::{AtomicU64, Ordering};

use atelier_core::event::Event;
use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitData, HitId, HitRegion};

use crate::modal::container::{
    MODAL_HIT_BACKDROP, MODAL_HIT_CONTENT, ModalConfig, render_backdrop,
};

static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a modal in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalId(u64);

impl ModalId {
    fn new() -> Self {
        Self(MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What a modal produced for its opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// Escaped, cancelled, or backdrop-clicked away.
    Dismissed,
    /// Confirmed (e.g. a delete confirmation's primary button).
    Confirmed,
    /// Submitted with a serialized payload.
    Submitted(String),
}

/// How a modal reacts to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    /// Remove the modal from the stack and report the outcome.
    Close(ModalOutcome),
    /// Report the outcome but keep the modal open. Used by submits: the
    /// modal stays up showing its pending state until the opener closes
    /// it on success or feeds it an error.
    Emit(ModalOutcome),
}

/// Trait for modal content managed by the stack.
pub trait StackModal: Send {
    /// Render the modal content at the given area, registering hit
    /// regions under `hit_id` (assigned by the stack at push time).
    fn render_content(&self, area: Rect, frame: &mut Frame, hit_id: HitId);

    /// Handle an event. `hit` is the hit-test result for mouse events.
    fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> Option<StackEvent>;

    /// Container configuration (width preset, backdrop, close behavior).
    fn config(&self) -> ModalConfig;

    /// Content height this modal wants at the given width.
    fn desired_height(&self, width: u16) -> u16;

    /// Mark the modal as waiting on its opener (submit in flight).
    fn set_submitting(&mut self, _submitting: bool) {}

    /// Surface a server-side error inside the modal.
    fn set_api_error(&mut self, _error: Option<String>) {}

    /// Advance time-driven state. Returns true when a redraw is needed.
    fn on_tick(&mut self, _now: web_time::Instant) -> bool {
        false
    }
}

struct ActiveModal {
    id: ModalId,
    modal: Box<dyn StackModal>,
    hit_id: HitId,
}

/// What `handle_event` tells the caller about the top modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResult {
    pub id: ModalId,
    pub outcome: ModalOutcome,
    /// Whether the modal was removed from the stack.
    pub closed: bool,
}

/// Stack of active modals.
pub struct ModalStack {
    /// Bottom to top.
    modals: Vec<ActiveModal>,
    next_hit_id: u32,
}

impl Default for ModalStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            modals: Vec::new(),
            // Start hit ids high so they never collide with page widgets.
            next_hit_id: 1000,
        }
    }

    /// Push a modal onto the stack, returning its unique id.
    ///
    /// The caller should push a focus trap at the same time and pop it
    /// when this modal's `StackResult` reports `closed`.
    pub fn push(&mut self, modal: Box<dyn StackModal>) -> ModalId {
        let id = ModalId::new();
        let hit_id = HitId::new(self.next_hit_id);
        self.next_hit_id += 1;
        self.modals.push(ActiveModal { id, modal, hit_id });
        id
    }

    /// Pop the top modal. Returns its id, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<ModalId> {
        self.modals.pop().map(|m| m.id)
    }

    /// Pop a specific modal by id, from any position.
    pub fn pop_id(&mut self, id: ModalId) -> Option<ModalId> {
        let idx = self.modals.iter().position(|m| m.id == id)?;
        Some(self.modals.remove(idx).id)
    }

    /// Pop everything, top first. Returns the ids in pop order.
    pub fn pop_all(&mut self) -> Vec<ModalId> {
        let mut ids = Vec::with_capacity(self.modals.len());
        while let Some(id) = self.pop() {
            ids.push(id);
        }
        ids
    }

    pub fn top_mut(&mut self) -> Option<&mut (dyn StackModal + 'static)> {
        match self.modals.last_mut() {
            Some(m) => Some(m.modal.as_mut()),
            None => None,
        }
    }

    /// Mutable access to a modal by id.
    pub fn get_mut(&mut self, id: ModalId) -> Option<&mut (dyn StackModal + 'static)> {
        match self.modals.iter_mut().find(|m| m.id == id) {
            Some(m) => Some(m.modal.as_mut()),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.modals.len()
    }

    #[must_use]
    pub fn contains(&self, id: ModalId) -> bool {
        self.modals.iter().any(|m| m.id == id)
    }

    #[must_use]
    pub fn top_id(&self) -> Option<ModalId> {
        self.modals.last().map(|m| m.id)
    }

    /// The hit id assigned to the top modal's regions.
    #[must_use]
    pub fn top_hit_id(&self) -> Option<HitId> {
        self.modals.last().map(|m| m.hit_id)
    }

    /// Route an event to the top modal only.
    ///
    /// Returns `Some` when the modal produced an outcome; `closed` says
    /// whether it also left the stack.
    pub fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> Option<StackResult> {
        let top = self.modals.last_mut()?;
        let id = top.id;

        match top.modal.handle_event(event, hit)? {
            StackEvent::Close(outcome) => {
                self.modals.pop();
                Some(StackResult {
                    id,
                    outcome,
                    closed: true,
                })
            }
            StackEvent::Emit(outcome) => Some(StackResult {
                id,
                outcome,
                closed: false,
            }),
        }
    }

    /// Tick every modal. Returns true when any modal needs a redraw.
    pub fn on_tick(&mut self, now: web_time::Instant) -> bool {
        let mut dirty = false;
        for active in &mut self.modals {
            dirty |= active.modal.on_tick(now);
        }
        dirty
    }

    /// Render all modals bottom to top. Lower modals get half their
    /// configured backdrop opacity so the top one reads as active.
    pub fn render(&self, frame: &mut Frame, screen: Rect) {
        if self.modals.is_empty() {
            return;
        }
        let top_index = self.modals.len() - 1;

        for (i, active) in self.modals.iter().enumerate() {
            let config = active.modal.config();

            let mut backdrop = config.backdrop;
            if i != top_index {
                backdrop.opacity *= 0.5;
            }
            render_backdrop(frame, screen, backdrop);

            let size = config.content_size(screen, active.modal.desired_height(screen.width));
            if size.width == 0 || size.height == 0 {
                continue;
            }
            let content_area = config.position.resolve(screen, size);

            crate::set_style_area(
                &mut frame.buffer,
                content_area,
                atelier_style::Style::new().bg(atelier_style::theme::SURFACE),
            );
            active.modal.render_content(content_area, frame, active.hit_id);

            frame.register_hit(screen, active.hit_id, MODAL_HIT_BACKDROP, 0);
            frame.register_hit(content_area, active.hit_id, MODAL_HIT_CONTENT, 0);
        }
    }
}
