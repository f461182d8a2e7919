#![forbid(unsafe_code)]

//! Keyboard focus tracking with trap support.
//!
//! Pages register focusable nodes each frame; modals push a trap so Tab
//! cycles only inside them. Popping a trap restores whatever was focused
//! before the trap was pushed, provided that node still exists.
//!
//! Invariants:
//! - Tab order is registration order within the active scope.
//! - The member list is recomputed on every `focus_next`/`focus_prev`
//!   call, so nodes that appear or disappear between keystrokes are
//!   picked up without any invalidation step.
//! - Focusing an unregistered node is a no-op.

use std::collections::HashMap;

use atelier_core::geometry::Rect;

/// Stable identity of a focusable node. Callers pick their own ids.
pub type FocusId = u64;

/// Identity of a trap scope (one per open modal).
pub type TrapId = u32;

#[derive(Debug, Clone, Copy)]
struct FocusNode {
    id: FocusId,
    trap: Option<TrapId>,
    rect: Rect,
}

#[derive(Debug, Clone, Copy)]
struct TrapFrame {
    trap: TrapId,
    previous: Option<FocusId>,
}

/// Tracks which node owns keyboard focus.
#[derive(Debug, Default)]
pub struct FocusManager {
    nodes: Vec<FocusNode>,
    rects: HashMap<FocusId, Rect>,
    trap_stack: Vec<TrapFrame>,
    current: Option<FocusId>,
    next_trap: TrapId,
}

impl FocusManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all registered nodes. Call at the start of each frame;
    /// focus and the trap stack survive across frames.
    pub fn begin_frame(&mut self) {
        self.nodes.clear();
        self.rects.clear();
    }

    /// Register a focusable node at the top level.
    pub fn register(&mut self, id: FocusId, rect: Rect) {
        self.register_in(id, rect, None);
    }

    /// Register a focusable node inside a trap scope.
    pub fn register_trapped(&mut self, id: FocusId, rect: Rect, trap: TrapId) {
        self.register_in(id, rect, Some(trap));
    }

    fn register_in(&mut self, id: FocusId, rect: Rect, trap: Option<TrapId>) {
        self.nodes.push(FocusNode { id, trap, rect });
        self.rects.insert(id, rect);
    }

    /// The node that currently owns focus, if any.
    #[must_use]
    pub fn current(&self) -> Option<FocusId> {
        self.current
    }

    /// Screen rect of the focused node, as of the last registration pass.
    #[must_use]
    pub fn current_rect(&self) -> Option<Rect> {
        self.current.and_then(|id| self.rects.get(&id).copied())
    }

    /// Move focus to `id`. No-op if the node is not registered.
    pub fn focus(&mut self, id: FocusId) {
        if self.rects.contains_key(&id) {
            self.current = Some(id);
        }
    }

    /// Drop focus entirely.
    pub fn blur(&mut self) {
        self.current = None;
    }

    /// Open a new trap scope and return its id. Records the previously
    /// focused node so `pop_trap` can restore it.
    pub fn push_trap(&mut self) -> TrapId {
        let trap = self.next_trap;
        self.next_trap = self.next_trap.wrapping_add(1);
        self.trap_stack.push(TrapFrame {
            trap,
            previous: self.current,
        });
        self.current = None;
        trap
    }

    /// Close the topmost trap scope, restoring focus to the node that
    /// held it before the trap opened (if it still exists).
    pub fn pop_trap(&mut self) {
        if let Some(frame) = self.trap_stack.pop() {
            self.current = frame
                .previous
                .filter(|id| self.rects.contains_key(id))
                .or(frame.previous);
        }
    }

    #[must_use]
    pub fn is_trapped(&self) -> bool {
        !self.trap_stack.is_empty()
    }

    /// The trap scope input is currently confined to.
    #[must_use]
    pub fn active_trap(&self) -> Option<TrapId> {
        self.trap_stack.last().map(|frame| frame.trap)
    }

    fn members(&self) -> Vec<FocusId> {
        let scope = self.active_trap();
        self.nodes
            .iter()
            .filter(|node| node.trap == scope)
            .map(|node| node.id)
            .collect()
    }

    /// Move focus to the next node in the active scope, wrapping.
    /// No-op when the scope has no members.
    pub fn focus_next(&mut self) {
        self.advance(1);
    }

    /// Move focus to the previous node in the active scope, wrapping.
    pub fn focus_prev(&mut self) {
        self.advance(-1);
    }

    fn advance(&mut self, delta: isize) {
        let members = self.members();
        if members.is_empty() {
            return;
        }
        let next = match self.current.and_then(|id| {
            members.iter().position(|candidate| *candidate == id)
        }) {
            Some(pos) => {
                let len = members.len() as isize;
                ((pos as isize + delta).rem_euclid(len)) as usize
            }
            // Nothing focused in this scope yet: Tab lands on the first
            // member, Shift+Tab on the last.
            None if delta > 0 => 0,
            None => members.len() - 1,
        };
        self.current = Some(members[next]);
    }

    /// Focus the first node in the active scope, if any.
    pub fn focus_first(&mut self) {
        if let Some(first) = self.members().first().copied() {
            self.current = Some(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0, 0, 10, 1)
    }

    fn manager_with(ids: &[FocusId]) -> FocusManager {
        let mut focus = FocusManager::new();
        for id in ids {
            focus.register(*id, rect());
        }
        focus
    }

    #[test]
    fn tab_cycles_in_registration_order() {
        let mut focus = manager_with(&[10, 20, 30]);
        focus.focus_next();
        assert_eq!(focus.current(), Some(10));
        focus.focus_next();
        assert_eq!(focus.current(), Some(20));
        focus.focus_next();
        assert_eq!(focus.current(), Some(30));
        focus.focus_next();
        assert_eq!(focus.current(), Some(10));
    }

    #[test]
    fn shift_tab_cycles_backwards() {
        let mut focus = manager_with(&[10, 20, 30]);
        focus.focus_prev();
        assert_eq!(focus.current(), Some(30));
        focus.focus_prev();
        assert_eq!(focus.current(), Some(20));
    }

    #[test]
    fn focus_unregistered_is_noop() {
        let mut focus = manager_with(&[10]);
        focus.focus(99);
        assert_eq!(focus.current(), None);
    }

    #[test]
    fn empty_scope_advance_is_noop() {
        let mut focus = FocusManager::new();
        focus.focus_next();
        assert_eq!(focus.current(), None);
    }

    #[test]
    fn trap_confines_cycling_to_members() {
        let mut focus = manager_with(&[1, 2]);
        focus.focus(1);

        let trap = focus.push_trap();
        focus.register_trapped(100, rect(), trap);
        focus.register_trapped(101, rect(), trap);

        focus.focus_next();
        assert_eq!(focus.current(), Some(100));
        focus.focus_next();
        assert_eq!(focus.current(), Some(101));
        focus.focus_next();
        assert_eq!(focus.current(), Some(100));
    }

    #[test]
    fn pop_trap_restores_previous_focus() {
        let mut focus = manager_with(&[1, 2]);
        focus.focus(2);

        let trap = focus.push_trap();
        focus.register_trapped(100, rect(), trap);
        focus.focus_next();
        assert_eq!(focus.current(), Some(100));

        focus.pop_trap();
        assert_eq!(focus.current(), Some(2));
    }

    #[test]
    fn nested_traps_restore_in_order() {
        let mut focus = manager_with(&[1]);
        focus.focus(1);

        let outer = focus.push_trap();
        focus.register_trapped(10, rect(), outer);
        focus.focus(10);

        let inner = focus.push_trap();
        focus.register_trapped(20, rect(), inner);
        focus.focus(20);

        focus.pop_trap();
        assert_eq!(focus.current(), Some(10));
        focus.pop_trap();
        assert_eq!(focus.current(), Some(1));
    }

    #[test]
    fn members_recomputed_each_keystroke() {
        let mut focus = manager_with(&[1, 2]);
        focus.focus(1);

        // A node appears between keystrokes.
        focus.begin_frame();
        focus.register(1, rect());
        focus.register(3, rect());
        focus.register(2, rect());

        focus.focus_next();
        assert_eq!(focus.current(), Some(3));
    }

    #[test]
    fn focus_first_in_trap() {
        let mut focus = FocusManager::new();
        let trap = focus.push_trap();
        focus.register_trapped(7, rect(), trap);
        focus.register_trapped(8, rect(), trap);
        focus.focus_first();
        assert_eq!(focus.current(), Some(7));
    }
}
