//! Per-instance window bookkeeping.

use std::collections::BTreeSet;

use crate::state::UnitId;

use super::ActivationWindow;

/// Bookkeeping scoped to one active-skill execution.
///
/// Tracks which (unit, window) pairs have fired, which limited windows are
/// exhausted, and the pending windows still owed a dispatch pass. The
/// context is discarded after the active skill resolves; nothing here
/// survives into the next instance.
#[derive(Debug, Default)]
pub struct WindowInstanceContext {
    /// (unit, window) pairs that already fired this instance.
    used: BTreeSet<(UnitId, ActivationWindow)>,
    /// Limited windows exhausted for this instance across all units.
    limited_fired: BTreeSet<ActivationWindow>,
    /// Windows awaiting a dispatch pass, deduplicated.
    pending: Vec<PendingWindow>,
    /// Cover redirect requested by a passive during this instance.
    pub cover_redirect: Option<UnitId>,
    /// A passive buffed or debuffed an initiative stat; the scheduler may
    /// need to reorder the remaining queue.
    pub initiative_changed: bool,
}

/// One queued window with the trigger context it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingWindow {
    pub window: ActivationWindow,
    pub trigger_index: usize,
}

impl WindowInstanceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, unit: UnitId, window: ActivationWindow) {
        self.used.insert((unit, window));
        if window.limited() {
            self.limited_fired.insert(window);
        }
    }

    pub fn is_used(&self, unit: UnitId, window: ActivationWindow) -> bool {
        self.used.contains(&(unit, window))
    }

    pub fn limited_exhausted(&self, window: ActivationWindow) -> bool {
        window.limited() && self.limited_fired.contains(&window)
    }

    /// Queues a window unless an identical pending entry already exists.
    pub fn enqueue(&mut self, window: ActivationWindow, trigger_index: usize) {
        let entry = PendingWindow {
            window,
            trigger_index,
        };
        if !self.pending.contains(&entry) {
            self.pending.push(entry);
        }
    }

    /// Pops the highest-priority pending window (lowest rank first; ties
    /// resolve to the earliest-queued trigger).
    pub fn pop_next(&mut self) -> Option<PendingWindow> {
        if self.pending.is_empty() {
            return None;
        }
        let best = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.window.priority(), p.trigger_index))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(best))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
