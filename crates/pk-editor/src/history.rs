//! Snapshot undo/redo history.
//!
//! Every entry is a full serialized canvas. The top of `undo_stack` is the
//! current state and the bottom entry is the baseline, which is never
//! popped. Committing a state identical to the current one is a no-op.
//!
//! Bursts of edits are coalesced by a debounce deadline: `schedule` arms or
//! re-arms it, the owner commits once `is_due` reports the quiet period has
//! elapsed, and discrete actions commit straight away.

use crate::snapshot::signature;
use serde_json::Value;

/// One recorded canvas state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub state: Value,
    pub signature: String,
}

impl HistoryEntry {
    pub fn new(state: Value) -> Self {
        let signature = signature(&state);
        Self { state, signature }
    }
}

/// Bounded undo/redo stacks plus the pending-commit state machine.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth, baseline included.
    max_len: usize,
    debounce_ms: u64,
    /// Deadline of the scheduled commit, if any.
    pending_until: Option<u64>,
    /// Set while a restore is being applied.
    restoring: bool,
}

impl History {
    pub fn new(max_len: usize, debounce_ms: u64) -> Self {
        let max_len = max_len.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_len),
            redo_stack: Vec::new(),
            max_len,
            debounce_ms,
            pending_until: None,
            restoring: false,
        }
    }

    /// Drop everything and start over from `baseline`.
    pub fn reset(&mut self, baseline: Value) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_until = None;
        self.undo_stack.push(HistoryEntry::new(baseline));
    }

    /// Record `state` as the new current entry.
    ///
    /// Returns `false` when it matches the current entry. A real change
    /// evicts the oldest entries beyond capacity and clears the redo stack.
    pub fn commit(&mut self, state: Value) -> bool {
        self.pending_until = None;
        let entry = HistoryEntry::new(state);
        if self.current().is_some_and(|c| c.signature == entry.signature) {
            return false;
        }
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_len {
            let excess = self.undo_stack.len() - self.max_len;
            self.undo_stack.drain(..excess);
        }
        self.redo_stack.clear();
        log::debug!(
            "history commit: {} undo / {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Replace the current entry without creating an undo step.
    pub fn amend_current(&mut self, state: Value) {
        match self.undo_stack.last_mut() {
            Some(current) => *current = HistoryEntry::new(state),
            None => self.undo_stack.push(HistoryEntry::new(state)),
        }
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    // ─── Debounce ────────────────────────────────────────────────────────

    /// Arm (or push back) the pending commit. Ignored while restoring.
    /// Returns `true` when a commit is now pending.
    pub fn schedule(&mut self, now_ms: u64) -> bool {
        if self.restoring {
            return false;
        }
        self.pending_until = Some(now_ms.saturating_add(self.debounce_ms));
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending_until.is_some()
    }

    /// Whether the quiet period of the pending commit has elapsed.
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.pending_until.is_some_and(|deadline| now_ms >= deadline)
    }

    pub fn cancel_pending(&mut self) {
        self.pending_until = None;
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The state `undo` would restore.
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack.get(self.undo_stack.len() - 2)
    }

    /// The state `redo` would restore.
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo_stack.last()
    }

    /// Move the current entry to the redo stack. Returns the entry that is
    /// now current, which the caller restores.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.pending_until = None;
        log::debug!("undo: {} undo / {} redo", self.undo_stack.len(), self.redo_stack.len());
        self.undo_stack.last()
    }

    /// Move the latest undone entry back onto the undo stack. Returns it.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry);
        self.pending_until = None;
        log::debug!("redo: {} undo / {} redo", self.undo_stack.len(), self.redo_stack.len());
        self.undo_stack.last()
    }

    // ─── Restore guard ───────────────────────────────────────────────────

    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    pub fn end_restore(&mut self) {
        self.restoring = false;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(n: u32) -> Value {
        json!({ "objects": [], "n": n })
    }

    fn history() -> History {
        let mut h = History::new(20, 300);
        h.reset(state(0));
        h
    }

    #[test]
    fn baseline_is_not_undoable() {
        let mut h = history();
        assert!(!h.can_undo());
        assert!(h.undo().is_none());
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn identical_commit_is_discarded() {
        let mut h = history();
        assert!(h.commit(state(1)));
        assert!(!h.commit(state(1)));
        assert_eq!(h.undo_len(), 2);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = history();
        for n in 1..=25 {
            h.commit(state(n));
        }
        assert_eq!(h.undo_len(), 20);
        for _ in 0..19 {
            assert!(h.undo().is_some());
        }
        assert_eq!(h.current().map(|e| e.state.clone()), Some(state(6)));
        assert!(h.undo().is_none());
    }

    #[test]
    fn undo_redo_moves_between_stacks() {
        let mut h = history();
        h.commit(state(1));
        h.commit(state(2));
        assert_eq!(h.undo().map(|e| e.state.clone()), Some(state(1)));
        assert_eq!(h.redo_len(), 1);
        assert_eq!(h.redo().map(|e| e.state.clone()), Some(state(2)));
        assert!(!h.can_redo());
    }

    #[test]
    fn commit_clears_redo() {
        let mut h = history();
        h.commit(state(1));
        h.undo();
        assert!(h.can_redo());
        h.commit(state(7));
        assert!(!h.can_redo());
    }

    #[test]
    fn schedule_is_rearmed_by_each_edit() {
        let mut h = history();
        assert!(h.schedule(1_000));
        assert!(h.schedule(1_200));
        assert!(!h.is_due(1_300));
        assert!(h.is_due(1_500));
        h.commit(state(1));
        assert!(!h.is_pending());
    }

    #[test]
    fn restoring_suppresses_scheduling() {
        let mut h = history();
        h.begin_restore();
        assert!(!h.schedule(10));
        assert!(!h.is_pending());
        h.end_restore();
        assert!(h.schedule(10));
    }

    #[test]
    fn amend_replaces_without_new_step() {
        let mut h = history();
        h.commit(state(1));
        h.amend_current(state(9));
        assert_eq!(h.undo_len(), 2);
        assert!(!h.commit(state(9)));
    }
}
