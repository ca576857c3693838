//! Draft session: two-way sync between a live draft value and its history.
//!
//! Restoring a snapshot flows through the same mutation path as a user edit,
//! so the two are distinguished by an explicit phase machine rather than an
//! inferred flag: edits made while `ApplyingHistory` update the live value
//! but are never recorded as new history entries. Single-writer; the caller
//! serializes access (the server holds sessions behind a mutex).

use serde::Serialize;

use crate::editor::history::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncPhase {
    Idle,
    ApplyingHistory,
}

#[derive(Debug, Clone)]
pub struct DraftSession<T> {
    live: T,
    history: History<T>,
    phase: SyncPhase,
}

impl<T: Clone + Serialize> DraftSession<T> {
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            history: History::new(initial.clone(), capacity),
            live: initial,
            phase: SyncPhase::Idle,
        }
    }

    pub fn state(&self) -> &T {
        &self.live
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies an edited snapshot. Pushes to history only when the snapshot
    /// actually diverges from the last recorded one, so repeated saves of an
    /// unchanged draft do not pollute the undo stack.
    pub fn apply_edit(&mut self, next: T) {
        if self.phase == SyncPhase::ApplyingHistory {
            self.live = next;
            return;
        }
        if !same_snapshot(&next, self.history.current()) {
            self.history.push(next.clone());
        }
        self.live = next;
    }

    /// Restores the previous snapshot into the live value. Returns false at
    /// the beginning of history.
    pub fn undo(&mut self) -> bool {
        self.phase = SyncPhase::ApplyingHistory;
        let restored = self.history.undo().cloned();
        let changed = restored.is_some();
        if let Some(state) = restored {
            self.apply_edit(state);
        }
        self.phase = SyncPhase::Idle;
        changed
    }

    /// Restores the next snapshot into the live value. Returns false at the
    /// end of history.
    pub fn redo(&mut self) -> bool {
        self.phase = SyncPhase::ApplyingHistory;
        let restored = self.history.redo().cloned();
        let changed = restored.is_some();
        if let Some(state) = restored {
            self.apply_edit(state);
        }
        self.phase = SyncPhase::Idle;
        changed
    }

    /// Replaces the live value and the whole history with one snapshot.
    pub fn reset(&mut self, state: T) {
        self.history.reset(state.clone());
        self.live = state;
        self.phase = SyncPhase::Idle;
    }
}

/// Deep equality via serialized form, so `T` only needs `Serialize`.
fn same_snapshot<T: Serialize>(a: &T, b: &T) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
