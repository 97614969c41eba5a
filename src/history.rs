//! # Undo / Redo History
//!
//! A bounded stack of design snapshots with an explicit state machine.
//!
//! ## States
//!
//! ```text
//!            record_if_changed                undo / redo / reset_to_origin
//!   ┌──────┐ ──────────────────► ┌──────────┐          ┌───────────┐
//!   │ Idle │                     │ Applying │          │ Restoring │
//!   └──────┘ ◄────────────────── └──────────┘          └───────────┘
//!      ▲            done                                     │
//!      └──────────── record_if_changed (consumed, no append) ─┘
//! ```
//!
//! After a navigation the caller writes the returned snapshot back into the
//! store; the store change then reaches [`History::record_if_changed`] like
//! any other change, and the `Restoring` state makes that call a no-op.
//!
//! ## Coalescing
//!
//! Continuous inputs (slider drags) open a gesture with
//! [`History::begin_gesture`]. While a gesture is open, changes are held as
//! a single pending snapshot; [`History::end_gesture`] (pointer release)
//! records it once. One drag produces one entry.

use tracing::{debug, warn};

/// Maximum number of snapshots kept.
pub const HISTORY_CAP: usize = 50;

/// Where the history state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A new external change is being folded into the stack.
    Applying,
    /// A navigation result is on its way back into the store.
    Restoring,
}

/// Outcome of [`History::record_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// Appended as a new entry.
    Appended,
    /// Equal to the current entry; nothing recorded.
    Unchanged,
    /// The change was the echo of an undo/redo/reset and was consumed.
    Restored,
    /// Held as the pending value of an open gesture.
    Deferred,
}

/// Bounded undo/redo stack of immutable snapshots.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    index: usize,
    cap: usize,
    phase: Phase,
    gesture: Option<Option<T>>,
}

impl<T: Clone + PartialEq> History<T> {
    /// Start a history whose origin is `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_cap(initial, HISTORY_CAP)
    }

    /// Start a history with a custom capacity (at least 1).
    pub fn with_cap(initial: T, cap: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            cap: cap.max(1),
            phase: Phase::Idle,
            gesture: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The currently displayed snapshot.
    pub fn current(&mut self) -> &T {
        self.repair_index();
        &self.entries[self.index]
    }

    /// Fold a store change into the history.
    ///
    /// Consumed without recording while `Restoring`; deferred while a
    /// gesture is open.
    pub fn record_if_changed(&mut self, next: &T) -> Recorded {
        if self.phase == Phase::Restoring {
            self.phase = Phase::Idle;
            return Recorded::Restored;
        }

        if let Some(pending) = self.gesture.as_mut() {
            *pending = Some(next.clone());
            return Recorded::Deferred;
        }

        self.apply(next)
    }

    fn apply(&mut self, next: &T) -> Recorded {
        self.repair_index();
        if self.entries[self.index] == *next {
            return Recorded::Unchanged;
        }

        self.phase = Phase::Applying;

        // A new change discards the redo branch.
        self.entries.truncate(self.index + 1);
        self.entries.push(next.clone());
        self.index = self.entries.len() - 1;

        if self.entries.len() > self.cap {
            self.entries.remove(0);
            self.index -= 1;
            debug!(cap = self.cap, "history full, evicted oldest snapshot");
        }

        self.phase = Phase::Idle;
        Recorded::Appended
    }

    /// Step back one snapshot. Returns `None` at the origin.
    ///
    /// A successful step closes an open gesture and drops its pending value.
    pub fn undo(&mut self) -> Option<&T> {
        self.repair_index();
        if self.index == 0 {
            return None;
        }
        self.discard_gesture();
        self.index -= 1;
        self.phase = Phase::Restoring;
        Some(&self.entries[self.index])
    }

    /// Step forward one snapshot. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        self.repair_index();
        if !self.can_redo() {
            return None;
        }
        self.discard_gesture();
        self.index += 1;
        self.phase = Phase::Restoring;
        Some(&self.entries[self.index])
    }

    /// Jump to the oldest snapshot, keeping later entries for redo.
    pub fn reset_to_origin(&mut self) -> &T {
        self.discard_gesture();
        self.index = 0;
        self.phase = Phase::Restoring;
        &self.entries[0]
    }

    /// Cancel a pending `Restoring` state when the navigation result was not
    /// written back (e.g. the store rejected it).
    #[cfg(test)]
    fn abandon_restore(&mut self) {
        if self.phase == Phase::Restoring {
            self.phase = Phase::Idle;
        }
    }

    /// Open a continuous-input gesture. Nested calls are ignored.
    pub fn begin_gesture(&mut self) {
        if self.gesture.is_none() {
            self.gesture = Some(None);
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Close the gesture and record its final value, if any.
    pub fn end_gesture(&mut self) -> Recorded {
        match self.gesture.take() {
            Some(Some(pending)) => self.apply(&pending),
            _ => Recorded::Unchanged,
        }
    }

    fn discard_gesture(&mut self) {
        if let Some(Some(_)) = self.gesture.take() {
            debug!("navigation dropped a pending gesture value");
        }
    }

    /// Clamp a corrupted index back to the newest valid entry.
    fn repair_index(&mut self) {
        if self.index >= self.entries.len() {
            let recovered = self.entries.len() - 1;
            warn!(
                index = self.index,
                len = self.entries.len(),
                recovered,
                "history index out of bounds, recovering"
            );
            self.index = recovered;
        }
    }

    #[cfg(test)]
    fn corrupt_index(&mut self, index: usize) {
        self.index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(values: &[i32]) -> History<i32> {
        let mut h = History::new(0);
        for v in values {
            h.record_if_changed(v);
        }
        h
    }

    #[test]
    fn test_record_appends_distinct_values() {
        let h = history_with(&[1, 2, 3]);
        assert_eq!(h.len(), 4);
        assert_eq!(h.index(), 3);
        assert_eq!(h.phase(), Phase::Idle);
    }

    #[test]
    fn test_equal_value_is_not_recorded() {
        let mut h = history_with(&[1]);
        assert_eq!(h.record_if_changed(&1), Recorded::Unchanged);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut h = history_with(&[1, 2, 3]);
        assert_eq!(h.undo(), Some(&2));
        assert_eq!(h.phase(), Phase::Restoring);
        assert_eq!(h.record_if_changed(&2), Recorded::Restored);
        assert_eq!(h.phase(), Phase::Idle);
        assert_eq!(h.redo(), Some(&3));
        h.record_if_changed(&3);
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn test_undo_at_origin_is_none() {
        let mut h = History::new(0);
        assert_eq!(h.undo(), None);
        assert_eq!(h.phase(), Phase::Idle);
    }

    #[test]
    fn test_restore_echo_is_not_recorded() {
        let mut h = history_with(&[1, 2]);
        h.undo();
        // The store echoes the restored value back.
        h.record_if_changed(&1);
        assert_eq!(h.len(), 3);
        assert!(h.can_redo());
    }

    #[test]
    fn test_branching_discards_redo() {
        let mut h = history_with(&[1, 2, 3]);
        h.undo();
        h.record_if_changed(&2);
        h.undo();
        h.record_if_changed(&1);
        assert_eq!(h.record_if_changed(&10), Recorded::Appended);
        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(*h.current(), 10);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut h = History::with_cap(0, 3);
        for v in 1..=5 {
            h.record_if_changed(&v);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        assert_eq!(*h.current(), 5);
        h.undo();
        h.record_if_changed(&4);
        h.undo();
        h.record_if_changed(&3);
        assert_eq!(h.undo(), None);
    }

    #[test]
    fn test_reset_to_origin_keeps_redo() {
        let mut h = history_with(&[1, 2, 3]);
        assert_eq!(*h.reset_to_origin(), 0);
        h.record_if_changed(&0);
        assert!(h.can_redo());
        assert_eq!(h.len(), 4);
        assert_eq!(h.redo(), Some(&1));
    }

    #[test]
    fn test_undo_inside_gesture_drops_pending_value() {
        let mut h = history_with(&[1]);
        h.begin_gesture();
        h.record_if_changed(&2);
        h.record_if_changed(&3);

        assert_eq!(h.undo(), Some(&0));
        assert!(!h.in_gesture());
        assert_eq!(h.record_if_changed(&0), Recorded::Restored);
        assert_eq!(h.end_gesture(), Recorded::Unchanged);

        assert_eq!(h.len(), 2);
        assert_eq!(*h.current(), 0);
        assert!(h.can_redo());
    }

    #[test]
    fn test_reset_inside_gesture_drops_pending_value() {
        let mut h = history_with(&[1, 2]);
        h.begin_gesture();
        h.record_if_changed(&9);
        assert_eq!(*h.reset_to_origin(), 0);
        h.record_if_changed(&0);
        assert_eq!(h.end_gesture(), Recorded::Unchanged);
        assert_eq!(h.len(), 3);
        assert_eq!(h.redo(), Some(&1));
    }

    #[test]
    fn test_gesture_records_once() {
        let mut h = History::new(0);
        h.begin_gesture();
        for v in 1..=20 {
            assert_eq!(h.record_if_changed(&v), Recorded::Deferred);
        }
        assert_eq!(h.len(), 1);
        assert_eq!(h.end_gesture(), Recorded::Appended);
        assert_eq!(h.len(), 2);
        assert_eq!(*h.current(), 20);
        assert!(!h.in_gesture());
    }

    #[test]
    fn test_gesture_returning_to_start_records_nothing() {
        let mut h = History::new(0);
        h.begin_gesture();
        h.record_if_changed(&5);
        h.record_if_changed(&0);
        assert_eq!(h.end_gesture(), Recorded::Unchanged);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_empty_gesture() {
        let mut h = History::new(0);
        h.begin_gesture();
        assert_eq!(h.end_gesture(), Recorded::Unchanged);
        assert_eq!(h.end_gesture(), Recorded::Unchanged);
    }

    #[test]
    fn test_corrupt_index_recovers() {
        let mut h = history_with(&[1, 2]);
        h.corrupt_index(99);
        assert_eq!(*h.current(), 2);
        assert_eq!(h.index(), 2);
        assert_eq!(h.undo(), Some(&1));
    }

    #[test]
    fn test_abandon_restore() {
        let mut h = history_with(&[1]);
        h.undo();
        h.abandon_restore();
        assert_eq!(h.phase(), Phase::Idle);
        assert_eq!(h.record_if_changed(&7), Recorded::Appended);
    }
}
