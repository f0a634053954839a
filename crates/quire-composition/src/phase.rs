//! Guard phases and their transition table.
//!
//! ```text
//!   Idle ──DeleteStarted──► Deleting ──DeleteEnded(sel)──► Pending{sel} ──Filtered──► Filtered
//!    ▲                                                                                  │
//!    └──────────────────────────────── next transaction ───────────────────────────────┘
//! ```
//!
//! `Pending` only moves to `Filtered` through the correction transaction appended by the plugin;
//! an ordinary transaction leaves it pending.

use quire_core::{Mapping, Selection};

/// Composition metadata attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionEvent {
    /// The guard performed a backward deletion itself.
    DeleteStarted,
    /// The IME finished its deletion; remember where the selection belongs.
    DeleteEnded(Selection),
    /// Selection correction appended by the guard.
    Filtered,
}

/// Guard phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionPhase {
    /// Not guarding anything.
    #[default]
    Idle,
    /// A guarded deletion is in progress.
    Deleting,
    /// Deletion finished; the next selection-only transaction gets corrected to `selection`.
    Pending {
        /// Selection to restore.
        selection: Selection,
    },
    /// The correction was appended; reset on the next transaction.
    Filtered,
}

impl CompositionPhase {
    /// Pure transition for one applied transaction carrying `event` (if any).
    pub fn next(self, event: Option<&CompositionEvent>) -> Self {
        use CompositionEvent as E;
        use CompositionPhase as P;

        match (self, event) {
            (_, Some(E::DeleteStarted)) => P::Deleting,
            (P::Deleting | P::Pending { .. }, Some(E::DeleteEnded(selection))) => P::Pending {
                selection: *selection,
            },
            (P::Pending { .. }, Some(E::Filtered)) => P::Filtered,
            (P::Filtered, _) => P::Idle,
            (phase, _) => phase,
        }
    }

    /// Carry a stored selection across a document change.
    pub fn map(self, mapping: &Mapping) -> Self {
        match self {
            CompositionPhase::Pending { selection } => CompositionPhase::Pending {
                selection: selection.map(mapping),
            },
            phase => phase,
        }
    }

    /// The flag view of this phase.
    pub fn flags(self) -> CompositionState {
        match self {
            CompositionPhase::Idle => CompositionState::default(),
            CompositionPhase::Deleting => CompositionState {
                delete_in_progress: true,
                active: true,
                ..CompositionState::default()
            },
            CompositionPhase::Pending { selection } => CompositionState {
                active: true,
                selection: Some(selection),
                ..CompositionState::default()
            },
            CompositionPhase::Filtered => CompositionState {
                active: true,
                last_transaction_filtered: true,
                ..CompositionState::default()
            },
        }
    }
}

/// Flag snapshot of the guard, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositionState {
    /// A guarded deletion has started but not ended.
    pub delete_in_progress: bool,
    /// The guard is armed.
    pub active: bool,
    /// Selection the guard will restore.
    pub selection: Option<Selection>,
    /// The previous transaction was a guard correction.
    pub last_transaction_filtered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let sel = Selection::cursor(3);
        let phase = CompositionPhase::Idle
            .next(Some(&CompositionEvent::DeleteStarted))
            .next(None)
            .next(Some(&CompositionEvent::DeleteEnded(sel)));
        assert_eq!(phase, CompositionPhase::Pending { selection: sel });
        assert_eq!(phase.next(None), phase);

        let filtered = phase.next(Some(&CompositionEvent::Filtered));
        assert_eq!(filtered, CompositionPhase::Filtered);
        assert_eq!(filtered.next(None), CompositionPhase::Idle);
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let idle = CompositionPhase::Idle;
        let ended = CompositionEvent::DeleteEnded(Selection::cursor(1));
        assert_eq!(idle.next(Some(&ended)), idle);
        assert_eq!(idle.next(Some(&CompositionEvent::Filtered)), idle);
        assert_eq!(
            CompositionPhase::Deleting.next(Some(&CompositionEvent::Filtered)),
            CompositionPhase::Deleting
        );
    }

    #[test]
    fn test_flags() {
        assert_eq!(CompositionPhase::Idle.flags(), CompositionState::default());
        let deleting = CompositionPhase::Deleting.flags();
        assert!(deleting.delete_in_progress && deleting.active);
        let filtered = CompositionPhase::Filtered.flags();
        assert!(filtered.last_transaction_filtered);
        assert!(!filtered.delete_in_progress);
    }
}
