//! Composition guard plugin.

use crate::phase::{CompositionEvent, CompositionPhase, CompositionState};
use quire_core::{EditorState, Plugin, Transaction};

/// Plugin correcting the selection after a guarded IME deletion.
///
/// Some Android keyboards follow a backspace inside composed text with a selection-only
/// transaction that puts the cursor in the wrong place. Once the guard has performed the
/// deletion itself ([`delete_content_backward`](crate::delete_content_backward)) and been told
/// where the selection belongs ([`end_delete`](crate::end_delete)), the next such transaction
/// is followed by exactly one correcting transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompositionPlugin;

impl CompositionPlugin {
    /// Create the plugin.
    pub fn new() -> Self {
        Self
    }
}

/// The guard phase (idle without a [`CompositionPlugin`]).
pub fn composition_phase(state: &EditorState) -> CompositionPhase {
    state
        .plugin_state::<CompositionPlugin>()
        .copied()
        .unwrap_or_default()
}

/// The guard flags (all clear without a [`CompositionPlugin`]).
pub fn composition_state(state: &EditorState) -> CompositionState {
    composition_phase(state).flags()
}

impl Plugin for CompositionPlugin {
    type State = CompositionPhase;

    fn name(&self) -> &str {
        "composition"
    }

    fn init(&self, _state: &EditorState) -> CompositionPhase {
        CompositionPhase::Idle
    }

    fn apply(
        &self,
        tr: &Transaction,
        value: &CompositionPhase,
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) -> CompositionPhase {
        let mapped = if tr.doc_changed() {
            value.map(tr.mapping())
        } else {
            *value
        };
        let next = mapped.next(tr.get_meta::<CompositionEvent>());
        if next != *value {
            log::debug!("composition guard {value:?} -> {next:?}");
        }
        next
    }

    fn append_transaction(
        &self,
        trs: &[Transaction],
        _old_state: &EditorState,
        new_state: &EditorState,
    ) -> Option<Transaction> {
        let [tr] = trs else {
            return None;
        };
        if tr.doc_changed() || tr.has_meta::<CompositionEvent>() {
            return None;
        }
        let CompositionPhase::Pending { selection } = composition_phase(new_state) else {
            return None;
        };

        log::trace!("correcting selection to {selection:?}");
        let mut correction = new_state.tr();
        correction
            .set_selection(selection.clamped(new_state.doc().content_size()))
            .set_meta(CompositionEvent::Filtered);
        Some(correction)
    }
}
