//! Guarded deletion commands.

use crate::phase::{CompositionEvent, CompositionPhase};
use crate::plugin::{CompositionPlugin, composition_phase};
use quire_core::{ATOM_CHAR, Dispatch, EditorState, Selection, dispatch_tr, first_command};

type Command<'a> = &'a dyn Fn(&EditorState, Dispatch<'_>) -> bool;

/// Handle an IME "delete content backward" input.
///
/// Applies when the deletion would otherwise be mangled by the IME:
/// - the cursor follows marked text (one grapheme is deleted),
/// - the cursor follows an atom (the atom is deleted whole),
/// - a selection touches an atom on either edge (the selection is deleted).
///
/// Otherwise returns `false` and the native deletion should proceed.
pub fn delete_content_backward() -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    |state: &EditorState, dispatch: Dispatch<'_>| {
        if state.plugin::<CompositionPlugin>().is_none() {
            return false;
        }
        let shapes: [Command<'_>; 3] = [
            &delete_atom_before,
            &delete_marked_text,
            &delete_selection_at_atom,
        ];
        first_command(&shapes)(state, dispatch)
    }
}

/// Record the selection the IME left after its deletion.
///
/// Fails unless a guarded deletion is in progress.
pub fn end_delete(selection: Selection) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        if composition_phase(state) != CompositionPhase::Deleting {
            return false;
        }
        let mut tr = state.tr();
        tr.set_meta(CompositionEvent::DeleteEnded(selection));
        dispatch_tr(dispatch, tr)
    }
}

fn guarded_delete(state: &EditorState, dispatch: Dispatch<'_>, from: usize, to: usize) -> bool {
    let mut tr = state.tr();
    if let Err(err) = tr.delete(from, to) {
        log::debug!("guarded deletion {from}..{to} failed: {err}");
        return false;
    }
    if dispatch.is_none() {
        return true;
    }
    tr.set_selection(Selection::cursor(from))
        .set_meta(CompositionEvent::DeleteStarted);
    log::debug!("guarded deletion of {from}..{to}");
    dispatch_tr(dispatch, tr)
}

fn cursor(state: &EditorState) -> Option<usize> {
    let selection = state.selection();
    selection
        .is_empty()
        .then_some(selection.head)
        .filter(|pos| *pos > 0)
}

fn delete_marked_text(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
    let Some(pos) = cursor(state) else {
        return false;
    };
    let doc = state.doc();
    if doc.char_at(pos - 1) == Some(ATOM_CHAR)
        || doc.is_block_separator(pos - 1)
        || doc.marks_before(pos).is_empty()
    {
        return false;
    }
    match doc.grapheme_len_before(pos) {
        0 => false,
        len => guarded_delete(state, dispatch, pos - len, pos),
    }
}

fn delete_atom_before(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
    match cursor(state) {
        Some(pos) if state.doc().node_before(pos).is_some() => {
            guarded_delete(state, dispatch, pos - 1, pos)
        }
        _ => false,
    }
}

fn delete_selection_at_atom(state: &EditorState, dispatch: Dispatch<'_>) -> bool {
    let selection = state.selection();
    if selection.is_empty() {
        return false;
    }
    let (from, to) = (selection.from(), selection.to());
    let doc = state.doc();
    let touches_atom = doc.node_before(from).is_some()
        || doc.node_after(from).is_some()
        || doc.node_before(to).is_some()
        || doc.node_after(to).is_some();
    touches_atom && guarded_delete(state, dispatch, from, to)
}
