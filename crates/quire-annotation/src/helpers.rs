//! Read-only annotation queries.
//!
//! Every helper returns an empty result when no [`AnnotationPlugin`] is registered.

use crate::annotation::AnnotationWithText;
use crate::plugin::AnnotationPlugin;
use quire_core::EditorState;

/// All annotations with their current text.
pub fn annotations(state: &EditorState) -> Vec<AnnotationWithText> {
    let Some((plugin, value)) = state.plugin_with_state::<AnnotationPlugin>() else {
        return Vec::new();
    };
    value
        .annotations()
        .iter()
        .map(|a| plugin.with_text(state.doc(), a))
        .collect()
}

/// Annotations covering `pos`: `from <= pos < to`, or `from <= pos <= to` when
/// `include_chunk_end` is set.
pub fn annotations_at(
    state: &EditorState,
    pos: usize,
    include_chunk_end: bool,
) -> Vec<AnnotationWithText> {
    let Some((plugin, value)) = state.plugin_with_state::<AnnotationPlugin>() else {
        return Vec::new();
    };
    value
        .annotations()
        .iter()
        .filter(|a| {
            a.from <= pos && (pos < a.to || (include_chunk_end && pos == a.to))
        })
        .map(|a| plugin.with_text(state.doc(), a))
        .collect()
}

/// The shortest annotation covering `pos`; the first one wins among equally long ones.
pub fn shortest_annotation_at(state: &EditorState, pos: usize) -> Option<AnnotationWithText> {
    annotations_at(state, pos, false)
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.annotation.len() < best.annotation.len() {
                candidate
            } else {
                best
            }
        })
}

/// Returns `true` if any annotation intersects the selection (or covers the cursor).
pub fn selection_has_annotation(state: &EditorState) -> bool {
    let Some(value) = state.plugin_state::<AnnotationPlugin>() else {
        return false;
    };
    let selection = state.selection();
    let (from, to) = (selection.from(), selection.to());
    value.annotations().iter().any(|a| {
        if from == to {
            a.from <= from && from < a.to
        } else {
            a.from < to && from < a.to
        }
    })
}
