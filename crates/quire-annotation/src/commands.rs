//! Annotation commands.
//!
//! Each function returns a command for [`EditorView::run`](quire_core::EditorView::run) or
//! [`EditorView::can_run`](quire_core::EditorView::can_run). Commands fail (`false`) when no
//! [`AnnotationPlugin`] is registered.

use crate::annotation::{Annotation, AnnotationData};
use crate::plugin::AnnotationPlugin;
use crate::state::AnnotationAction;
use quire_core::{Dispatch, EditorState, dispatch_tr};

fn run_action(state: &EditorState, dispatch: Dispatch<'_>, action: AnnotationAction) -> bool {
    let mut tr = state.tr();
    tr.set_meta(action);
    dispatch_tr(dispatch, tr)
}

/// Annotate the current selection. Fails on an empty selection.
pub fn add_annotation(
    id: impl Into<String>,
    data: AnnotationData,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let id = id.into();
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let selection = state.selection();
        if selection.is_empty() || state.plugin::<AnnotationPlugin>().is_none() {
            return false;
        }
        let (from, to) = (selection.from(), selection.to());
        let annotation = Annotation::new(id, from, to).with_data(data);
        run_action(state, dispatch, AnnotationAction::Add(annotation))
    }
}

/// Merge `data` into the annotation `id`. Fails for an unknown id.
pub fn update_annotation(
    id: impl Into<String>,
    data: AnnotationData,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let id = id.into();
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let known = state
            .plugin_state::<AnnotationPlugin>()
            .is_some_and(|value| value.annotations().iter().any(|a| a.id == id));
        if !known {
            return false;
        }
        run_action(state, dispatch, AnnotationAction::Update { id, data })
    }
}

/// Remove the listed annotations. Unknown ids are ignored.
pub fn remove_annotations(ids: Vec<String>) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        if state.plugin::<AnnotationPlugin>().is_none() {
            return false;
        }
        run_action(state, dispatch, AnnotationAction::Remove(ids))
    }
}

/// Replace every annotation, e.g. when loading persisted annotations.
pub fn set_annotations(
    annotations: Vec<Annotation>,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        if state.plugin::<AnnotationPlugin>().is_none() {
            return false;
        }
        run_action(state, dispatch, AnnotationAction::Set(annotations))
    }
}

/// Recompute decorations (e.g. after the style function's inputs changed).
pub fn redraw_annotations() -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        if state.plugin::<AnnotationPlugin>().is_none() {
            return false;
        }
        run_action(state, dispatch, AnnotationAction::Redraw)
    }
}
