//! Diff commands and helpers.

use crate::plugin::{DiffAction, DiffPlugin};
use crate::track::{Commit, CommitId, Span};
use quire_core::{Dispatch, EditorState, dispatch_tr};
use std::sync::Arc;

/// Commit history, oldest first (empty without a [`DiffPlugin`]).
pub fn commits(state: &EditorState) -> &[Arc<Commit>] {
    state
        .plugin_state::<DiffPlugin>()
        .map(|value| value.tracked().commits())
        .unwrap_or_default()
}

/// A single commit.
pub fn commit(state: &EditorState, id: CommitId) -> Option<&Commit> {
    let commits = commits(state);
    id.resolve(commits.len()).map(|i| commits[i].as_ref())
}

/// The blame map (empty without a [`DiffPlugin`]).
pub fn blame_map(state: &EditorState) -> &[Span] {
    state
        .plugin_state::<DiffPlugin>()
        .map(|value| value.tracked().blame_map())
        .unwrap_or_default()
}

/// Commit pending edits. Fails when nothing is pending.
pub fn commit_change(
    message: impl Into<String>,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let message = message.into();
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let pending = state
            .plugin_state::<DiffPlugin>()
            .is_some_and(|value| value.tracked().has_uncommitted());
        if !pending {
            return false;
        }
        let mut tr = state.tr();
        tr.set_meta(DiffAction::Commit(message));
        dispatch_tr(dispatch, tr)
    }
}

/// Revert a commit (the newest one by default).
///
/// Fails for an unknown commit, while edits are uncommitted, or when nothing could be replayed.
/// The revert itself is committed with `revert_message` applied to the reverted commit's message.
pub fn revert_commit(id: Option<CommitId>) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let Some((plugin, value)) = state.plugin_with_state::<DiffPlugin>() else {
            return false;
        };
        let id = id.unwrap_or_default();
        let tracked = value.tracked();

        match tracked.revert(id, state.tr()) {
            Ok(mut tr) => {
                let message = id
                    .resolve(tracked.commits().len())
                    .map(|index| tracked.commits()[index].message.as_str())
                    .unwrap_or_default();
                let message = (plugin.options().revert_message)(message);
                tr.set_meta(DiffAction::Commit(message));
                dispatch_tr(dispatch, tr)
            }
            Err(err) => {
                log::debug!("revert refused: {err}");
                false
            }
        }
    }
}

fn highlight_action(
    id: CommitId,
    action: fn(usize) -> DiffAction,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let Some(index) = id.resolve(commits(state).len()) else {
            return false;
        };
        let mut tr = state.tr();
        tr.set_meta(action(index));
        dispatch_tr(dispatch, tr)
    }
}

/// Highlight a commit's blame spans.
pub fn highlight_commit(
    id: impl Into<CommitId>,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    highlight_action(id.into(), DiffAction::Highlight)
}

/// Remove a commit's highlight.
pub fn remove_highlighted_commit(
    id: impl Into<CommitId>,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    highlight_action(id.into(), DiffAction::RemoveHighlight)
}
