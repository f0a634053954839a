//! Suggest commands and helpers.

use crate::matcher::SuggestMatch;
use crate::plugin::SuggestPlugin;
use crate::state::{IgnoredEntry, SuggestAction, SuggestState};
use quire_core::{Dispatch, EditorState, Transaction, dispatch_tr};

/// The suggest plugin state.
pub fn suggest_state(state: &EditorState) -> Option<&SuggestState> {
    state.plugin_state::<SuggestPlugin>()
}

/// The winning match, if any.
pub fn active_match(state: &EditorState) -> Option<&SuggestMatch> {
    suggest_state(state)?.active()
}

/// Ignore `suggest_match`'s trigger from within a change handler.
pub fn ignore_match(tr: &mut Transaction, suggest_match: &SuggestMatch, specific: bool) {
    let from = suggest_match.range.from;
    tr.set_meta(SuggestAction::AddIgnored {
        from,
        to: from + suggest_match.char.chars().count(),
        entry: IgnoredEntry {
            name: suggest_match.suggester.clone(),
            char: suggest_match.char.clone(),
            specific,
        },
    });
}

fn dispatch_action(state: &EditorState, dispatch: Dispatch<'_>, action: SuggestAction) -> bool {
    let mut tr = state.tr();
    tr.set_meta(action);
    dispatch_tr(dispatch, tr)
}

/// Ignore the trigger at `from` for suggester `name` (or, unless `specific`, for every suggester
/// with the same trigger). Fails for an unknown suggester or a position outside the document.
pub fn add_ignored(
    from: usize,
    name: impl Into<String>,
    specific: bool,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let name = name.into();
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let Some(plugin) = state.plugin::<SuggestPlugin>() else {
            return false;
        };
        if from >= state.doc().content_size() {
            return false;
        }
        match plugin.ignore_action(state.doc(), from, &name, specific) {
            Ok(action) => dispatch_action(state, dispatch, action),
            Err(err) => {
                log::debug!("add_ignored refused: {err}");
                false
            }
        }
    }
}

/// Stop ignoring the trigger at `from` for `name`. Fails if it is not ignored.
pub fn remove_ignored(
    from: usize,
    name: impl Into<String>,
) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let name = name.into();
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let present = suggest_state(state).is_some_and(|value| {
            value
                .ignored()
                .iter()
                .any(|d| d.from == from && d.spec.name == name)
        });
        present && dispatch_action(state, dispatch, SuggestAction::RemoveIgnored { from, name })
    }
}

/// Drop every ignored trigger, or only those of suggester `name`. Fails if nothing would change.
pub fn clear_ignored(name: Option<&str>) -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    let name = name.map(str::to_string);
    move |state: &EditorState, dispatch: Dispatch<'_>| {
        let present = suggest_state(state).is_some_and(|value| {
            value
                .ignored()
                .iter()
                .any(|d| name.as_ref().is_none_or(|n| d.spec.name == *n))
        });
        present && dispatch_action(state, dispatch, SuggestAction::ClearIgnored(name))
    }
}

/// Swallow the next exit notification.
pub fn ignore_next_exit() -> impl FnOnce(&EditorState, Dispatch<'_>) -> bool {
    |state: &EditorState, dispatch: Dispatch<'_>| {
        state.plugin::<SuggestPlugin>().is_some()
            && dispatch_action(state, dispatch, SuggestAction::IgnoreNextExit)
    }
}
