//! Command conventions.
//!
//! A command is any `FnOnce(&EditorState, Dispatch<'_>) -> bool`. It returns whether it applies
//! to the given state. When `dispatch` is `None` the command must only report (dry run); when it
//! is `Some`, the command hands its transaction(s) to the callback.

use crate::state::EditorState;
use crate::transaction::Transaction;

/// Dispatch capability passed to commands; `None` means "dry run".
pub type Dispatch<'a> = Option<&'a mut dyn FnMut(Transaction)>;

/// Reborrow a dispatch capability so it can be handed to several commands in turn.
pub fn reborrow<'a>(dispatch: &'a mut Dispatch<'_>) -> Dispatch<'a> {
    match dispatch {
        Some(dispatch) => Some(&mut **dispatch),
        None => None,
    }
}

/// Hand `tr` to `dispatch` if present. Returns `true` so commands can end with it.
pub fn dispatch_tr(dispatch: Dispatch<'_>, tr: Transaction) -> bool {
    if let Some(dispatch) = dispatch {
        dispatch(tr);
    }
    true
}

/// Try `commands` in order; the first one that applies wins.
pub fn first_command<'c>(
    commands: &'c [&'c dyn Fn(&EditorState, Dispatch<'_>) -> bool],
) -> impl Fn(&EditorState, Dispatch<'_>) -> bool + 'c {
    move |state: &EditorState, mut dispatch: Dispatch<'_>| {
        commands
            .iter()
            .any(|command| command(state, reborrow(&mut dispatch)))
    }
}
