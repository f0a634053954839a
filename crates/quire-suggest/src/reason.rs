//! Change and exit reasons.
//!
//! After every transaction the previous active match (mapped through the transaction) is
//! compared with the new one. The comparison yields at most one exit (for the previous match)
//! and at most one change (for the new match); an exit always comes first.

use crate::matcher::{SuggestMatch, find_match, starts_at};
use crate::suggester::Suggester;
use quire_core::{EditorState, Selection};

/// Why a match changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// A new match started.
    Start,
    /// The query text changed.
    Change,
    /// The cursor moved within the match.
    Move,
    /// A non-empty selection moved within the match.
    SelectionInside,
    /// The cursor jumped to a later match.
    JumpForward,
    /// The cursor jumped to an earlier match.
    JumpBackward,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The cursor left past the end of the match.
    MoveEnd,
    /// The cursor left before the start of the match.
    MoveStart,
    /// An edit split the match; the trigger still starts a (shorter) match.
    Split,
    /// An edit made the match invalid.
    InvalidSplit,
    /// The matched text was deleted.
    Delete,
    /// A selection extends outside the match.
    SelectionOutside,
    /// The cursor jumped to a later match.
    JumpForward,
    /// The cursor jumped to an earlier match.
    JumpBackward,
    /// The match is still in the text but no longer active (ignored or excluded).
    End,
}

/// A change or an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestEvent {
    /// The match is (still) active.
    Change(ChangeReason),
    /// The match is no longer active.
    Exit(ExitReason),
}

/// What a suggester's change handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestChangeProps {
    /// The match concerned. For exits, positions are mapped into the current document.
    pub suggest_match: SuggestMatch,
    /// What happened.
    pub event: SuggestEvent,
}

impl SuggestChangeProps {
    /// Returns `true` for exits.
    pub fn is_exit(&self) -> bool {
        matches!(self.event, SuggestEvent::Exit(_))
    }

    /// The exit reason, if this is an exit.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self.event {
            SuggestEvent::Exit(reason) => Some(reason),
            SuggestEvent::Change(_) => None,
        }
    }

    /// The change reason, if this is a change.
    pub fn change_reason(&self) -> Option<ChangeReason> {
        match self.event {
            SuggestEvent::Change(reason) => Some(reason),
            SuggestEvent::Exit(_) => None,
        }
    }
}

fn change(suggest_match: &SuggestMatch, reason: ChangeReason) -> SuggestChangeProps {
    SuggestChangeProps {
        suggest_match: suggest_match.clone(),
        event: SuggestEvent::Change(reason),
    }
}

fn exit(suggest_match: &SuggestMatch, reason: ExitReason) -> SuggestChangeProps {
    SuggestChangeProps {
        suggest_match: suggest_match.clone(),
        event: SuggestEvent::Exit(reason),
    }
}

/// Compare the previous active match with the next one.
pub(crate) fn find_reasons(
    prev: Option<&SuggestMatch>,
    next: Option<&SuggestMatch>,
    state: &EditorState,
    suggesters: &[Suggester],
) -> Vec<SuggestChangeProps> {
    match (prev, next) {
        (None, None) => Vec::new(),
        (None, Some(next)) => vec![change(next, ChangeReason::Start)],
        (Some(prev), None) => {
            let reason = suggesters
                .iter()
                .find(|s| s.name() == prev.suggester)
                .map_or(ExitReason::End, |s| exit_reason(prev, state, s));
            vec![exit(prev, reason)]
        }
        (Some(prev), Some(next)) if prev.range.from != next.range.from => {
            if next.range.from > prev.range.from {
                vec![
                    exit(prev, ExitReason::JumpForward),
                    change(next, ChangeReason::JumpForward),
                ]
            } else {
                vec![
                    exit(prev, ExitReason::JumpBackward),
                    change(next, ChangeReason::JumpBackward),
                ]
            }
        }
        (Some(prev), Some(next)) if prev.query.full != next.query.full => {
            vec![change(next, ChangeReason::Change)]
        }
        (Some(prev), Some(next)) if prev.suggester != next.suggester => {
            vec![change(next, ChangeReason::Start)]
        }
        (Some(prev), Some(next)) if prev.range.cursor != next.range.cursor => {
            let reason = if state.selection().is_empty() {
                ChangeReason::Move
            } else {
                ChangeReason::SelectionInside
            };
            vec![change(next, reason)]
        }
        (Some(_), Some(_)) => Vec::new(),
    }
}

fn exit_reason(prev: &SuggestMatch, state: &EditorState, suggester: &Suggester) -> ExitReason {
    let doc = state.doc();
    let range = prev.range;
    if range.from >= range.to || range.from >= doc.content_size() {
        return ExitReason::Delete;
    }

    match find_match(doc, Selection::cursor(range.cursor), suggester) {
        None if starts_at(doc, range.from, suggester) => return ExitReason::Split,
        None => return ExitReason::InvalidSplit,
        Some(recheck) if recheck.text.full != prev.text.full => return ExitReason::Split,
        Some(_) => {}
    }

    let selection = state.selection();
    let cursor = selection.from();
    if !selection.is_empty() && (selection.from() <= range.from || selection.to() >= range.to) {
        ExitReason::SelectionOutside
    } else if cursor > range.to {
        ExitReason::MoveEnd
    } else if cursor <= range.from {
        ExitReason::MoveStart
    } else {
        ExitReason::End
    }
}
