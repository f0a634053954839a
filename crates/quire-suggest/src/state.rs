//! Suggest plugin state and metadata.

use crate::matcher::SuggestMatch;
use crate::reason::SuggestChangeProps;
use quire_core::DecorationSet;

/// An ignored trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredEntry {
    /// Suggester that ignored it.
    pub name: String,
    /// The trigger text.
    pub char: String,
    /// Only ignore for `name`; otherwise every suggester with the same trigger text is ignored.
    pub specific: bool,
}

/// Suggest metadata attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestAction {
    /// Ignore the trigger occupying `from..to`.
    AddIgnored {
        /// Trigger start.
        from: usize,
        /// Trigger end.
        to: usize,
        /// What to ignore.
        entry: IgnoredEntry,
    },
    /// Stop ignoring the trigger at `from` for `name`.
    RemoveIgnored {
        /// Trigger start.
        from: usize,
        /// Suggester name.
        name: String,
    },
    /// Drop every ignored trigger, or only those of one suggester.
    ClearIgnored(Option<String>),
    /// Do not report the next exit.
    IgnoreNextExit,
}

/// Spec of a suggest decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestDecoration {
    /// The active match of the named suggester.
    Active(String),
    /// An ignored trigger.
    Ignored(IgnoredEntry),
}

/// Suggest plugin state.
#[derive(Debug, Clone, Default)]
pub struct SuggestState {
    pub(crate) matches: Vec<Option<SuggestMatch>>,
    pub(crate) active: Option<SuggestMatch>,
    pub(crate) events: Vec<SuggestChangeProps>,
    pub(crate) ignored: DecorationSet<IgnoredEntry>,
    pub(crate) ignore_next_exit: bool,
    pub(crate) decorations: DecorationSet<SuggestDecoration>,
}

impl SuggestState {
    /// Each suggester's own match, in priority order.
    pub fn matches(&self) -> &[Option<SuggestMatch>] {
        &self.matches
    }

    /// The winning match.
    pub fn active(&self) -> Option<&SuggestMatch> {
        self.active.as_ref()
    }

    /// Changes and exits produced by the last transaction.
    pub fn events(&self) -> &[SuggestChangeProps] {
        &self.events
    }

    /// Ignored triggers.
    pub fn ignored(&self) -> &DecorationSet<IgnoredEntry> {
        &self.ignored
    }

    /// Returns `true` while the next exit is to be swallowed.
    pub fn ignores_next_exit(&self) -> bool {
        self.ignore_next_exit
    }

    /// Active-match and ignored-trigger decorations.
    pub fn decorations(&self) -> &DecorationSet<SuggestDecoration> {
        &self.decorations
    }

    /// Returns `true` if `suggest_match` starts at an ignored trigger.
    pub fn is_ignored(&self, suggest_match: &SuggestMatch) -> bool {
        is_ignored(&self.ignored, suggest_match)
    }
}

pub(crate) fn is_ignored(
    ignored: &DecorationSet<IgnoredEntry>,
    suggest_match: &SuggestMatch,
) -> bool {
    let from = suggest_match.range.from;
    ignored.find(from, from).into_iter().any(|d| {
        d.from == from
            && if d.spec.specific {
                d.spec.name == suggest_match.suggester
            } else {
                d.spec.char == suggest_match.char
            }
    })
}
