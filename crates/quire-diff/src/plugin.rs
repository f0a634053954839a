//! Diff plugin.
//!
//! Tracks every document change in a [`TrackState`], commits on request (via [`DiffAction`]
//! metadata), highlights the blame spans of selected commits and reports which commits the
//! selection or the pointer is over.

use crate::options::{CommitRange, DiffOptions};
use crate::track::{Span, TrackState};
use quire_core::{
    Decoration, DecorationAttrs, DecorationSet, EditorState, EditorView, Plugin, Transaction,
};
use std::collections::BTreeSet;

/// Diff metadata attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAction {
    /// Commit pending edits (including the ones in this transaction) with a message.
    Commit(String),
    /// Highlight a commit's blame spans.
    Highlight(usize),
    /// Stop highlighting a commit.
    RemoveHighlight(usize),
}

/// Diff plugin state.
#[derive(Debug, Clone)]
pub struct DiffState {
    tracked: TrackState,
    highlighted: BTreeSet<usize>,
    decorations: DecorationSet<usize>,
}

impl DiffState {
    /// The change tracking state.
    pub fn tracked(&self) -> &TrackState {
        &self.tracked
    }

    /// Highlighted commit indices.
    pub fn highlighted(&self) -> &BTreeSet<usize> {
        &self.highlighted
    }

    /// Highlight decorations; the spec of each is its commit index.
    pub fn decorations(&self) -> &DecorationSet<usize> {
        &self.decorations
    }
}

/// Change tracking plugin.
#[derive(Debug, Default)]
pub struct DiffPlugin {
    options: DiffOptions,
}

impl DiffPlugin {
    /// Create the plugin.
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// The plugin options.
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    fn highlight_decorations(
        &self,
        tracked: &TrackState,
        highlighted: &BTreeSet<usize>,
    ) -> DecorationSet<usize> {
        DecorationSet::new(
            tracked
                .blame_map()
                .iter()
                .filter_map(|span| {
                    let commit = span.commit.filter(|c| highlighted.contains(c))?;
                    Some(Decoration::inline(
                        span.from,
                        span.to,
                        DecorationAttrs::class(self.options.blame_marker_class.clone()),
                        commit,
                    ))
                })
                .collect(),
        )
    }

    /// Report the commit under `pos` to the hover handler. Returns `true` if there was one.
    pub fn mouse_over(&self, state: &EditorState, pos: usize) -> bool {
        match commit_at(state, pos) {
            Some(range) => {
                if let Some(handler) = &self.options.on_mouse_over_commit {
                    handler(&range);
                }
                true
            }
            None => false,
        }
    }

    /// Report leaving the commit under `pos`. Returns `true` if there was one.
    pub fn mouse_leave(&self, state: &EditorState, pos: usize) -> bool {
        match commit_at(state, pos) {
            Some(range) => {
                if let Some(handler) = &self.options.on_mouse_leave_commit {
                    handler(&range);
                }
                true
            }
            None => false,
        }
    }
}

fn to_range(span: &Span) -> Option<CommitRange> {
    Some(CommitRange {
        commit: span.commit?,
        from: span.from,
        to: span.to,
    })
}

fn commit_at(state: &EditorState, pos: usize) -> Option<CommitRange> {
    let value = state.plugin_state::<DiffPlugin>()?;
    value
        .tracked
        .blame_map()
        .iter()
        .filter(|span| span.from <= pos && pos < span.to)
        .find_map(to_range)
}

/// Commits whose blame spans intersect the selection (or touch the cursor).
pub fn selected_commits(state: &EditorState) -> Vec<CommitRange> {
    let Some(value) = state.plugin_state::<DiffPlugin>() else {
        return Vec::new();
    };
    let selection = state.selection();
    let (from, to) = (selection.from(), selection.to());
    value
        .tracked
        .blame_map()
        .iter()
        .filter(|span| {
            if from == to {
                span.from <= from && from <= span.to
            } else {
                span.from < to && from < span.to
            }
        })
        .filter_map(to_range)
        .collect()
}

impl Plugin for DiffPlugin {
    type State = DiffState;

    fn name(&self) -> &str {
        "diff"
    }

    fn init(&self, state: &EditorState) -> DiffState {
        DiffState {
            tracked: TrackState::new(state.doc()),
            highlighted: BTreeSet::new(),
            decorations: DecorationSet::empty(),
        }
    }

    fn apply(
        &self,
        tr: &Transaction,
        value: &DiffState,
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) -> DiffState {
        let mut tracked = if tr.doc_changed() {
            value.tracked.apply_transform(tr)
        } else {
            value.tracked.clone()
        };

        let mut highlighted = value.highlighted.clone();
        let highlight_changed = match tr.get_meta::<DiffAction>() {
            Some(DiffAction::Commit(message)) => {
                tracked = tracked.apply_commit(message, tr.time());
                false
            }
            Some(DiffAction::Highlight(commit)) => highlighted.insert(*commit),
            Some(DiffAction::RemoveHighlight(commit)) => highlighted.remove(commit),
            None => false,
        };

        let decorations = if highlight_changed {
            self.highlight_decorations(&tracked, &highlighted)
        } else if tr.doc_changed() {
            value.decorations.map(tr.mapping())
        } else {
            value.decorations.clone()
        };

        DiffState {
            tracked,
            highlighted,
            decorations,
        }
    }

    fn update(&self, view: &EditorView, prev_state: &EditorState) {
        let current = selected_commits(view.state());
        let previous = selected_commits(prev_state);
        if current == previous {
            return;
        }

        if current.is_empty() {
            log::trace!("selection left {} commit span(s)", previous.len());
            if let Some(handler) = &self.options.on_deselect_commits {
                handler(&previous);
            }
        } else if let Some(handler) = &self.options.on_select_commits {
            handler(&current, &previous);
        }
    }
}
