#![warn(missing_docs)]
//! Quire Diff - commit history, blame and revert.
//!
//! Every document change is recorded as inverted steps. Committing packages the pending steps
//! into an immutable [`Commit`]; the blame map attributes each range of the document to the
//! commit that last changed it. Any commit can later be reverted by replaying its inverted steps,
//! rebased over everything committed after it.
//!
//! # Example
//!
//! ```rust
//! use quire_core::{Doc, EditorState, EditorView, Selection};
//! use quire_diff::{DiffPlugin, commit_change, commits, revert_commit};
//!
//! let state = EditorState::builder(Doc::from_text("hello"))
//!     .selection(Selection::cursor(5))
//!     .plugin(DiffPlugin::default())
//!     .build();
//! let mut view = EditorView::new(state);
//!
//! let mut tr = view.state().tr();
//! tr.insert_text(" world").unwrap();
//! view.dispatch(tr);
//! assert!(view.run(commit_change("greet the world")));
//!
//! assert!(view.run(revert_commit(None)));
//! assert_eq!(view.state().doc().text_content(), "hello");
//! assert_eq!(commits(view.state())[1].message, "Revert: 'greet the world'");
//! ```

mod error;

pub mod commands;
pub mod options;
pub mod plugin;
pub mod track;

pub use commands::{
    blame_map, commit, commit_change, commits, highlight_commit, remove_highlighted_commit,
    revert_commit,
};
pub use error::RevertError;
pub use options::{
    CommitHoverHandler, CommitRange, DeselectCommitsHandler, DiffOptions, SelectCommitsHandler,
};
pub use plugin::{DiffAction, DiffPlugin, DiffState, selected_commits};
pub use track::{Commit, CommitId, Span, TrackState};
