#![warn(missing_docs)]
//! Quire Composition - IME deletion guard.
//!
//! Android keyboards handle backspace inside composed text by deleting and then re-positioning
//! the selection themselves, which goes wrong next to marks and atom nodes. The guard performs
//! those deletions itself and, once the IME reports the resulting selection, corrects the one
//! selection-only transaction that follows.
//!
//! # Example
//!
//! ```rust
//! use quire_core::{Doc, EditorState, EditorView, Node, Selection, Slice};
//! use quire_composition::{
//!     CompositionPlugin, composition_state, delete_content_backward, end_delete,
//! };
//!
//! let mut doc_tr = EditorState::builder(Doc::from_text("hi ")).build().tr();
//! doc_tr.insert(3, Slice::atom(Node::new("mention"))).unwrap();
//!
//! let state = EditorState::builder(doc_tr.doc().clone())
//!     .selection(Selection::cursor(4))
//!     .plugin(CompositionPlugin::new())
//!     .build();
//! let mut view = EditorView::new(state);
//!
//! assert!(view.run(delete_content_backward()));
//! assert_eq!(view.state().doc().text_content(), "hi ");
//! assert!(composition_state(view.state()).delete_in_progress);
//!
//! assert!(view.run(end_delete(Selection::cursor(3))));
//! assert_eq!(composition_state(view.state()).selection, Some(Selection::cursor(3)));
//! ```

pub mod commands;
pub mod phase;
pub mod plugin;

pub use commands::{delete_content_backward, end_delete};
pub use phase::{CompositionEvent, CompositionPhase, CompositionState};
pub use plugin::{CompositionPlugin, composition_phase, composition_state};
