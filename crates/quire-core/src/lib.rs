#![warn(missing_docs)]
//! Quire Core - Headless Rich-Text State Kernel
//!
//! # Overview
//!
//! `quire-core` is the document engine the quire extensions plug into. It models a rich-text
//! document as a linear character sequence with marks and block/atom nodes, and provides the
//! machinery extensions need to keep *derived, positional* state in sync with that document:
//! steps, position mapping, transactions, decorations and a plugin host.
//!
//! It does not render anything and does not parse any input format.
//!
//! # Core Features
//!
//! - **Rope-backed documents**: character offsets, `'\n'` block breaks, `U+FFFC` atoms
//! - **Invertible steps**: replace, add mark, remove mark
//! - **Position mapping**: step maps with insertion bias and mirror recovery
//! - **Transactions**: step batches with selection tracking and typed metadata
//! - **Decorations**: inline/widget decorations that follow edits
//! - **Plugin host**: `init` / `apply` reducers plus `append_transaction` and view hooks
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorView (dispatch, commands, subscribe) │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  EditorState + Plugin host                  │  ← Derived state
//! ├─────────────────────────────────────────────┤
//! │  Transaction / Decorations                  │
//! ├─────────────────────────────────────────────┤
//! │  Step + Mapping                             │  ← Change model
//! ├─────────────────────────────────────────────┤
//! │  Doc (Rope + mark intervals + nodes)        │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use quire_core::{Assoc, Doc, EditorState, EditorView, Selection};
//!
//! let state = EditorState::builder(Doc::from_text("Hello world"))
//!     .selection(Selection::cursor(5))
//!     .build();
//! let mut view = EditorView::new(state);
//!
//! let mut tr = view.state().tr();
//! tr.insert_text(",").unwrap();
//! assert_eq!(tr.mapping().map(6, Assoc::After), 7);
//! view.dispatch(tr);
//!
//! assert_eq!(view.state().doc().text_content(), "Hello, world");
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Document model (text, marks, nodes, slices)
//! - [`intervals`] - Mark interval storage
//! - [`mapping`] - Step maps and mappings
//! - [`step`] - Invertible document steps
//! - [`selection`] - Anchor/head selections
//! - [`transaction`] - Transactions and typed metadata
//! - [`decorations`] - Inline and widget decorations
//! - [`state`] - Editor state and the plugin host
//! - [`view`] - Headless view: dispatch, commands, subscriptions
//! - [`commands`] - Command conventions

pub mod commands;
pub mod decorations;
pub mod document;
pub mod intervals;
pub mod mapping;
pub mod selection;
pub mod state;
pub mod step;
pub mod transaction;
pub mod view;

pub use commands::{Dispatch, dispatch_tr, first_command, reborrow};
pub use decorations::{Decoration, DecorationAttrs, DecorationKind, DecorationSet};
pub use document::{ATOM_CHAR, BLOCK_SEPARATOR, Doc, Mark, Node, ResolvedPos, Slice};
pub use intervals::{MarkInterval, MarkTree};
pub use mapping::{Assoc, MapResult, Mapping, Recover, StepMap};
pub use selection::Selection;
pub use state::{AppendedTransaction, ApplyResult, EditorState, EditorStateBuilder, Plugin};
pub use step::{Step, StepError};
pub use transaction::Transaction;
pub use view::{EditorView, ViewUpdate, ViewUpdateCallback};
