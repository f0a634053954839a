#![warn(missing_docs)]
//! Quire Suggest - trigger-character suggestions.
//!
//! # Overview
//!
//! A suggester watches for a trigger such as `@` or `#` followed by query characters and reports
//! when a match around the cursor starts, changes and ends. Several suggesters can share a
//! trigger: each one matches independently, and the highest-priority match wins.
//!
//! # Matching Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SuggesterConfig (serde)                    │  ← Raw configuration
//! ├─────────────────────────────────────────────┤
//! │  Suggester (compiled regexes + handler)     │
//! ├─────────────────────────────────────────────┤
//! │  find_match per suggester                   │  ← Independent matches
//! ├─────────────────────────────────────────────┤
//! │  priority + ignore list → active match      │  ← Resolution
//! ├─────────────────────────────────────────────┤
//! │  change / exit reasons → handlers           │  ← Notification
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use quire_core::{Doc, EditorState, EditorView};
//! use quire_suggest::{SuggestPlugin, SuggesterConfig, active_match};
//!
//! let plugin = SuggestPlugin::from_configs([SuggesterConfig::new("mention", "@")]).unwrap();
//! let state = EditorState::builder(Doc::new()).plugin(plugin).build();
//! let mut view = EditorView::new(state);
//!
//! let mut tr = view.state().tr();
//! tr.insert_text("hi @ann").unwrap();
//! view.dispatch(tr);
//!
//! let found = active_match(view.state()).unwrap();
//! assert_eq!(found.query.full, "ann");
//! assert_eq!((found.range.from, found.range.to), (3, 7));
//! ```

mod char_index;
mod error;

pub mod commands;
pub mod config;
pub mod matcher;
pub mod plugin;
pub mod reason;
pub mod state;
pub mod suggester;

pub use commands::{
    active_match, add_ignored, clear_ignored, ignore_match, ignore_next_exit, remove_ignored,
    suggest_state,
};
pub use config::{CharPattern, SuggesterConfig};
pub use error::SuggestError;
pub use matcher::{MatchRange, MatchValue, SuggestMatch, find_match};
pub use plugin::SuggestPlugin;
pub use reason::{ChangeReason, ExitReason, SuggestChangeProps, SuggestEvent};
pub use state::{IgnoredEntry, SuggestAction, SuggestDecoration, SuggestState};
pub use suggester::{ChangeHandler, Suggester};
