#![warn(missing_docs)]
//! Quire Annotation - overlapping range annotations.
//!
//! Annotations (comments, highlights, review notes) are ranges that may overlap arbitrarily.
//! The plugin keeps them positioned while the document is edited and renders them as
//! non-overlapping inline decorations: one per [`Segment`], classed with the class names of every
//! annotation covering it and styled by [`AnnotationOptions::get_style`].
//!
//! Positions are remapped with a forward bias at the start and a backward bias at the end, so
//! text typed right after an annotation stays outside it. Annotations whose content is deleted
//! entirely disappear.
//!
//! # Example
//!
//! ```rust
//! use quire_annotation::{AnnotationData, AnnotationPlugin, add_annotation, annotations_at};
//! use quire_core::{Doc, EditorState, EditorView, Selection};
//!
//! let state = EditorState::builder(Doc::from_text("hello world"))
//!     .selection(Selection::new(0, 5))
//!     .plugin(AnnotationPlugin::default())
//!     .build();
//! let mut view = EditorView::new(state);
//! assert!(view.run(add_annotation("c1", AnnotationData::with_class("comment"))));
//!
//! let found = annotations_at(view.state(), 2, false);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].text, "hello");
//! ```

pub mod annotation;
pub mod commands;
pub mod helpers;
pub mod options;
pub mod plugin;
pub mod segments;
pub mod state;

pub use annotation::{Annotation, AnnotationData, AnnotationWithText, Segment};
pub use commands::{
    add_annotation, redraw_annotations, remove_annotations, set_annotations, update_annotation,
};
pub use helpers::{annotations, annotations_at, selection_has_annotation, shortest_annotation_at};
pub use options::{AnnotationOptions, StyleFn, default_get_style};
pub use plugin::AnnotationPlugin;
pub use segments::to_segments;
pub use state::{AnnotationAction, AnnotationState, SegmentIds};
