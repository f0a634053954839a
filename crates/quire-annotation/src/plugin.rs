//! Annotation plugin.

use crate::annotation::{Annotation, AnnotationWithText};
use crate::options::AnnotationOptions;
use crate::state::{AnnotationAction, AnnotationState};
use quire_core::{Doc, EditorState, Plugin, Transaction};

/// Plugin keeping [`AnnotationState`] in sync with the document.
#[derive(Debug, Default)]
pub struct AnnotationPlugin {
    options: AnnotationOptions,
}

impl AnnotationPlugin {
    /// Create the plugin.
    pub fn new(options: AnnotationOptions) -> Self {
        Self { options }
    }

    /// The plugin options.
    pub fn options(&self) -> &AnnotationOptions {
        &self.options
    }

    pub(crate) fn with_text(&self, doc: &Doc, annotation: &Annotation) -> AnnotationWithText {
        AnnotationWithText {
            text: doc.text_between(
                annotation.from,
                annotation.to,
                &self.options.block_separator,
                &self.options.leaf_text,
            ),
            annotation: annotation.clone(),
        }
    }
}

impl Plugin for AnnotationPlugin {
    type State = AnnotationState;

    fn name(&self) -> &str {
        "annotation"
    }

    fn init(&self, _state: &EditorState) -> AnnotationState {
        AnnotationState::default()
    }

    fn apply(
        &self,
        tr: &Transaction,
        value: &AnnotationState,
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) -> AnnotationState {
        value.apply(tr, tr.get_meta::<AnnotationAction>(), &self.options)
    }
}
