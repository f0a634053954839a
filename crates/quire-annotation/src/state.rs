//! Annotation store.
//!
//! [`AnnotationState`] is the plugin state: the authoritative annotation list plus the
//! decorations derived from it. Storage is shared (`Arc`) so a transaction that neither edits
//! the document nor carries an [`AnnotationAction`] hands back the very same allocations.

use crate::annotation::{Annotation, AnnotationData};
use crate::options::AnnotationOptions;
use crate::segments::to_segments;
use quire_core::{Assoc, Decoration, DecorationAttrs, DecorationSet, Transaction};
use std::sync::Arc;

/// Decoration spec: ids of the annotations covering the decorated segment.
pub type SegmentIds = Vec<String>;

/// An annotation change, attached to a transaction as metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationAction {
    /// Add an annotation.
    Add(Annotation),
    /// Merge data into the first annotation with `id`.
    Update {
        /// Target id.
        id: String,
        /// Fields to merge.
        data: AnnotationData,
    },
    /// Remove every annotation whose id is listed.
    Remove(Vec<String>),
    /// Replace the whole list. Positions must already be valid for the new document.
    Set(Vec<Annotation>),
    /// Recompute decorations without changing annotations.
    Redraw,
}

/// Annotation plugin state.
#[derive(Debug, Clone, Default)]
pub struct AnnotationState {
    annotations: Arc<Vec<Annotation>>,
    decorations: Arc<DecorationSet<SegmentIds>>,
}

impl AnnotationState {
    /// State holding `annotations`, with decorations computed.
    pub fn new(annotations: Vec<Annotation>, options: &AnnotationOptions) -> Self {
        let decorations = build_decorations(&annotations, options);
        Self {
            annotations: Arc::new(annotations),
            decorations: Arc::new(decorations),
        }
    }

    /// Current annotations (positions valid for the current document).
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Current decorations, one per segment.
    pub fn decorations(&self) -> &DecorationSet<SegmentIds> {
        &self.decorations
    }

    /// Returns `true` if both states share storage.
    pub fn ptr_eq(&self, other: &AnnotationState) -> bool {
        Arc::ptr_eq(&self.annotations, &other.annotations)
            && Arc::ptr_eq(&self.decorations, &other.decorations)
    }

    /// Carry the state across `tr`, applying `action` if present.
    pub fn apply(
        &self,
        tr: &Transaction,
        action: Option<&AnnotationAction>,
        options: &AnnotationOptions,
    ) -> Self {
        if action.is_none() && !tr.doc_changed() {
            return self.clone();
        }

        let mapping = tr.mapping();
        let mut annotations: Vec<Annotation> = if tr.doc_changed() {
            self.annotations
                .iter()
                .filter_map(|annotation| {
                    let from = mapping.map(annotation.from, Assoc::After);
                    let to = mapping.map(annotation.to, Assoc::Before);
                    (from < to).then(|| Annotation {
                        from,
                        to,
                        ..annotation.clone()
                    })
                })
                .collect()
        } else {
            self.annotations.as_ref().clone()
        };

        let Some(action) = action else {
            log::trace!("remapped {} annotation(s)", annotations.len());
            return Self {
                annotations: Arc::new(annotations),
                decorations: Arc::new(self.decorations.map(mapping)),
            };
        };

        match action {
            AnnotationAction::Add(annotation) => annotations.push(annotation.clone()),
            AnnotationAction::Update { id, data } => {
                match annotations.iter_mut().find(|a| a.id == *id) {
                    Some(annotation) => annotation.merge(data),
                    None => log::debug!("update of unknown annotation `{id}` ignored"),
                }
            }
            AnnotationAction::Remove(ids) => annotations.retain(|a| !ids.contains(&a.id)),
            AnnotationAction::Set(list) => annotations = list.clone(),
            AnnotationAction::Redraw => {}
        }

        Self::new(annotations, options)
    }
}

fn build_decorations(
    annotations: &[Annotation],
    options: &AnnotationOptions,
) -> DecorationSet<SegmentIds> {
    let decorations = to_segments(annotations)
        .into_iter()
        .map(|segment| {
            let classes: Vec<&str> = segment
                .annotations
                .iter()
                .filter_map(|a| a.data.class_name.as_deref())
                .filter(|class| !class.is_empty())
                .collect();
            let attrs = DecorationAttrs {
                class: (!classes.is_empty()).then(|| classes.join(" ")),
                style: (options.get_style)(&segment.annotations),
                node_name: Some("span".to_string()),
                ..DecorationAttrs::default()
            };
            let ids = segment.annotations.iter().map(|a| a.id.clone()).collect();
            Decoration::inline(segment.from, segment.to, attrs, ids)
        })
        .collect();
    DecorationSet::new(decorations)
}
