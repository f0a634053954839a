//! Segment builder.
//!
//! Turns possibly-overlapping annotations into ascending, non-overlapping [`Segment`]s, each
//! carrying the exact set of annotations covering it. Runs in `O(B log B + A)` for `B` distinct
//! boundaries and `A` annotations (plus the cost of copying active sets into segments).

use crate::annotation::{Annotation, Segment};
use std::collections::BTreeMap;

enum Boundary<'a> {
    Start(&'a Annotation),
    End(&'a Annotation),
}

/// Compute the non-overlapping segments of `annotations`.
///
/// Positions covered by no annotation produce no segment. Annotations with an empty or inverted
/// range are ignored.
pub fn to_segments(annotations: &[Annotation]) -> Vec<Segment> {
    let mut boundaries: BTreeMap<usize, Vec<Boundary<'_>>> = BTreeMap::new();
    for annotation in annotations.iter().filter(|a| a.from < a.to) {
        boundaries
            .entry(annotation.from)
            .or_default()
            .push(Boundary::Start(annotation));
        boundaries
            .entry(annotation.to)
            .or_default()
            .push(Boundary::End(annotation));
    }

    let mut segments = Vec::new();
    let mut active: Vec<&Annotation> = Vec::new();
    let mut previous: Option<usize> = None;

    for (pos, events) in boundaries {
        if let Some(start) = previous
            && !active.is_empty()
        {
            segments.push(Segment {
                from: start,
                to: pos,
                annotations: active.iter().map(|a| (*a).clone()).collect(),
            });
        }

        for event in &events {
            if let Boundary::Start(annotation) = event {
                active.push(*annotation);
            }
        }
        for event in &events {
            if let Boundary::End(annotation) = event {
                active.retain(|a| a.id != annotation.id);
            }
        }

        previous = Some(pos);
    }

    segments
}
