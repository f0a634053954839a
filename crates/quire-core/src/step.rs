//! Document steps.
//!
//! A [`Step`] is an atomic, invertible document change. Steps know how to apply themselves,
//! report their position map, produce their inverse against the document they were applied to,
//! and rebase themselves over a [`Mapping`].

use crate::document::{Doc, Mark, Slice};
use crate::mapping::{Assoc, Mapping, StepMap};
use thiserror::Error;

/// Errors produced when a step cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// A position lies beyond the end of the document.
    #[error("position {pos} is out of range (document size {size})")]
    OutOfRange {
        /// The offending position.
        pos: usize,
        /// The document size.
        size: usize,
    },

    /// A range ends before it starts.
    #[error("invalid range {from}..{to}")]
    InvertedRange {
        /// Range start.
        from: usize,
        /// Range end.
        to: usize,
    },
}

/// An atomic document change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Replace `from..to` with `slice`.
    Replace {
        /// Start of the replaced range.
        from: usize,
        /// End of the replaced range.
        to: usize,
        /// Inserted content.
        slice: Slice,
    },
    /// Add a mark to `from..to`.
    AddMark {
        /// Range start.
        from: usize,
        /// Range end.
        to: usize,
        /// The mark.
        mark: Mark,
    },
    /// Remove a mark from `from..to`.
    RemoveMark {
        /// Range start.
        from: usize,
        /// Range end.
        to: usize,
        /// The mark.
        mark: Mark,
    },
}

impl Step {
    /// Apply the step, returning the new document.
    pub fn apply(&self, doc: &Doc) -> Result<Doc, StepError> {
        match self {
            Step::Replace { from, to, slice } => doc.replace(*from, *to, slice),
            Step::AddMark { from, to, mark } => doc.add_mark(*from, *to, mark),
            Step::RemoveMark { from, to, mark } => doc.remove_mark(*from, *to, mark),
        }
    }

    /// The position map of this step. Mark steps do not move positions.
    pub fn get_map(&self) -> StepMap {
        match self {
            Step::Replace { from, to, slice } => StepMap::replace(*from, to - from, slice.len()),
            Step::AddMark { .. } | Step::RemoveMark { .. } => StepMap::empty(),
        }
    }

    /// The step that undoes this one, given the document it was applied to.
    pub fn invert(&self, doc: &Doc) -> Step {
        match self {
            Step::Replace { from, to, slice } => Step::Replace {
                from: *from,
                to: from + slice.len(),
                slice: doc.slice(*from, *to),
            },
            Step::AddMark { from, to, mark } => Step::RemoveMark {
                from: *from,
                to: *to,
                mark: mark.clone(),
            },
            Step::RemoveMark { from, to, mark } => Step::AddMark {
                from: *from,
                to: *to,
                mark: mark.clone(),
            },
        }
    }

    /// Rebase the step over `mapping`. Returns `None` when the step's range was deleted.
    pub fn map(&self, mapping: &Mapping) -> Option<Step> {
        match self {
            Step::Replace { from, to, slice } => {
                let from = mapping.map_result(*from, Assoc::After);
                let to = mapping.map_result(*to, Assoc::Before);
                if from.deleted_across() && to.deleted_across() {
                    return None;
                }
                Some(Step::Replace {
                    from: from.pos,
                    to: from.pos.max(to.pos),
                    slice: slice.clone(),
                })
            }
            Step::AddMark { from, to, mark } => {
                let (from, to) = map_mark_range(*from, *to, mapping)?;
                Some(Step::AddMark {
                    from,
                    to,
                    mark: mark.clone(),
                })
            }
            Step::RemoveMark { from, to, mark } => {
                let (from, to) = map_mark_range(*from, *to, mapping)?;
                Some(Step::RemoveMark {
                    from,
                    to,
                    mark: mark.clone(),
                })
            }
        }
    }
}

fn map_mark_range(from: usize, to: usize, mapping: &Mapping) -> Option<(usize, usize)> {
    let from = mapping.map_result(from, Assoc::After);
    let to = mapping.map_result(to, Assoc::Before);
    if (from.deleted() && to.deleted()) || from.pos >= to.pos {
        return None;
    }
    Some((from.pos, to.pos))
}
