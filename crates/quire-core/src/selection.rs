//! Text selection.

use crate::mapping::{Assoc, Mapping};

/// A text selection given by its anchor (fixed side) and head (moving side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The side that stays put while extending.
    pub anchor: usize,
    /// The side that moves while extending.
    pub head: usize,
}

impl Selection {
    /// Create a selection from `anchor` to `head`.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (cursor) at `pos`.
    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Lower bound.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Returns `true` for a collapsed selection.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Clamp both ends to `size`.
    pub fn clamped(&self, size: usize) -> Self {
        Self::new(self.anchor.min(size), self.head.min(size))
    }

    /// Carry the selection across a mapping.
    pub fn map(&self, mapping: &Mapping) -> Self {
        Self::new(
            mapping.map(self.anchor, Assoc::After),
            mapping.map(self.head, Assoc::After),
        )
    }
}
