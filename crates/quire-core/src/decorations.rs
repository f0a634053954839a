//! Decorations.
//!
//! Decorations are UI-facing annotations anchored to document positions without modifying the
//! document. They are derived plugin state: extensions rebuild them when their own state changes
//! and otherwise carry them across transactions with [`DecorationSet::map`].
//!
//! - **Inline** decorations style the half-open range `from..to`.
//! - **Widget** decorations sit at a single position (`from == to`).
//!
//! Each decoration carries a typed `spec` payload so the owning extension can find its own
//! decorations again (e.g. the suggester name of an ignored match).

use crate::mapping::{Assoc, Mapping};
use std::collections::BTreeMap;

/// Rendering attributes of a decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationAttrs {
    /// CSS class names (space-separated).
    pub class: Option<String>,
    /// Inline CSS style.
    pub style: Option<String>,
    /// Wrapper element name (e.g. `span`).
    pub node_name: Option<String>,
    /// Additional attributes (e.g. `data-*`).
    pub data: BTreeMap<String, String>,
}

impl DecorationAttrs {
    /// Attributes with only a class.
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// Set the wrapper element name.
    pub fn with_node_name(mut self, name: impl Into<String>) -> Self {
        self.node_name = Some(name.into());
        self
    }

    /// Set the inline style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Decoration shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    /// Styles `from..to`.
    Inline {
        /// Content inserted at `from` becomes part of the decoration.
        inclusive_start: bool,
        /// Content inserted at `to` becomes part of the decoration.
        inclusive_end: bool,
    },
    /// Renders at `from` (`to == from`).
    Widget {
        /// Negative sides stick to content before the position, others to content after.
        side: i32,
    },
}

/// A single decoration with a typed spec payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration<S = ()> {
    /// Start position.
    pub from: usize,
    /// End position (equal to `from` for widgets).
    pub to: usize,
    /// Shape.
    pub kind: DecorationKind,
    /// Rendering attributes.
    pub attrs: DecorationAttrs,
    /// Owner-defined payload.
    pub spec: S,
}

impl<S> Decoration<S> {
    /// An exclusive inline decoration.
    pub fn inline(from: usize, to: usize, attrs: DecorationAttrs, spec: S) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Inline {
                inclusive_start: false,
                inclusive_end: false,
            },
            attrs,
            spec,
        }
    }

    /// A widget at `pos`.
    pub fn widget(pos: usize, side: i32, attrs: DecorationAttrs, spec: S) -> Self {
        Self {
            from: pos,
            to: pos,
            kind: DecorationKind::Widget { side },
            attrs,
            spec,
        }
    }

    /// Set inline inclusivity. No effect on widgets.
    pub fn inclusive(mut self, start: bool, end: bool) -> Self {
        if let DecorationKind::Inline { .. } = self.kind {
            self.kind = DecorationKind::Inline {
                inclusive_start: start,
                inclusive_end: end,
            };
        }
        self
    }

    /// Carry the decoration across `mapping`; `None` when its range was deleted.
    pub fn map(self, mapping: &Mapping) -> Option<Self> {
        match self.kind {
            DecorationKind::Inline {
                inclusive_start,
                inclusive_end,
            } => {
                let from = mapping.map(self.from, assoc(inclusive_start));
                let to = mapping.map(self.to, assoc(!inclusive_end));
                (from < to).then_some(Self { from, to, ..self })
            }
            DecorationKind::Widget { side } => {
                let result = mapping.map_result(self.from, assoc(side < 0));
                (!result.deleted()).then_some(Self {
                    from: result.pos,
                    to: result.pos,
                    ..self
                })
            }
        }
    }
}

/// An ordered collection of decorations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSet<S = ()> {
    decorations: Vec<Decoration<S>>,
}

impl<S> Default for DecorationSet<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> DecorationSet<S> {
    /// An empty set.
    pub fn empty() -> Self {
        Self {
            decorations: Vec::new(),
        }
    }

    /// Build a set from decorations in any order.
    pub fn new(mut decorations: Vec<Decoration<S>>) -> Self {
        decorations.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));
        Self { decorations }
    }

    /// Number of decorations.
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// All decorations in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Decoration<S>> {
        self.decorations.iter()
    }

    /// Decorations touching `from..=to`.
    pub fn find(&self, from: usize, to: usize) -> Vec<&Decoration<S>> {
        let end = self.decorations.partition_point(|d| d.from <= to);
        self.decorations[..end]
            .iter()
            .filter(|d| d.to >= from)
            .collect()
    }

    /// Carry every decoration across `mapping`, dropping deleted ones.
    pub fn map(&self, mapping: &Mapping) -> Self
    where
        S: Clone,
    {
        Self::new(
            self.decorations
                .iter()
                .cloned()
                .filter_map(|d| d.map(mapping))
                .collect(),
        )
    }

    /// A new set with `decorations` added.
    pub fn add(&self, decorations: Vec<Decoration<S>>) -> Self
    where
        S: Clone,
    {
        let mut all = self.decorations.clone();
        all.extend(decorations);
        Self::new(all)
    }

    /// A new set without the decorations matching `predicate`.
    pub fn remove(&self, predicate: impl Fn(&Decoration<S>) -> bool) -> Self
    where
        S: Clone,
    {
        Self {
            decorations: self
                .decorations
                .iter()
                .filter(|d| !predicate(d))
                .cloned()
                .collect(),
        }
    }
}

fn assoc(before: bool) -> Assoc {
    if before { Assoc::Before } else { Assoc::After }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::StepMap;

    #[test]
    fn test_inline_decoration_is_exclusive_by_default() {
        let decoration = Decoration::inline(2, 5, DecorationAttrs::default(), ());
        let set = DecorationSet::new(vec![decoration]);
        let mapping = Mapping::from_maps(vec![StepMap::from_ranges(&[(2, 0, 1), (5, 0, 1)])]);
        let mapped = set.map(&mapping);
        let d = mapped.iter().next().unwrap();
        assert_eq!((d.from, d.to), (3, 6));
    }

    #[test]
    fn test_inclusive_decoration_grows() {
        let deco = Decoration::inline(2, 5, DecorationAttrs::default(), ()).inclusive(true, true);
        let mapping = Mapping::from_maps(vec![StepMap::from_ranges(&[(2, 0, 1), (5, 0, 1)])]);
        let mapped = deco.map(&mapping).unwrap();
        assert_eq!((mapped.from, mapped.to), (2, 7));
    }

    #[test]
    fn test_deleted_ranges_are_dropped() {
        let set = DecorationSet::new(vec![
            Decoration::inline(1, 3, DecorationAttrs::default(), 1),
            Decoration::widget(7, 0, DecorationAttrs::default(), 2),
        ]);
        let mapping = Mapping::from_maps(vec![StepMap::replace(0, 4, 0)]);
        let mapped = set.map(&mapping);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped.iter().next().map(|d| (d.from, d.spec)), Some((3, 2)));
    }

    #[test]
    fn test_find_touching_range() {
        let set = DecorationSet::new(vec![
            Decoration::inline(0, 2, DecorationAttrs::default(), "a"),
            Decoration::inline(4, 6, DecorationAttrs::default(), "b"),
        ]);
        let found: Vec<_> = set.find(2, 3).iter().map(|d| d.spec).collect();
        assert_eq!(found, vec!["a"]);
        assert!(set.remove(|d| d.spec == "a").find(0, 1).is_empty());
    }
}
