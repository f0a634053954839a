//! Document model.
//!
//! A [`Doc`] is a linear sequence of characters stored in a [`ropey::Rope`], addressed by
//! character offsets (Unicode scalar values). Structure is encoded inline:
//!
//! - [`BLOCK_SEPARATOR`] (`'\n'`) ends a text block; its node entry describes the *following*
//!   block.
//! - [`ATOM_CHAR`] (`U+FFFC`) is a leaf node (mention, emoji, image, ...) of size one.
//!
//! Marks live in a separate [`MarkTree`]. Documents are cheap to clone (the rope is shared), so
//! every edit produces a new value instead of mutating in place.

use crate::intervals::{MarkInterval, MarkTree};
use crate::step::StepError;
use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

/// Character separating two text blocks.
pub const BLOCK_SEPARATOR: char = '\n';

/// Placeholder character occupied by an atom (leaf) node.
pub const ATOM_CHAR: char = '\u{FFFC}';

/// An inline mark such as `bold` or `link`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Mark type name.
    pub name: String,
    /// Mark attributes (e.g. `href` for links).
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl Mark {
    /// Create a mark without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Attach an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A block or atom node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Node type name (`paragraph`, `heading`, `mention`, ...).
    pub kind: String,
    /// Node attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl Node {
    /// Create a node without attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// The default text block.
    pub fn paragraph() -> Self {
        Self::new("paragraph")
    }

    /// Attach an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A piece of document content that can be inserted by a replace step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slice {
    text: String,
    len: usize,
    marks: Vec<MarkInterval>,
    nodes: Vec<(usize, Node)>,
}

impl Slice {
    /// An empty slice (used for deletions).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unmarked text. Newlines become paragraph separators.
    pub fn text(text: &str) -> Self {
        let nodes = text
            .chars()
            .enumerate()
            .filter_map(|(idx, ch)| match ch {
                BLOCK_SEPARATOR => Some((idx, Node::paragraph())),
                ATOM_CHAR => Some((idx, Node::new("object"))),
                _ => None,
            })
            .collect();

        Self {
            text: text.to_string(),
            len: text.chars().count(),
            marks: Vec::new(),
            nodes,
        }
    }

    /// Text carrying `marks` over its whole length.
    pub fn marked(text: &str, marks: &[Mark]) -> Self {
        let mut slice = Self::text(text);
        if slice.len > 0 {
            slice.marks = marks
                .iter()
                .map(|mark| MarkInterval::new(0, slice.len, mark.clone()))
                .collect();
        }
        slice
    }

    /// A single atom node.
    pub fn atom(node: Node) -> Self {
        Self {
            text: ATOM_CHAR.to_string(),
            len: 1,
            marks: Vec::new(),
            nodes: vec![(0, node)],
        }
    }

    /// A block break starting a new block of type `node`.
    pub fn block_break(node: Node) -> Self {
        Self {
            text: BLOCK_SEPARATOR.to_string(),
            len: 1,
            marks: Vec::new(),
            nodes: vec![(0, node)],
        }
    }

    /// Size of the slice in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a slice without content.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw text of the slice (atoms appear as [`ATOM_CHAR`]).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Mark intervals relative to the slice start.
    pub fn marks(&self) -> &[MarkInterval] {
        &self.marks
    }

    /// Node entries relative to the slice start.
    pub fn nodes(&self) -> &[(usize, Node)] {
        &self.nodes
    }
}

/// A position resolved against the block structure of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    /// The resolved position.
    pub pos: usize,
    /// First position inside the enclosing text block.
    pub block_start: usize,
    /// Last position inside the enclosing text block.
    pub block_end: usize,
    /// The enclosing text block.
    pub block: Node,
}

impl ResolvedPos {
    /// Offset of the position inside its text block.
    pub fn parent_offset(&self) -> usize {
        self.pos - self.block_start
    }
}

/// An immutable rich-text document.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc {
    text: Rope,
    marks: MarkTree,
    nodes: BTreeMap<usize, Node>,
    root: Node,
}

impl Default for Doc {
    fn default() -> Self {
        Self::new()
    }
}

impl Doc {
    /// An empty document containing a single empty paragraph.
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            marks: MarkTree::new(),
            nodes: BTreeMap::new(),
            root: Node::paragraph(),
        }
    }

    /// Build a document from plain text (one paragraph per line).
    pub fn from_text(text: &str) -> Self {
        Self::from_slice(Node::paragraph(), &Slice::text(text))
    }

    /// Build a document whose first block is `first_block`, filled with `content`.
    pub fn from_slice(first_block: Node, content: &Slice) -> Self {
        Self {
            text: Rope::from_str(&content.text),
            marks: MarkTree::from_intervals(content.marks.clone()),
            nodes: content.nodes.iter().cloned().collect(),
            root: first_block,
        }
    }

    /// Size of the document content in characters.
    pub fn content_size(&self) -> usize {
        self.text.len_chars()
    }

    /// The complete raw text (atoms appear as [`ATOM_CHAR`]).
    pub fn text_content(&self) -> String {
        self.text.to_string()
    }

    /// Text in `from..to`, rendering block breaks as `block_separator` and atoms as `leaf_text`.
    pub fn text_between(
        &self,
        from: usize,
        to: usize,
        block_separator: &str,
        leaf_text: &str,
    ) -> String {
        let size = self.content_size();
        let (from, to) = (from.min(size), to.min(size));
        if from >= to {
            return String::new();
        }

        let mut out = String::with_capacity(to - from);
        for (offset, ch) in self.text.slice(from..to).chars().enumerate() {
            let pos = from + offset;
            match ch {
                BLOCK_SEPARATOR if self.nodes.contains_key(&pos) => out.push_str(block_separator),
                ATOM_CHAR if self.nodes.contains_key(&pos) => out.push_str(leaf_text),
                _ => out.push(ch),
            }
        }
        out
    }

    /// Character at `pos`, if any.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.content_size()).then(|| self.text.char(pos))
    }

    /// Marks covering the character at `pos`.
    pub fn marks_at(&self, pos: usize) -> Vec<Mark> {
        self.marks
            .query_point(pos)
            .into_iter()
            .map(|interval| interval.mark.clone())
            .collect()
    }

    /// Marks covering the character directly before `pos`.
    pub fn marks_before(&self, pos: usize) -> Vec<Mark> {
        match pos.checked_sub(1) {
            Some(prev) => self.marks_at(prev),
            None => Vec::new(),
        }
    }

    /// Marks that text typed at `pos` would inherit.
    ///
    /// At the start of a block the marks of the following character apply, otherwise the marks
    /// of the preceding one.
    pub fn cursor_marks(&self, pos: usize) -> Vec<Mark> {
        let resolved = self.resolve(pos);
        if resolved.parent_offset() == 0 {
            if pos < resolved.block_end {
                return self.marks_at(pos);
            }
            return Vec::new();
        }
        self.marks_before(pos)
    }

    /// Returns `true` if the character at `pos` is a block break.
    pub fn is_block_separator(&self, pos: usize) -> bool {
        self.char_at(pos) == Some(BLOCK_SEPARATOR) && self.nodes.contains_key(&pos)
    }

    /// The atom node occupying `pos`, if any.
    pub fn atom_at(&self, pos: usize) -> Option<&Node> {
        if self.char_at(pos) == Some(ATOM_CHAR) {
            self.nodes.get(&pos)
        } else {
            None
        }
    }

    /// The atom node directly before `pos`.
    pub fn node_before(&self, pos: usize) -> Option<&Node> {
        pos.checked_sub(1).and_then(|prev| self.atom_at(prev))
    }

    /// The atom node directly after `pos`.
    pub fn node_after(&self, pos: usize) -> Option<&Node> {
        self.atom_at(pos)
    }

    /// Resolve `pos` (clamped to the document) to its enclosing text block.
    pub fn resolve(&self, pos: usize) -> ResolvedPos {
        let pos = pos.min(self.content_size());
        let start_separator = self
            .nodes
            .range(..pos)
            .rev()
            .find(|(p, _)| self.text.char(**p) == BLOCK_SEPARATOR);
        let block_end = self
            .nodes
            .range(pos..)
            .find(|(p, _)| self.text.char(**p) == BLOCK_SEPARATOR)
            .map(|(p, _)| *p)
            .unwrap_or_else(|| self.content_size());

        let (block_start, block) = match start_separator {
            Some((p, node)) => (p + 1, node.clone()),
            None => (0, self.root.clone()),
        };

        ResolvedPos {
            pos,
            block_start,
            block_end,
            block,
        }
    }

    /// Number of characters of the grapheme cluster ending at `pos`, within its block.
    pub fn grapheme_len_before(&self, pos: usize) -> usize {
        let resolved = self.resolve(pos);
        let text = self.text_between(resolved.block_start, pos, "\n", "\u{FFFC}");
        text.graphemes(true)
            .next_back()
            .map(|g| g.chars().count())
            .unwrap_or(0)
    }

    /// Copy out `from..to` as a [`Slice`].
    pub fn slice(&self, from: usize, to: usize) -> Slice {
        let size = self.content_size();
        let (from, to) = (from.min(size), to.min(size));
        if from >= to {
            return Slice::empty();
        }

        Slice {
            text: self.text.slice(from..to).to_string(),
            len: to - from,
            marks: self.marks.slice(from, to),
            nodes: self
                .nodes
                .range(from..to)
                .map(|(p, node)| (p - from, node.clone()))
                .collect(),
        }
    }

    /// Returns `true` when both documents have the same text and structure (marks ignored).
    pub fn same_content(&self, other: &Doc) -> bool {
        self.text == other.text && self.nodes == other.nodes && self.root == other.root
    }

    fn check_range(&self, from: usize, to: usize) -> Result<(), StepError> {
        let size = self.content_size();
        if from > to {
            return Err(StepError::InvertedRange { from, to });
        }
        if to > size {
            return Err(StepError::OutOfRange { pos: to, size });
        }
        Ok(())
    }

    /// Replace `from..to` with `slice`.
    pub(crate) fn replace(&self, from: usize, to: usize, slice: &Slice) -> Result<Doc, StepError> {
        self.check_range(from, to)?;

        let mut text = self.text.clone();
        text.remove(from..to);
        text.insert(from, &slice.text);

        let removed = to - from;
        let mut nodes: BTreeMap<usize, Node> = BTreeMap::new();
        for (p, node) in &self.nodes {
            if *p < from {
                nodes.insert(*p, node.clone());
            } else if *p >= to {
                nodes.insert(*p - removed + slice.len, node.clone());
            }
        }
        for (offset, node) in &slice.nodes {
            nodes.insert(from + offset, node.clone());
        }

        Ok(Doc {
            text,
            marks: self.marks.replaced(from, to, slice.len, &slice.marks),
            nodes,
            root: self.root.clone(),
        })
    }

    /// Add `mark` to `from..to`.
    pub(crate) fn add_mark(&self, from: usize, to: usize, mark: &Mark) -> Result<Doc, StepError> {
        self.check_range(from, to)?;
        Ok(Doc {
            marks: self.marks.with_mark(from, to, mark),
            ..self.clone()
        })
    }

    /// Remove `mark` from `from..to`.
    pub(crate) fn remove_mark(
        &self,
        from: usize,
        to: usize,
        mark: &Mark,
    ) -> Result<Doc, StepError> {
        self.check_range(from, to)?;
        Ok(Doc {
            marks: self.marks.without_mark(from, to, mark),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_finds_block_bounds() {
        let doc = Doc::from_text("abc\ndef");
        let first = doc.resolve(2);
        assert_eq!((first.block_start, first.block_end), (0, 3));

        let second = doc.resolve(4);
        assert_eq!((second.block_start, second.block_end), (4, 7));
        assert_eq!(second.block, Node::paragraph());
        assert_eq!(second.parent_offset(), 0);
    }

    #[test]
    fn test_text_between_renders_atoms_and_breaks() {
        let doc = Doc::from_text("ab")
            .replace(1, 1, &Slice::atom(Node::new("mention")))
            .unwrap();
        assert_eq!(doc.content_size(), 3);
        assert_eq!(doc.text_between(0, 3, "|", "\0"), "a\0b");
        let before = doc.node_before(2).map(|n| n.kind.as_str());
        assert_eq!(before, Some("mention"));
        assert!(doc.node_before(1).is_none());
    }

    #[test]
    fn test_replace_shifts_nodes_and_marks() {
        let slice = Slice::marked("hello", &[Mark::new("bold")]);
        let doc = Doc::from_slice(Node::paragraph(), &slice);
        let doc = doc.replace(0, 0, &Slice::text("x\n")).unwrap();
        assert_eq!(doc.text_content(), "x\nhello");
        assert!(doc.is_block_separator(1));
        assert_eq!(doc.marks_at(2), vec![Mark::new("bold")]);
        assert!(doc.marks_at(0).is_empty());
    }

    #[test]
    fn test_grapheme_len_before() {
        let doc = Doc::from_text("ae\u{301}");
        assert_eq!(doc.grapheme_len_before(3), 2);
        assert_eq!(doc.grapheme_len_before(1), 1);
        assert_eq!(doc.grapheme_len_before(0), 0);
    }

    #[test]
    fn test_replace_rejects_out_of_range() {
        let doc = Doc::from_text("abc");
        assert_eq!(
            doc.replace(1, 9, &Slice::empty()),
            Err(StepError::OutOfRange { pos: 9, size: 3 })
        );
    }
}
