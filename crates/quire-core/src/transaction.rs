//! Transactions.
//!
//! A [`Transaction`] accumulates steps against a starting document, keeps the intermediate
//! documents (so steps can be inverted later), the combined [`Mapping`], the selection and a
//! typed metadata side channel. Plugins read metadata by payload type, so each extension owns its
//! own meta enum and nobody else can accidentally interpret it.

use crate::document::{Doc, Mark, Slice};
use crate::mapping::Mapping;
use crate::selection::Selection;
use crate::step::{Step, StepError};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A batch of steps plus selection and metadata, applied atomically to an editor state.
pub struct Transaction {
    doc_before: Doc,
    doc: Doc,
    docs: Vec<Doc>,
    steps: Vec<Step>,
    mapping: Mapping,
    selection: Selection,
    selection_set: bool,
    meta: HashMap<TypeId, Box<dyn Any>>,
    time: u64,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("steps", &self.steps)
            .field("selection", &self.selection)
            .field("selection_set", &self.selection_set)
            .field("meta_count", &self.meta.len())
            .field("time", &self.time)
            .finish()
    }
}

impl Transaction {
    /// Start a transaction on `doc` with the given selection.
    pub fn new(doc: Doc, selection: Selection) -> Self {
        let selection = selection.clamped(doc.content_size());
        Self {
            doc_before: doc.clone(),
            doc,
            docs: Vec::new(),
            steps: Vec::new(),
            mapping: Mapping::new(),
            selection,
            selection_set: false,
            meta: HashMap::new(),
            time: now_millis(),
        }
    }

    /// The document before any step of this transaction.
    pub fn doc_before(&self) -> &Doc {
        &self.doc_before
    }

    /// The current document.
    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    /// The document before each step (`docs()[i]` is the input of `steps()[i]`).
    pub fn docs(&self) -> &[Doc] {
        &self.docs
    }

    /// The steps applied so far.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Mapping from `doc_before` positions to current positions.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Returns `true` if at least one step was applied.
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Current selection (mapped through every step).
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns `true` if the selection was set explicitly.
    pub fn selection_set(&self) -> bool {
        self.selection_set
    }

    /// Timestamp in milliseconds since the Unix epoch.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Override the timestamp.
    pub fn set_time(&mut self, time: u64) -> &mut Self {
        self.time = time;
        self
    }

    /// Try to apply a step. On failure the transaction is left untouched.
    pub fn maybe_step(&mut self, step: Step) -> Result<&Doc, StepError> {
        let doc = step.apply(&self.doc)?;
        let map = step.get_map();
        self.selection = self
            .selection
            .map(&Mapping::from_maps(vec![map.clone()]))
            .clamped(doc.content_size());
        self.mapping.append_map(map, None);
        self.docs.push(std::mem::replace(&mut self.doc, doc));
        self.steps.push(step);
        Ok(&self.doc)
    }

    /// Apply a step.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, StepError> {
        self.maybe_step(step)?;
        Ok(self)
    }

    /// Replace `from..to` with `slice`.
    pub fn replace(
        &mut self,
        from: usize,
        to: usize,
        slice: Slice,
    ) -> Result<&mut Self, StepError> {
        if from == to && slice.is_empty() {
            return Ok(self);
        }
        self.step(Step::Replace { from, to, slice })
    }

    /// Insert `slice` at `pos`.
    pub fn insert(&mut self, pos: usize, slice: Slice) -> Result<&mut Self, StepError> {
        self.replace(pos, pos, slice)
    }

    /// Delete `from..to`.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, StepError> {
        self.replace(from, to, Slice::empty())
    }

    /// Replace `from..to` with `text`, inheriting the marks active at `from`.
    pub fn insert_text_at(
        &mut self,
        text: &str,
        from: usize,
        to: usize,
    ) -> Result<&mut Self, StepError> {
        let marks = self.doc.cursor_marks(from);
        self.replace(from, to, Slice::marked(text, &marks))
    }

    /// Replace the selection with `text` and place the cursor after it.
    pub fn insert_text(&mut self, text: &str) -> Result<&mut Self, StepError> {
        let (from, to) = (self.selection.from(), self.selection.to());
        self.insert_text_at(text, from, to)?;
        let end = from + text.chars().count();
        Ok(self.set_selection(Selection::cursor(end)))
    }

    /// Add `mark` to `from..to`.
    pub fn add_mark(&mut self, from: usize, to: usize, mark: Mark) -> Result<&mut Self, StepError> {
        self.step(Step::AddMark { from, to, mark })
    }

    /// Remove `mark` from `from..to`.
    pub fn remove_mark(
        &mut self,
        from: usize,
        to: usize,
        mark: Mark,
    ) -> Result<&mut Self, StepError> {
        self.step(Step::RemoveMark { from, to, mark })
    }

    /// Set the selection explicitly.
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection.clamped(self.doc.content_size());
        self.selection_set = true;
        self
    }

    /// Attach a metadata payload. One payload per type; a second call replaces the first.
    pub fn set_meta<T: Any>(&mut self, value: T) -> &mut Self {
        self.meta.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Read the metadata payload of type `T`.
    pub fn get_meta<T: Any>(&self) -> Option<&T> {
        self.meta
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns `true` if a payload of type `T` is attached.
    pub fn has_meta<T: Any>(&self) -> bool {
        self.meta.contains_key(&TypeId::of::<T>())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_follows_steps() {
        let mut tr = Transaction::new(Doc::from_text("hello"), Selection::cursor(5));
        tr.insert(0, Slice::text(">> ")).unwrap();
        assert_eq!(tr.selection(), Selection::cursor(8));
        assert!(!tr.selection_set());

        tr.delete(0, 3).unwrap();
        assert_eq!(tr.selection(), Selection::cursor(5));
        assert_eq!(tr.docs().len(), 2);
    }

    #[test]
    fn test_failed_step_leaves_transaction_untouched() {
        let mut tr = Transaction::new(Doc::from_text("abc"), Selection::cursor(0));
        let step = Step::Replace {
            from: 2,
            to: 10,
            slice: Slice::empty(),
        };
        assert!(tr.maybe_step(step).is_err());
        assert!(!tr.doc_changed());
        assert_eq!(tr.doc().text_content(), "abc");
    }

    #[test]
    fn test_insert_text_inherits_marks() {
        let doc = Doc::from_slice(
            crate::document::Node::paragraph(),
            &Slice::marked("ab", &[Mark::new("bold")]),
        );
        let mut tr = Transaction::new(doc, Selection::cursor(2));
        tr.insert_text("c").unwrap();
        assert_eq!(tr.doc().marks_at(2), vec![Mark::new("bold")]);
        assert_eq!(tr.selection(), Selection::cursor(3));
    }

    #[test]
    fn test_meta_is_keyed_by_type() {
        #[derive(Debug, PartialEq)]
        struct Flag(u8);

        let mut tr = Transaction::new(Doc::new(), Selection::cursor(0));
        tr.set_meta(Flag(1)).set_meta(Flag(2));
        assert_eq!(tr.get_meta::<Flag>(), Some(&Flag(2)));
        assert!(tr.get_meta::<u32>().is_none());
    }
}
