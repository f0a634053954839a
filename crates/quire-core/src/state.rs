//! Editor state and plugin host.
//!
//! [`EditorState`] is an immutable value: the document, the selection and one state slot per
//! registered [`Plugin`]. Applying a [`Transaction`] produces a new state by running each
//! plugin's `apply` reducer in registration order, then gives every plugin a chance to append
//! follow-up transactions until no plugin has anything left to add.
//!
//! # Example
//!
//! ```rust
//! use quire_core::{Doc, EditorState, Selection};
//!
//! let state = EditorState::builder(Doc::from_text("hello"))
//!     .selection(Selection::cursor(5))
//!     .build();
//! let mut tr = state.tr();
//! tr.insert_text(", world").unwrap();
//! let state = state.apply(tr);
//! assert_eq!(state.doc().text_content(), "hello, world");
//! assert_eq!(state.selection(), Selection::cursor(12));
//! ```

use crate::document::Doc;
use crate::selection::Selection;
use crate::transaction::Transaction;
use crate::view::EditorView;
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// Meta flag set on transactions appended by a plugin's `append_transaction` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendedTransaction;

/// An extension contributing derived state to the editor.
///
/// Each plugin owns exactly one state slot, addressed by the plugin's type.
pub trait Plugin: 'static {
    /// The derived state stored in the editor state.
    type State: Clone + 'static;

    /// Name used in log output.
    fn name(&self) -> &str;

    /// Initial state. `state` holds the document and the slots of earlier plugins.
    fn init(&self, state: &EditorState) -> Self::State;

    /// Compute the new slot value for `tr`.
    ///
    /// `new_state` holds the new document, selection and the slots of earlier plugins.
    fn apply(
        &self,
        tr: &Transaction,
        value: &Self::State,
        old_state: &EditorState,
        new_state: &EditorState,
    ) -> Self::State;

    /// Return `false` to drop `tr` entirely.
    fn filter_transaction(&self, _tr: &Transaction, _state: &EditorState) -> bool {
        true
    }

    /// Follow-up transaction to run after `trs` were applied to `old_state`.
    fn append_transaction(
        &self,
        _trs: &[Transaction],
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) -> Option<Transaction> {
        None
    }

    /// View hook, called after the view switched to a new state.
    fn update(&self, _view: &EditorView, _prev_state: &EditorState) {}
}

trait ErasedPlugin {
    fn plugin_type(&self) -> TypeId;
    fn plugin_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn init_slot(&self, state: &EditorState) -> Rc<dyn Any>;
    fn apply_slot(
        &self,
        tr: &Transaction,
        slot: &Rc<dyn Any>,
        old_state: &EditorState,
        new_state: &EditorState,
    ) -> Rc<dyn Any>;
    fn filter(&self, tr: &Transaction, state: &EditorState) -> bool;
    fn append(
        &self,
        trs: &[Transaction],
        old_state: &EditorState,
        new_state: &EditorState,
    ) -> Option<Transaction>;
    fn view_update(&self, view: &EditorView, prev_state: &EditorState);
}

impl<P: Plugin> ErasedPlugin for P {
    fn plugin_type(&self) -> TypeId {
        TypeId::of::<P>()
    }

    fn plugin_name(&self) -> &str {
        self.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init_slot(&self, state: &EditorState) -> Rc<dyn Any> {
        Rc::new(self.init(state))
    }

    fn apply_slot(
        &self,
        tr: &Transaction,
        slot: &Rc<dyn Any>,
        old_state: &EditorState,
        new_state: &EditorState,
    ) -> Rc<dyn Any> {
        match slot.downcast_ref::<P::State>() {
            Some(value) => Rc::new(self.apply(tr, value, old_state, new_state)),
            None => {
                log::warn!("plugin `{}` has a foreign state slot", self.name());
                slot.clone()
            }
        }
    }

    fn filter(&self, tr: &Transaction, state: &EditorState) -> bool {
        self.filter_transaction(tr, state)
    }

    fn append(
        &self,
        trs: &[Transaction],
        old_state: &EditorState,
        new_state: &EditorState,
    ) -> Option<Transaction> {
        self.append_transaction(trs, old_state, new_state)
    }

    fn view_update(&self, view: &EditorView, prev_state: &EditorState) {
        self.update(view, prev_state)
    }
}

/// Result of [`EditorState::apply_transaction`].
#[derive(Debug)]
pub struct ApplyResult {
    /// The new state.
    pub state: EditorState,
    /// The root transaction followed by every appended one (empty if the root was filtered).
    pub transactions: Vec<Transaction>,
}

/// Builder for [`EditorState`].
pub struct EditorStateBuilder {
    doc: Doc,
    selection: Selection,
    plugins: Vec<Rc<dyn ErasedPlugin>>,
}

impl EditorStateBuilder {
    /// Initial selection (defaults to a cursor at the start).
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Register a plugin. Registration order is reducer order.
    pub fn plugin<P: Plugin>(mut self, plugin: P) -> Self {
        self.plugins.push(Rc::new(plugin));
        self
    }

    /// Build the state, running every plugin's `init`.
    pub fn build(self) -> EditorState {
        let selection = self.selection.clamped(self.doc.content_size());
        let mut state = EditorState {
            doc: self.doc,
            selection,
            plugins: Rc::new(self.plugins),
            slots: Vec::new(),
        };
        let plugins = state.plugins.clone();
        for plugin in plugins.iter() {
            let slot = plugin.init_slot(&state);
            state.slots.push(slot);
        }
        state
    }
}

/// Immutable editor state.
#[derive(Clone)]
pub struct EditorState {
    doc: Doc,
    selection: Selection,
    plugins: Rc<Vec<Rc<dyn ErasedPlugin>>>,
    slots: Vec<Rc<dyn Any>>,
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.plugin_name()).collect();
        f.debug_struct("EditorState")
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("plugins", &names)
            .finish()
    }
}

impl EditorState {
    /// Start building a state for `doc`.
    pub fn builder(doc: Doc) -> EditorStateBuilder {
        EditorStateBuilder {
            doc,
            selection: Selection::cursor(0),
            plugins: Vec::new(),
        }
    }

    /// The document.
    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    /// The selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Start a transaction on this state.
    pub fn tr(&self) -> Transaction {
        Transaction::new(self.doc.clone(), self.selection)
    }

    fn plugin_index<P: Plugin>(&self) -> Option<usize> {
        let id = TypeId::of::<P>();
        self.plugins.iter().position(|p| p.plugin_type() == id)
    }

    /// The registered plugin instance of type `P`.
    pub fn plugin<P: Plugin>(&self) -> Option<&P> {
        let index = self.plugin_index::<P>()?;
        self.plugins[index].as_any().downcast_ref::<P>()
    }

    /// The state slot of plugin `P`.
    pub fn plugin_state<P: Plugin>(&self) -> Option<&P::State> {
        let index = self.plugin_index::<P>()?;
        self.slots.get(index)?.downcast_ref::<P::State>()
    }

    /// The state slot of plugin `P` together with the plugin itself.
    pub fn plugin_with_state<P: Plugin>(&self) -> Option<(&P, &P::State)> {
        Some((self.plugin::<P>()?, self.plugin_state::<P>()?))
    }

    pub(crate) fn for_each_plugin_update(&self, view: &EditorView, prev_state: &EditorState) {
        for plugin in self.plugins.iter() {
            plugin.view_update(view, prev_state);
        }
    }

    fn filter_transaction(&self, tr: &Transaction, ignore: Option<usize>) -> bool {
        self.plugins
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != ignore)
            .all(|(_, plugin)| plugin.filter(tr, self))
    }

    fn apply_inner(&self, tr: &Transaction) -> EditorState {
        let mut new_state = EditorState {
            doc: tr.doc().clone(),
            selection: tr.selection(),
            plugins: self.plugins.clone(),
            slots: Vec::with_capacity(self.slots.len()),
        };
        for (plugin, slot) in self.plugins.iter().zip(&self.slots) {
            let value = plugin.apply_slot(tr, slot, self, &new_state);
            new_state.slots.push(value);
        }
        new_state
    }

    /// Apply `tr`, ignoring appended transactions in the result.
    pub fn apply(&self, tr: Transaction) -> EditorState {
        self.apply_transaction(tr).state
    }

    /// Apply `root` and every transaction plugins append in response.
    ///
    /// Each plugin sees every transaction exactly once: the appending loop remembers, per
    /// plugin, how many transactions it has already been shown and the state it saw them from.
    pub fn apply_transaction(&self, root: Transaction) -> ApplyResult {
        if !self.filter_transaction(&root, None) {
            log::debug!("root transaction filtered");
            return ApplyResult {
                state: self.clone(),
                transactions: Vec::new(),
            };
        }

        let mut new_state = self.apply_inner(&root);
        let mut trs = vec![root];
        let mut seen: Option<Vec<(EditorState, usize)>> = None;

        loop {
            let mut have_new = false;
            for (i, plugin) in self.plugins.iter().enumerate() {
                let (old_state, n) = match &seen {
                    Some(seen) => (seen[i].0.clone(), seen[i].1),
                    None => (self.clone(), 0),
                };
                let appended = if n < trs.len() {
                    plugin.append(&trs[n..], &old_state, &new_state)
                } else {
                    None
                };

                if let Some(mut tr) = appended
                    && new_state.filter_transaction(&tr, Some(i))
                {
                    log::trace!("plugin `{}` appended a transaction", plugin.plugin_name());
                    tr.set_meta(AppendedTransaction);
                    if seen.is_none() {
                        seen = Some(
                            (0..self.plugins.len())
                                .map(|j| {
                                    if j < i {
                                        (new_state.clone(), trs.len())
                                    } else {
                                        (self.clone(), 0)
                                    }
                                })
                                .collect(),
                        );
                    }
                    new_state = new_state.apply_inner(&tr);
                    trs.push(tr);
                    have_new = true;
                }

                if let Some(seen) = seen.as_mut() {
                    seen[i] = (new_state.clone(), trs.len());
                }
            }

            if !have_new {
                return ApplyResult {
                    state: new_state,
                    transactions: trs,
                };
            }
        }
    }
}
