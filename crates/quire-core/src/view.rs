//! Editor view.
//!
//! [`EditorView`] owns the current [`EditorState`], dispatches transactions into it, runs the
//! plugins' view hooks and notifies subscribers. It is the headless stand-in for whatever UI
//! hosts the editor.

use crate::commands::Dispatch;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// Notification sent to subscribers after every dispatched transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewUpdate {
    /// Version before the update.
    pub old_version: u64,
    /// Version after the update.
    pub new_version: u64,
    /// Whether the document changed.
    pub doc_changed: bool,
    /// Number of transactions applied (root plus appended).
    pub transaction_count: usize,
}

/// View update callback function type
pub type ViewUpdateCallback = Box<dyn FnMut(&ViewUpdate)>;

/// Headless editor view.
///
/// # Example
///
/// ```rust
/// use quire_core::{Doc, EditorState, EditorView};
///
/// let mut view = EditorView::new(EditorState::builder(Doc::from_text("abc")).build());
/// view.subscribe(|update| println!("{} -> {}", update.old_version, update.new_version));
///
/// let handled = view.run(|state, dispatch| {
///     if let Some(dispatch) = dispatch {
///         let mut tr = state.tr();
///         if tr.delete(0, 1).is_err() {
///             return false;
///         }
///         dispatch(tr);
///     }
///     true
/// });
/// assert!(handled);
/// assert_eq!(view.state().doc().text_content(), "bc");
/// assert_eq!(view.version(), 1);
/// ```
pub struct EditorView {
    state: EditorState,
    version: u64,
    callbacks: Vec<ViewUpdateCallback>,
}

impl EditorView {
    /// Create a view showing `state`.
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// The current state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Current state version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Subscribe to view updates
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ViewUpdate) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the state without running plugins.
    pub fn update_state(&mut self, state: EditorState) {
        self.state = state;
        self.version += 1;
    }

    /// Apply `tr` (and whatever plugins append), then run view hooks and notify subscribers.
    pub fn dispatch(&mut self, tr: Transaction) {
        let result = self.state.apply_transaction(tr);
        if result.transactions.is_empty() {
            return;
        }

        let prev_state = std::mem::replace(&mut self.state, result.state);
        let old_version = self.version;
        self.version += 1;
        log::debug!(
            "dispatched {} transaction(s), version {}",
            result.transactions.len(),
            self.version
        );

        let current = self.state.clone();
        current.for_each_plugin_update(self, &prev_state);

        let update = ViewUpdate {
            old_version,
            new_version: self.version,
            doc_changed: result.transactions.iter().any(|tr| tr.doc_changed()),
            transaction_count: result.transactions.len(),
        };
        for callback in &mut self.callbacks {
            callback(&update);
        }
    }

    /// Run a command against the current state, dispatching whatever it produces.
    pub fn run<F>(&mut self, command: F) -> bool
    where
        F: FnOnce(&EditorState, Dispatch<'_>) -> bool,
    {
        let mut pending = Vec::new();
        let handled = {
            let mut collect = |tr: Transaction| pending.push(tr);
            command(&self.state, Some(&mut collect))
        };
        for tr in pending {
            self.dispatch(tr);
        }
        handled
    }

    /// Dry-run a command: report whether it would apply without dispatching anything.
    pub fn can_run<F>(&self, command: F) -> bool
    where
        F: FnOnce(&EditorState, Dispatch<'_>) -> bool,
    {
        command(&self.state, None)
    }
}
