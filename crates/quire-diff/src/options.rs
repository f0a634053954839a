//! Diff options.

use std::fmt;

/// A commit's footprint in the document, passed to selection and hover handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitRange {
    /// Commit index.
    pub commit: usize,
    /// Start of the blame span.
    pub from: usize,
    /// End of the blame span.
    pub to: usize,
}

/// Called with the commits under the selection and the previous list.
pub type SelectCommitsHandler = Box<dyn Fn(&[CommitRange], &[CommitRange])>;
/// Called with the previous list when the selection leaves every commit.
pub type DeselectCommitsHandler = Box<dyn Fn(&[CommitRange])>;
/// Called when the pointer enters or leaves a commit's span.
pub type CommitHoverHandler = Box<dyn Fn(&CommitRange)>;

/// Options that control how change tracking is presented.
pub struct DiffOptions {
    /// Class of highlighted blame spans.
    pub blame_marker_class: String,
    /// Message of the commit created by a revert, given the reverted commit's message.
    pub revert_message: Box<dyn Fn(&str) -> String>,
    /// Selection moved over (a different set of) commits.
    pub on_select_commits: Option<SelectCommitsHandler>,
    /// Selection left every commit.
    pub on_deselect_commits: Option<DeselectCommitsHandler>,
    /// Pointer entered a commit's span.
    pub on_mouse_over_commit: Option<CommitHoverHandler>,
    /// Pointer left a commit's span.
    pub on_mouse_leave_commit: Option<CommitHoverHandler>,
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("blame_marker_class", &self.blame_marker_class)
            .field("on_select_commits", &self.on_select_commits.is_some())
            .field("on_deselect_commits", &self.on_deselect_commits.is_some())
            .field("on_mouse_over_commit", &self.on_mouse_over_commit.is_some())
            .field(
                "on_mouse_leave_commit",
                &self.on_mouse_leave_commit.is_some(),
            )
            .finish_non_exhaustive()
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            blame_marker_class: "blame-marker".to_string(),
            revert_message: Box::new(|message| format!("Revert: '{message}'")),
            on_select_commits: None,
            on_deselect_commits: None,
            on_mouse_over_commit: None,
            on_mouse_leave_commit: None,
        }
    }
}

impl DiffOptions {
    /// Set the selection handler.
    pub fn on_select_commits<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[CommitRange], &[CommitRange]) + 'static,
    {
        self.on_select_commits = Some(Box::new(handler));
        self
    }

    /// Set the deselection handler.
    pub fn on_deselect_commits<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[CommitRange]) + 'static,
    {
        self.on_deselect_commits = Some(Box::new(handler));
        self
    }

    /// Set the hover handler.
    pub fn on_mouse_over_commit<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommitRange) + 'static,
    {
        self.on_mouse_over_commit = Some(Box::new(handler));
        self
    }

    /// Set the hover-end handler.
    pub fn on_mouse_leave_commit<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommitRange) + 'static,
    {
        self.on_mouse_leave_commit = Some(Box::new(handler));
        self
    }
}
