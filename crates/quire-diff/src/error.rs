use crate::track::CommitId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Reasons a commit cannot be reverted.
pub enum RevertError {
    #[error("unknown commit {0:?}")]
    /// The commit does not exist.
    UnknownCommit(CommitId),

    #[error("{0} uncommitted step(s) must be committed before reverting")]
    /// Edits are pending; they cannot be rebased onto the revert.
    UncommittedChanges(usize),

    #[error("reverting commit {0} would not change the document")]
    /// No inverted step could be replayed onto the current document.
    NothingToRevert(usize),
}
