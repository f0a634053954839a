//! Commit history and blame map.
//!
//! [`TrackState`] is a persistent value: every operation returns a new state. It records the
//! inverted steps of all edits since the last commit, packages them into [`Commit`]s on request,
//! and maintains a blame map attributing every document position to the commit that last
//! touched it.

use crate::error::RevertError;
use quire_core::{Assoc, Doc, Mapping, Step, StepMap, Transaction};
use std::sync::Arc;

/// A blame map entry: `from..to` was last changed by `commit` (`None` for pre-history content).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start position.
    pub from: usize,
    /// End position.
    pub to: usize,
    /// Commit index, or `None` for content that predates tracking.
    pub commit: Option<usize>,
}

impl Span {
    /// Create a span.
    pub fn new(from: usize, to: usize, commit: Option<usize>) -> Self {
        Self { from, to, commit }
    }
}

/// An immutable, committed group of edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Commit message.
    pub message: String,
    /// Commit time in milliseconds since the Unix epoch.
    pub time: u64,
    /// Inverted steps, in application order.
    pub steps: Vec<Step>,
    /// Forward step maps, in application order.
    pub maps: Vec<StepMap>,
}

/// Addresses a commit in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitId {
    /// The oldest commit.
    First,
    /// The newest commit.
    #[default]
    Last,
    /// The commit at this history index.
    Index(usize),
}

impl CommitId {
    /// Resolve against a history of `len` commits.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            CommitId::First => (len > 0).then_some(0),
            CommitId::Last => len.checked_sub(1),
            CommitId::Index(index) => (index < len).then_some(index),
        }
    }
}

impl From<usize> for CommitId {
    fn from(index: usize) -> Self {
        CommitId::Index(index)
    }
}

/// Change tracking state.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    blame_map: Vec<Span>,
    commits: Vec<Arc<Commit>>,
    uncommitted_steps: Vec<Step>,
    uncommitted_maps: Vec<StepMap>,
}

impl TrackState {
    /// Fresh state for `doc`: one pre-history span covering everything.
    pub fn new(doc: &Doc) -> Self {
        let size = doc.content_size();
        let blame_map = if size > 0 {
            vec![Span::new(0, size, None)]
        } else {
            Vec::new()
        };
        Self {
            blame_map,
            commits: Vec::new(),
            uncommitted_steps: Vec::new(),
            uncommitted_maps: Vec::new(),
        }
    }

    /// The blame map, ordered by position.
    pub fn blame_map(&self) -> &[Span] {
        &self.blame_map
    }

    /// Commit history, oldest first.
    pub fn commits(&self) -> &[Arc<Commit>] {
        &self.commits
    }

    /// Inverted steps not yet committed.
    pub fn uncommitted_steps(&self) -> &[Step] {
        &self.uncommitted_steps
    }

    /// Returns `true` if edits are waiting to be committed.
    pub fn has_uncommitted(&self) -> bool {
        !self.uncommitted_steps.is_empty()
    }

    /// Record the steps of `tr`.
    pub fn apply_transform(&self, tr: &Transaction) -> Self {
        let inverted = tr
            .steps()
            .iter()
            .zip(tr.docs())
            .map(|(step, doc)| step.invert(doc));

        let mut uncommitted_steps = self.uncommitted_steps.clone();
        uncommitted_steps.extend(inverted);
        let mut uncommitted_maps = self.uncommitted_maps.clone();
        uncommitted_maps.extend(tr.mapping().maps().iter().cloned());

        Self {
            blame_map: update_blame_map(&self.blame_map, tr.mapping(), self.commits.len()),
            commits: self.commits.clone(),
            uncommitted_steps,
            uncommitted_maps,
        }
    }

    /// Package uncommitted edits into a commit. No-op when nothing is pending.
    pub fn apply_commit(&self, message: &str, time: u64) -> Self {
        if self.uncommitted_steps.is_empty() {
            return self.clone();
        }
        log::debug!(
            "commit #{} `{message}` with {} step(s)",
            self.commits.len(),
            self.uncommitted_steps.len()
        );

        let mut commits = self.commits.clone();
        commits.push(Arc::new(Commit {
            message: message.to_string(),
            time,
            steps: self.uncommitted_steps.clone(),
            maps: self.uncommitted_maps.clone(),
        }));

        Self {
            blame_map: self.blame_map.clone(),
            commits,
            uncommitted_steps: Vec::new(),
            uncommitted_maps: Vec::new(),
        }
    }

    /// Build a transaction on top of `tr` that undoes commit `id`.
    ///
    /// Inverted steps are replayed newest first, each rebased over everything committed after
    /// it. Steps whose range no longer exists, or which fail to apply, are skipped. Mark changes
    /// of later commits are not tracked by the rebasing and may be lost.
    pub fn revert(&self, id: CommitId, mut tr: Transaction) -> Result<Transaction, RevertError> {
        let index = id
            .resolve(self.commits.len())
            .ok_or(RevertError::UnknownCommit(id))?;
        if self.has_uncommitted() {
            let pending = self.uncommitted_steps.len();
            return Err(RevertError::UncommittedChanges(pending));
        }

        let commit = &self.commits[index];
        let mut remap = Mapping::from_maps(
            self.commits[index..]
                .iter()
                .flat_map(|c| c.maps.iter().cloned())
                .collect(),
        );

        for (k, step) in commit.steps.iter().enumerate().rev() {
            let Some(remapped) = step.map(&remap.slice(k + 1)) else {
                log::trace!("revert: step {k} of commit {index} was deleted, skipped");
                continue;
            };
            if let Step::Replace { from, to, slice } = &remapped
                && from == to
                && slice.is_empty()
            {
                continue;
            }
            let map = remapped.get_map();
            match tr.maybe_step(remapped) {
                Ok(_) => remap.append_map(map, Some(k)),
                Err(err) => log::trace!("revert: step {k} of commit {index} skipped: {err}"),
            }
        }

        if !tr.doc_changed() {
            return Err(RevertError::NothingToRevert(index));
        }
        let replayed = tr.steps().len();
        log::debug!("revert of commit #{index} replayed {replayed} step(s)");
        Ok(tr)
    }
}

/// Remap every span through `mapping`, then attribute each changed range to `commit`.
fn update_blame_map(map: &[Span], mapping: &Mapping, commit: usize) -> Vec<Span> {
    let mut result: Vec<Span> = map
        .iter()
        .filter_map(|span| {
            let from = mapping.map(span.from, Assoc::After);
            let to = mapping.map(span.to, Assoc::Before);
            (from < to).then(|| Span::new(from, to, span.commit))
        })
        .collect();

    for (i, step_map) in mapping.maps().iter().enumerate() {
        let after = mapping.slice(i + 1);
        step_map.for_each(|_, _, start, end| {
            insert_into_blame_map(
                &mut result,
                after.map(start, Assoc::After),
                after.map(end, Assoc::Before),
                Some(commit),
            );
        });
    }

    result
}

/// Splice `from..to` for `commit` into the ordered span list.
///
/// Overlapping or touching spans of the same commit are absorbed; spans of other commits are
/// truncated or split around the new range.
fn insert_into_blame_map(
    map: &mut Vec<Span>,
    mut from: usize,
    mut to: usize,
    commit: Option<usize>,
) {
    if from >= to {
        return;
    }

    let mut pos = 0;
    while pos < map.len() {
        let next = map[pos];
        if next.commit == commit {
            if next.to >= from {
                break;
            }
        } else if next.to > from {
            if next.from < from {
                let left = Span::new(next.from, from, next.commit);
                if next.to > to {
                    map.insert(pos, left);
                } else {
                    map[pos] = left;
                }
                pos += 1;
            }
            break;
        }
        pos += 1;
    }

    while pos < map.len() {
        let next = map[pos];
        if next.commit == commit {
            if next.from > to {
                break;
            }
            from = from.min(next.from);
            to = to.max(next.to);
            map.remove(pos);
        } else {
            if next.from >= to {
                break;
            }
            if next.to > to {
                map[pos] = Span::new(to, next.to, next.commit);
                break;
            }
            map.remove(pos);
        }
    }

    map.insert(pos, Span::new(from, to, commit));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(list: &[(usize, usize, Option<usize>)]) -> Vec<Span> {
        list.iter().map(|&(f, t, c)| Span::new(f, t, c)).collect()
    }

    #[test]
    fn test_insert_splits_other_commit() {
        let mut map = spans(&[(0, 10, None)]);
        insert_into_blame_map(&mut map, 3, 5, Some(0));
        assert_eq!(map, spans(&[(0, 3, None), (3, 5, Some(0)), (5, 10, None)]));
    }

    #[test]
    fn test_insert_merges_same_commit() {
        let mut map = spans(&[(0, 3, Some(1)), (3, 6, None), (6, 9, Some(1))]);
        insert_into_blame_map(&mut map, 2, 7, Some(1));
        assert_eq!(map, spans(&[(0, 9, Some(1))]));
    }

    #[test]
    fn test_insert_truncates_right_neighbour() {
        let mut map = spans(&[(0, 4, Some(0)), (4, 8, None)]);
        insert_into_blame_map(&mut map, 2, 6, Some(2));
        let expected = spans(&[(0, 2, Some(0)), (2, 6, Some(2)), (6, 8, None)]);
        assert_eq!(map, expected);
    }

    #[test]
    fn test_commit_id_resolution() {
        assert_eq!(CommitId::Last.resolve(0), None);
        assert_eq!(CommitId::First.resolve(3), Some(0));
        assert_eq!(CommitId::Last.resolve(3), Some(2));
        assert_eq!(CommitId::Index(3).resolve(3), None);
    }
}
