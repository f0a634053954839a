//! Mark intervals.
//!
//! Marks (bold, link, code, ...) are stored as half-open character intervals next to the text
//! rope. The tree keeps intervals sorted by start offset with a prefix-maximum of end offsets so
//! point queries can stop scanning early.

use crate::document::Mark;

/// A mark applied to the half-open character range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkInterval {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// The mark covering the range.
    pub mark: Mark,
}

impl MarkInterval {
    /// Create a new mark interval.
    pub fn new(start: usize, end: usize, mark: Mark) -> Self {
        Self { start, end, mark }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two intervals overlap
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Sorted mark storage with `O(log n + k)` point queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkTree {
    /// List of intervals (kept sorted by start position)
    intervals: Vec<MarkInterval>,
    /// `prefix_max_end[i] = max(intervals[0..=i].end)`
    prefix_max_end: Vec<usize>,
}

impl MarkTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalized tree from arbitrary intervals.
    pub fn from_intervals(intervals: Vec<MarkInterval>) -> Self {
        let mut tree = Self {
            intervals,
            prefix_max_end: Vec::new(),
        };
        tree.normalize();
        tree
    }

    fn rebuild_prefix_max_end(&mut self) {
        self.prefix_max_end.clear();
        let mut max_end = 0;
        for interval in &self.intervals {
            max_end = max_end.max(interval.end);
            self.prefix_max_end.push(max_end);
        }
    }

    /// Sort, drop empty intervals and merge overlapping or touching intervals of the same mark.
    fn normalize(&mut self) {
        self.intervals.retain(|i| i.start < i.end);
        self.intervals
            .sort_by(|a, b| (&a.mark, a.start).cmp(&(&b.mark, b.start)));

        let mut merged: Vec<MarkInterval> = Vec::with_capacity(self.intervals.len());
        for interval in self.intervals.drain(..) {
            match merged.last_mut() {
                Some(last) if last.mark == interval.mark && interval.start <= last.end => {
                    last.end = last.end.max(interval.end);
                }
                _ => merged.push(interval),
            }
        }

        merged.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.end.cmp(&b.end))
                .then_with(|| a.mark.cmp(&b.mark))
        });
        self.intervals = merged;
        self.rebuild_prefix_max_end();
    }

    /// All intervals in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkInterval> {
        self.intervals.iter()
    }

    /// Get number of intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Query all intervals containing a specific position.
    pub fn query_point(&self, pos: usize) -> Vec<&MarkInterval> {
        let mut result = Vec::new();
        // All intervals with `start <= pos` are before `idx`.
        let idx = self.intervals.partition_point(|i| i.start <= pos);

        for i in (0..idx).rev() {
            if self.prefix_max_end[i] <= pos {
                break;
            }
            let interval = &self.intervals[i];
            if interval.contains(pos) {
                result.push(interval);
            }
        }

        result.reverse();
        result
    }

    /// Query all intervals overlapping `start..end`.
    pub fn query_range(&self, start: usize, end: usize) -> Vec<&MarkInterval> {
        if start >= end {
            return Vec::new();
        }
        let search_end = self.intervals.partition_point(|i| i.start < end);
        self.intervals[..search_end]
            .iter()
            .enumerate()
            .filter(|(idx, interval)| {
                self.prefix_max_end[*idx] > start && interval.overlaps(start, end)
            })
            .map(|(_, interval)| interval)
            .collect()
    }

    /// Intervals of `slice_start..slice_end`, clipped and rebased to start at zero.
    pub fn slice(&self, slice_start: usize, slice_end: usize) -> Vec<MarkInterval> {
        self.query_range(slice_start, slice_end)
            .into_iter()
            .map(|i| {
                MarkInterval::new(
                    i.start.max(slice_start) - slice_start,
                    i.end.min(slice_end) - slice_start,
                    i.mark.clone(),
                )
            })
            .collect()
    }

    /// Replace `from..to` with `inserted` characters carrying `inserted_marks` (relative offsets).
    ///
    /// Intervals spanning the replaced range are split around the inserted content; inserted
    /// text never inherits surrounding marks here.
    pub fn replaced(
        &self,
        from: usize,
        to: usize,
        inserted: usize,
        inserted_marks: &[MarkInterval],
    ) -> Self {
        let removed = to - from;
        let shift = |pos: usize| pos - removed + inserted;
        let mut intervals = Vec::with_capacity(self.intervals.len() + inserted_marks.len());

        for interval in &self.intervals {
            if interval.end <= from {
                intervals.push(interval.clone());
            } else if interval.start >= to {
                intervals.push(MarkInterval::new(
                    shift(interval.start),
                    shift(interval.end),
                    interval.mark.clone(),
                ));
            } else {
                if interval.start < from {
                    intervals.push(MarkInterval::new(
                        interval.start,
                        from,
                        interval.mark.clone(),
                    ));
                }
                if interval.end > to {
                    intervals.push(MarkInterval::new(
                        from + inserted,
                        shift(interval.end),
                        interval.mark.clone(),
                    ));
                }
            }
        }

        intervals.extend(
            inserted_marks
                .iter()
                .map(|m| {
                    MarkInterval::new(from + m.start, from + m.end, m.mark.clone())
                }),
        );

        Self::from_intervals(intervals)
    }

    /// Add `mark` over `from..to`.
    pub fn with_mark(&self, from: usize, to: usize, mark: &Mark) -> Self {
        let mut intervals = self.intervals.clone();
        intervals.push(MarkInterval::new(from, to, mark.clone()));
        Self::from_intervals(intervals)
    }

    /// Remove `mark` from `from..to`, splitting intervals that stick out on either side.
    pub fn without_mark(&self, from: usize, to: usize, mark: &Mark) -> Self {
        let mut intervals = Vec::with_capacity(self.intervals.len() + 1);
        for interval in &self.intervals {
            if interval.mark != *mark || !interval.overlaps(from, to) {
                intervals.push(interval.clone());
                continue;
            }
            if interval.start < from {
                intervals.push(MarkInterval::new(interval.start, from, mark.clone()));
            }
            if interval.end > to {
                intervals.push(MarkInterval::new(to, interval.end, mark.clone()));
            }
        }
        Self::from_intervals(intervals)
    }
}
