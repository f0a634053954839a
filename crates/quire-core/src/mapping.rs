//! Position mapping.
//!
//! Every step produces a [`StepMap`] describing which ranges of the old document were replaced
//! by how much new content. A [`Mapping`] chains step maps so positions can be carried across a
//! whole transaction (or several). Bias is expressed with [`Assoc`]: at an insertion boundary a
//! position either stays before the inserted content or moves after it.

const DEL_BEFORE: u8 = 1;
const DEL_AFTER: u8 = 2;
const DEL_ACROSS: u8 = 4;
const DEL_SIDE: u8 = 8;

/// Which side a position sticks to when content is inserted exactly at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// Stay before inserted content (ProseMirror `-1`).
    Before,
    /// Move after inserted content (ProseMirror `1`).
    #[default]
    After,
}

/// Recovery token for a position that was inside a replaced range.
///
/// When the same range is later restored by a mirroring map (for example while replaying an
/// inverted step), the token lets the position land at the same relative offset again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recover {
    index: usize,
    offset: usize,
}

/// Detailed result of mapping a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
    /// The mapped position.
    pub pos: usize,
    del_info: u8,
    /// Recovery token (only produced by [`StepMap::map_result`]).
    pub recover: Option<Recover>,
}

impl MapResult {
    fn new(pos: usize, del_info: u8, recover: Option<Recover>) -> Self {
        Self {
            pos,
            del_info,
            recover,
        }
    }

    /// The content on the side the position was associated with was deleted.
    pub fn deleted(&self) -> bool {
        self.del_info & DEL_SIDE > 0
    }

    /// The content directly before the position was deleted.
    pub fn deleted_before(&self) -> bool {
        self.del_info & (DEL_BEFORE | DEL_ACROSS) > 0
    }

    /// The content directly after the position was deleted.
    pub fn deleted_after(&self) -> bool {
        self.del_info & (DEL_AFTER | DEL_ACROSS) > 0
    }

    /// The position was strictly inside a deleted range.
    pub fn deleted_across(&self) -> bool {
        self.del_info & DEL_ACROSS > 0
    }
}

/// A single replaced range: `old_size` characters at `start` became `new_size` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MapRange {
    start: usize,
    old_size: usize,
    new_size: usize,
}

/// The position map of one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMap {
    ranges: Vec<MapRange>,
}

impl StepMap {
    /// A map that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A map replacing `old_size` characters at `start` with `new_size` characters.
    pub fn replace(start: usize, old_size: usize, new_size: usize) -> Self {
        Self::from_ranges(&[(start, old_size, new_size)])
    }

    /// Build a map from ascending, non-overlapping `(start, old_size, new_size)` triples
    /// expressed in old-document coordinates.
    pub fn from_ranges(ranges: &[(usize, usize, usize)]) -> Self {
        Self {
            ranges: ranges
                .iter()
                .filter(|(_, old_size, new_size)| *old_size > 0 || *new_size > 0)
                .map(|&(start, old_size, new_size)| MapRange {
                    start,
                    old_size,
                    new_size,
                })
                .collect(),
        }
    }

    /// Returns `true` if the map changes no position.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Map a position.
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.map_result(pos, assoc).pos
    }

    /// Map a position, reporting deletion information.
    pub fn map_result(&self, pos: usize, assoc: Assoc) -> MapResult {
        let mut diff: isize = 0;
        for (index, range) in self.ranges.iter().enumerate() {
            let start = range.start;
            if start > pos {
                break;
            }
            let end = start + range.old_size;
            if pos <= end {
                let side = if range.old_size == 0 {
                    assoc
                } else if pos == start {
                    Assoc::Before
                } else if pos == end {
                    Assoc::After
                } else {
                    assoc
                };
                let base = offset(start, diff);
                let result = match side {
                    Assoc::Before => base,
                    Assoc::After => base + range.new_size,
                };

                let sticky_end = match assoc {
                    Assoc::Before => start,
                    Assoc::After => end,
                };
                let recover = (pos != sticky_end).then_some(Recover {
                    index,
                    offset: pos - start,
                });

                let mut del = if pos == start {
                    DEL_AFTER
                } else if pos == end {
                    DEL_BEFORE
                } else {
                    DEL_ACROSS
                };
                let side_deleted = match assoc {
                    Assoc::Before => pos != start,
                    Assoc::After => pos != end,
                };
                if side_deleted {
                    del |= DEL_SIDE;
                }
                return MapResult::new(result, del, recover);
            }
            diff += range.new_size as isize - range.old_size as isize;
        }
        MapResult::new(offset(pos, diff), 0, None)
    }

    /// Resolve a recovery token produced by the mirrored map.
    pub fn recover(&self, token: Recover) -> usize {
        let diff: isize = self
            .ranges
            .iter()
            .take(token.index)
            .map(|r| r.new_size as isize - r.old_size as isize)
            .sum();
        match self.ranges.get(token.index) {
            Some(range) => offset(range.start, diff) + token.offset,
            None => token.offset,
        }
    }

    /// Call `f(old_start, old_end, new_start, new_end)` for every changed range.
    pub fn for_each(&self, mut f: impl FnMut(usize, usize, usize, usize)) {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let new_start = offset(range.start, diff);
            f(
                range.start,
                range.start + range.old_size,
                new_start,
                new_start + range.new_size,
            );
            diff += range.new_size as isize - range.old_size as isize;
        }
    }
}

fn offset(pos: usize, diff: isize) -> usize {
    pos.saturating_add_signed(diff)
}

/// A chain of step maps, optionally with mirror relations between them.
///
/// `from..to` selects the window of maps that [`Mapping::map`] walks; [`Mapping::slice`] narrows
/// it without copying the maps' meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
    mirror: Vec<(usize, usize)>,
    from: usize,
    to: usize,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping over `maps`.
    pub fn from_maps(maps: Vec<StepMap>) -> Self {
        let to = maps.len();
        Self {
            maps,
            mirror: Vec::new(),
            from: 0,
            to,
        }
    }

    /// The step maps (whole chain, not just the window).
    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// A mapping restricted to maps `from..` of this one.
    pub fn slice(&self, from: usize) -> Self {
        self.slice_range(from, self.maps.len())
    }

    /// A mapping restricted to maps `from..to` of this one.
    pub fn slice_range(&self, from: usize, to: usize) -> Self {
        Self {
            maps: self.maps.clone(),
            mirror: self.mirror.clone(),
            from,
            to: to.min(self.maps.len()),
        }
    }

    /// Append a step map, optionally declaring it the mirror of the map at index `mirrors`.
    pub fn append_map(&mut self, map: StepMap, mirrors: Option<usize>) {
        self.maps.push(map);
        self.to = self.maps.len();
        if let Some(other) = mirrors {
            self.mirror.push((self.maps.len() - 1, other));
        }
    }

    /// Append all maps of `other`, preserving its mirror relations.
    pub fn append_mapping(&mut self, other: &Mapping) {
        let start_size = self.maps.len();
        for (i, map) in other.maps.iter().enumerate() {
            let mirror = other
                .get_mirror(i)
                .filter(|m| *m < i)
                .map(|m| start_size + m);
            self.append_map(map.clone(), mirror);
        }
    }

    fn get_mirror(&self, n: usize) -> Option<usize> {
        self.mirror.iter().find_map(|&(a, b)| {
            if a == n {
                Some(b)
            } else if b == n {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Map a position through the window.
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.map_result(pos, assoc).pos
    }

    /// Map a position through the window, accumulating deletion information.
    pub fn map_result(&self, pos: usize, assoc: Assoc) -> MapResult {
        let mut pos = pos;
        let mut del_info = 0;
        let mut i = self.from;
        while i < self.to {
            let result = self.maps[i].map_result(pos, assoc);
            if let Some(token) = result.recover
                && let Some(corr) = self.get_mirror(i)
                && corr > i
                && corr < self.to
            {
                pos = self.maps[corr].recover(token);
                i = corr + 1;
                continue;
            }
            del_info |= result.del_info;
            pos = result.pos;
            i += 1;
        }
        MapResult::new(pos, del_info, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_respects_assoc() {
        let map = StepMap::replace(2, 0, 3);
        assert_eq!(map.map(2, Assoc::Before), 2);
        assert_eq!(map.map(2, Assoc::After), 5);
        assert_eq!(map.map(4, Assoc::Before), 7);
        assert_eq!(map.map(1, Assoc::After), 1);
    }

    #[test]
    fn test_deletion_flags() {
        let map = StepMap::replace(2, 3, 0);
        let inside = map.map_result(3, Assoc::After);
        assert_eq!(inside.pos, 2);
        assert!(inside.deleted_across());
        assert!(inside.deleted());

        let at_start = map.map_result(2, Assoc::After);
        assert!(at_start.deleted_after());
        assert!(!at_start.deleted_before());
        assert!(at_start.deleted());

        let at_end = map.map_result(5, Assoc::After);
        assert!(at_end.deleted_before());
        assert!(!at_end.deleted());
    }

    #[test]
    fn test_for_each_reports_new_coordinates() {
        let map = StepMap::from_ranges(&[(1, 2, 0), (5, 0, 4)]);
        let mut seen = Vec::new();
        map.for_each(|a, b, c, d| seen.push((a, b, c, d)));
        assert_eq!(seen, vec![(1, 3, 1, 1), (5, 5, 3, 7)]);
    }

    #[test]
    fn test_mirror_recovers_position() {
        // Delete "bcd" then re-insert it: a position inside returns to its old offset.
        let mut mapping = Mapping::new();
        mapping.append_map(StepMap::replace(1, 3, 0), None);
        mapping.append_map(StepMap::replace(1, 0, 3), Some(0));
        assert_eq!(mapping.map(2, Assoc::After), 2);
        assert_eq!(mapping.map(5, Assoc::After), 5);
    }
}
