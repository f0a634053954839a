//! Match detection.
//!
//! The text block around the cursor is scanned with the suggester's compiled pattern; atoms are
//! seen as `'\0'` so that offsets line up with document positions. A candidate becomes a match
//! when it contains the cursor and its surroundings (prefix character, marks, block kind) are
//! allowed by the configuration.

use crate::char_index::CharIndex;
use crate::config::SuggesterConfig;
use crate::suggester::Suggester;
use quire_core::{Assoc, Doc, Mapping, Mark, Selection};

/// Positions of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    /// Start of the trigger.
    pub from: usize,
    /// The cursor.
    pub cursor: usize,
    /// End of the matched text.
    pub to: usize,
}

/// A piece of matched text, in full and up to the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchValue {
    /// The whole value.
    pub full: String,
    /// The part before the cursor.
    pub partial: String,
}

/// A trigger match around the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestMatch {
    /// Where the match is.
    pub range: MatchRange,
    /// Matched text including the trigger.
    pub text: MatchValue,
    /// Matched text after the trigger.
    pub query: MatchValue,
    /// Name of the suggester that matched.
    pub suggester: String,
    /// The matched trigger text.
    pub char: String,
}

impl SuggestMatch {
    /// Carry the match positions across `mapping`. Text is left as it was.
    pub fn map(&self, mapping: &Mapping) -> Self {
        let from = mapping.map(self.range.from, Assoc::After);
        let to = mapping.map(self.range.to, Assoc::Before).max(from);
        let cursor = mapping.map(self.range.cursor, Assoc::Before).clamp(from, to);
        Self {
            range: MatchRange { from, cursor, to },
            ..self.clone()
        }
    }
}

pub(crate) struct Candidate {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) char: String,
    pub(crate) full: String,
}

/// Every prefix-valid occurrence of the suggester's pattern in the block containing `pos`.
pub(crate) fn scan(doc: &Doc, pos: usize, suggester: &Suggester) -> Vec<Candidate> {
    let block = doc.resolve(pos);
    let text = doc.text_between(block.block_start, block.block_end, "\n", "\0");
    let index = CharIndex::new(&text);

    suggester
        .pattern()
        .captures_iter(&text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let trigger = caps.get(1)?;
            let start = index.byte_to_char(whole.start());
            let prefix = if start == 0 {
                ""
            } else {
                index.slice(&text, start - 1, start)
            };
            if whole.is_empty() || !suggester.accepts_prefix(prefix) {
                return None;
            }
            Some(Candidate {
                from: block.block_start + start,
                to: block.block_start + index.byte_to_char(whole.end()),
                char: trigger.as_str().to_string(),
                full: whole.as_str().to_string(),
            })
        })
        .collect()
}

/// Returns `true` if a valid occurrence of the pattern (prefix and context) starts exactly at
/// `from`.
pub(crate) fn starts_at(doc: &Doc, from: usize, suggester: &Suggester) -> bool {
    scan(doc, from, suggester)
        .iter()
        .any(|c| {
            c.from == from && valid_context(doc, c.from, c.to, suggester.config())
        })
}

/// Find `suggester`'s match around the selection.
pub fn find_match(doc: &Doc, selection: Selection, suggester: &Suggester) -> Option<SuggestMatch> {
    let config = suggester.config();
    if config.empty_selections_only && !selection.is_empty() {
        return None;
    }

    let cursor = selection.from();
    let candidate = scan(doc, cursor, suggester)
        .into_iter()
        .find(|c| c.from < cursor && cursor <= c.to)?;
    if !valid_context(doc, candidate.from, cursor, config) {
        let at = candidate.from;
        log::trace!("`{}` match at {at} rejected by context", config.name);
        return None;
    }

    let before_cursor = cursor - candidate.from;
    let char_len = candidate.char.chars().count();
    let text = MatchValue {
        partial: candidate.full.chars().take(before_cursor).collect(),
        full: candidate.full.clone(),
    };
    let query = MatchValue {
        full: candidate.full.chars().skip(char_len).collect(),
        partial: candidate
            .full
            .chars()
            .take(before_cursor)
            .skip(char_len)
            .collect(),
    };

    Some(SuggestMatch {
        range: MatchRange {
            from: candidate.from,
            cursor,
            to: candidate.to,
        },
        text,
        query,
        suggester: config.name.clone(),
        char: candidate.char,
    })
}

fn marks_allowed(marks: &[Mark], config: &SuggesterConfig) -> bool {
    marks.iter().all(|mark| {
        !config.invalid_marks.contains(&mark.name)
            && config
                .valid_marks
                .as_ref()
                .is_none_or(|valid| valid.contains(&mark.name))
    })
}

fn valid_context(doc: &Doc, from: usize, cursor: usize, config: &SuggesterConfig) -> bool {
    let kind = &doc.resolve(from).block.kind;
    let node_allowed = !config.invalid_nodes.contains(kind)
        && config
            .valid_nodes
            .as_ref()
            .is_none_or(|valid| valid.contains(kind));

    node_allowed
        && marks_allowed(&doc.marks_at(from), config)
        && marks_allowed(&doc.marks_before(cursor), config)
}
