//! Suggest plugin.

use crate::config::SuggesterConfig;
use crate::error::SuggestError;
use crate::matcher::{SuggestMatch, find_match};
use crate::reason::find_reasons;
use crate::state::{IgnoredEntry, SuggestAction, SuggestDecoration, SuggestState, is_ignored};
use crate::suggester::Suggester;
use quire_core::{
    Decoration, DecorationAttrs, DecorationSet, Doc, EditorState, Plugin, Transaction,
};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Plugin tracking trigger-character matches for a fixed set of suggesters.
#[derive(Debug)]
pub struct SuggestPlugin {
    suggesters: Vec<Suggester>,
}

impl SuggestPlugin {
    /// Create the plugin. Suggesters are ordered by descending priority, keeping registration
    /// order among equal priorities.
    pub fn new(mut suggesters: Vec<Suggester>) -> Result<Self, SuggestError> {
        let mut names = BTreeSet::new();
        for suggester in &suggesters {
            if !names.insert(suggester.name()) {
                return Err(SuggestError::DuplicateName(suggester.name().to_string()));
            }
        }
        suggesters.sort_by_key(|s| Reverse(s.config().priority));
        Ok(Self { suggesters })
    }

    /// Compile `configs` (without handlers) and create the plugin.
    pub fn from_configs(
        configs: impl IntoIterator<Item = SuggesterConfig>,
    ) -> Result<Self, SuggestError> {
        let suggesters = configs
            .into_iter()
            .map(Suggester::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(suggesters)
    }

    /// Suggesters in priority order.
    pub fn suggesters(&self) -> &[Suggester] {
        &self.suggesters
    }

    /// The suggester called `name`.
    pub fn suggester(&self, name: &str) -> Option<&Suggester> {
        self.suggesters.iter().find(|s| s.name() == name)
    }

    /// The action that ignores the trigger at `from` for suggester `name`.
    pub fn ignore_action(
        &self,
        doc: &Doc,
        from: usize,
        name: &str,
        specific: bool,
    ) -> Result<SuggestAction, SuggestError> {
        let suggester = self
            .suggester(name)
            .ok_or_else(|| SuggestError::UnknownSuggester(name.to_string()))?;
        let char = suggester.trigger_at(doc, from);
        let to = (from + char.chars().count().max(1)).min(doc.content_size());
        Ok(SuggestAction::AddIgnored {
            from,
            to,
            entry: IgnoredEntry {
                name: name.to_string(),
                char,
                specific,
            },
        })
    }

    fn ignored_decoration(
        &self,
        from: usize,
        to: usize,
        entry: &IgnoredEntry,
    ) -> Decoration<IgnoredEntry> {
        let mut attrs = DecorationAttrs::default();
        if let Some(config) = self.suggester(&entry.name).map(Suggester::config) {
            attrs.class = config.ignored_class_name.clone();
            attrs.node_name = Some(config.ignored_tag.clone());
        }
        Decoration::inline(from, to, attrs, entry.clone())
    }

    fn apply_action(
        &self,
        action: Option<&SuggestAction>,
        ignored: DecorationSet<IgnoredEntry>,
        ignore_next_exit: &mut bool,
    ) -> DecorationSet<IgnoredEntry> {
        match action {
            Some(SuggestAction::AddIgnored { from, to, entry }) => {
                log::debug!("ignoring `{}` trigger at {from}", entry.name);
                ignored.add(vec![self.ignored_decoration(*from, *to, entry)])
            }
            Some(SuggestAction::RemoveIgnored { from, name }) => {
                ignored.remove(|d| d.from == *from && d.spec.name == *name)
            }
            Some(SuggestAction::ClearIgnored(None)) => DecorationSet::empty(),
            Some(SuggestAction::ClearIgnored(Some(name))) => {
                ignored.remove(|d| d.spec.name == *name)
            }
            Some(SuggestAction::IgnoreNextExit) => {
                *ignore_next_exit = true;
                ignored
            }
            None => ignored,
        }
    }

    fn decorations(
        &self,
        ignored: &DecorationSet<IgnoredEntry>,
        active: Option<&SuggestMatch>,
    ) -> DecorationSet<SuggestDecoration> {
        let mut decorations: Vec<_> = ignored
            .iter()
            .map(|d| {
                Decoration::inline(
                    d.from,
                    d.to,
                    d.attrs.clone(),
                    SuggestDecoration::Ignored(d.spec.clone()),
                )
            })
            .collect();

        let active = active.and_then(|m| {
            let config = self.suggester(&m.suggester)?.config();
            Some((m, config))
        });
        if let Some((m, config)) = active
            && !config.disable_decorations
        {
            decorations.push(Decoration::inline(
                m.range.from,
                m.range.to,
                DecorationAttrs::class(config.suggest_class_name.clone())
                    .with_node_name(config.suggest_tag.clone()),
                SuggestDecoration::Active(m.suggester.clone()),
            ));
        }
        DecorationSet::new(decorations)
    }
}

impl Plugin for SuggestPlugin {
    type State = SuggestState;

    fn name(&self) -> &str {
        "suggest"
    }

    fn init(&self, state: &EditorState) -> SuggestState {
        let matches: Vec<_> = self
            .suggesters
            .iter()
            .map(|s| find_match(state.doc(), state.selection(), s))
            .collect();
        let active = matches.iter().flatten().next().cloned();
        SuggestState {
            decorations: self.decorations(&DecorationSet::empty(), active.as_ref()),
            matches,
            active,
            ..SuggestState::default()
        }
    }

    fn apply(
        &self,
        tr: &Transaction,
        value: &SuggestState,
        _old_state: &EditorState,
        new_state: &EditorState,
    ) -> SuggestState {
        let mut ignore_next_exit = value.ignore_next_exit;
        let ignored = if tr.doc_changed() {
            value.ignored.map(tr.mapping())
        } else {
            value.ignored.clone()
        };
        let ignored = self.apply_action(
            tr.get_meta::<SuggestAction>(),
            ignored,
            &mut ignore_next_exit,
        );

        let prev = value.active.as_ref().map(|m| {
            if tr.doc_changed() {
                m.map(tr.mapping())
            } else {
                m.clone()
            }
        });
        let matches: Vec<_> = self
            .suggesters
            .iter()
            .map(|s| {
                find_match(new_state.doc(), new_state.selection(), s)
                    .filter(|m| !is_ignored(&ignored, m))
            })
            .collect();
        let active = matches.iter().flatten().next().cloned();

        let mut events = find_reasons(prev.as_ref(), active.as_ref(), new_state, &self.suggesters);
        if ignore_next_exit && events.iter().any(|e| e.is_exit()) {
            log::debug!("swallowing suggest exit");
            events.retain(|e| !e.is_exit());
            ignore_next_exit = false;
        }
        for event in &events {
            log::trace!("`{}` {:?}", event.suggest_match.suggester, event.event);
        }

        SuggestState {
            decorations: self.decorations(&ignored, active.as_ref()),
            matches,
            active,
            events,
            ignored,
            ignore_next_exit,
        }
    }

    fn append_transaction(
        &self,
        _trs: &[Transaction],
        _old_state: &EditorState,
        new_state: &EditorState,
    ) -> Option<Transaction> {
        let value = new_state.plugin_state::<SuggestPlugin>()?;
        if value.events.is_empty() {
            return None;
        }

        let mut tr = new_state.tr();
        for event in &value.events {
            if let Some(suggester) = self.suggester(&event.suggest_match.suggester) {
                suggester.notify(event, &mut tr);
            }
        }
        let touched = tr.doc_changed() || tr.selection_set() || tr.has_meta::<SuggestAction>();
        touched.then_some(tr)
    }
}
