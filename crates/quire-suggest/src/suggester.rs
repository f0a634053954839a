//! Compiled suggesters.

use crate::config::{CharPattern, SuggesterConfig};
use crate::error::SuggestError;
use crate::matcher::scan;
use crate::reason::SuggestChangeProps;
use quire_core::{Doc, Transaction};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Called for every change or exit of a suggester's match. The transaction is appended to the
/// current batch if the handler changes it.
pub type ChangeHandler = Box<dyn Fn(&SuggestChangeProps, &mut Transaction)>;

/// A suggester ready to match: its configuration plus compiled patterns and handler.
pub struct Suggester {
    config: SuggesterConfig,
    pattern: Regex,
    valid_prefix: Regex,
    invalid_prefix: Option<Regex>,
    on_change: Option<ChangeHandler>,
}

impl fmt::Debug for Suggester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suggester")
            .field("name", &self.config.name)
            .field("priority", &self.config.priority)
            .field("pattern", &self.pattern.as_str())
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl Suggester {
    /// Compile `config`.
    pub fn new(config: SuggesterConfig) -> Result<Self, SuggestError> {
        let start = if config.start_of_line { "^" } else { "" };
        let pattern = format!(
            "{start}({})(?:{}){{{},}}",
            config.char.to_pattern(),
            config.supported_characters,
            config.match_offset
        );
        let pattern = compile(&config, "trigger", &pattern)?;
        let valid_prefix = compile(
            &config,
            "valid_prefix_characters",
            &config.valid_prefix_characters,
        )?;
        let invalid_prefix = config
            .invalid_prefix_characters
            .as_deref()
            .map(|s| compile(&config, "invalid_prefix_characters", s))
            .transpose()?;

        Ok(Self {
            config,
            pattern,
            valid_prefix,
            invalid_prefix,
            on_change: None,
        })
    }

    /// Set the change handler.
    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SuggestChangeProps, &mut Transaction) + 'static,
    {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// The suggester's name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration it was compiled from.
    pub fn config(&self) -> &SuggesterConfig {
        &self.config
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether the character before a trigger (empty at a block start) allows a match.
    pub(crate) fn accepts_prefix(&self, prefix: &str) -> bool {
        self.valid_prefix.is_match(prefix)
            && !self
                .invalid_prefix
                .as_ref()
                .is_some_and(|invalid| invalid.is_match(prefix))
    }

    /// The trigger text at `from`, as far as it can be determined.
    pub(crate) fn trigger_at(&self, doc: &Doc, from: usize) -> String {
        if let Some(candidate) = scan(doc, from, self).into_iter().find(|c| c.from == from) {
            return candidate.char;
        }
        match &self.config.char {
            CharPattern::Literal(literal) => literal.clone(),
            CharPattern::Regex { .. } => doc.char_at(from).map(String::from).unwrap_or_default(),
        }
    }

    pub(crate) fn notify(&self, props: &SuggestChangeProps, tr: &mut Transaction) {
        if let Some(handler) = &self.on_change {
            handler(props, tr);
        }
    }
}

fn compile(
    config: &SuggesterConfig,
    field: &'static str,
    source: &str,
) -> Result<Regex, SuggestError> {
    RegexBuilder::new(source)
        .case_insensitive(config.case_insensitive)
        .multi_line(config.multiline)
        .unicode(config.unicode)
        .build()
        .map_err(|source| SuggestError::InvalidPattern {
            name: config.name.clone(),
            field,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_shape() {
        let mut config = SuggesterConfig::new("tag", "@");
        config.match_offset = 1;
        config.start_of_line = true;
        let suggester = Suggester::new(config).unwrap();
        assert_eq!(suggester.pattern().as_str(), r"^(@)(?:\w+){1,}");
    }

    #[test]
    fn test_prefix_rules() {
        let mut config = SuggesterConfig::new("at", "@");
        config.invalid_prefix_characters = Some("^\0$".to_string());
        let suggester = Suggester::new(config).unwrap();
        assert!(suggester.accepts_prefix(""));
        assert!(suggester.accepts_prefix(" "));
        assert!(!suggester.accepts_prefix("a"));
        assert!(!suggester.accepts_prefix("\0"));
    }

    #[test]
    fn test_invalid_pattern_names_the_field() {
        let config = SuggesterConfig::new("broken", "@").with_supported_characters("[a-");
        let err = Suggester::new(config).unwrap_err();
        match err {
            SuggestError::InvalidPattern { field, .. } => assert_eq!(field, "trigger"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("suggester `broken`"));
    }
}
