//! Raw suggester configuration.
//!
//! A [`SuggesterConfig`] is plain data (it can be deserialized from JSON or any other serde
//! format). [`Suggester::new`](crate::Suggester::new) compiles it into regexes.

use serde::{Deserialize, Serialize};

/// The trigger of a suggester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharPattern {
    /// A literal trigger such as `@` or `#`.
    Literal(String),
    /// A regex trigger such as `[@#]`.
    Regex {
        /// The pattern.
        regex: String,
    },
}

impl CharPattern {
    /// The trigger as a regex fragment.
    pub fn to_pattern(&self) -> String {
        match self {
            CharPattern::Literal(literal) => regex::escape(literal),
            CharPattern::Regex { regex } => regex.clone(),
        }
    }
}

impl From<&str> for CharPattern {
    fn from(literal: &str) -> Self {
        CharPattern::Literal(literal.to_string())
    }
}

/// Configuration of a single suggester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggesterConfig {
    /// Unique name.
    pub name: String,
    /// The trigger.
    pub char: CharPattern,
    /// Higher priorities win when several suggesters match.
    pub priority: i32,
    /// Minimum number of supported-character runs after the trigger.
    pub match_offset: usize,
    /// Characters allowed in the query.
    pub supported_characters: String,
    /// The character before the trigger must match this (tested against an empty string at
    /// the start of a block; atoms are `\0`).
    pub valid_prefix_characters: String,
    /// The character before the trigger must not match this.
    pub invalid_prefix_characters: Option<String>,
    /// Only match when the trigger starts its text block.
    pub start_of_line: bool,
    /// Case-insensitive trigger and query.
    pub case_insensitive: bool,
    /// `^`/`$` match at line boundaries.
    pub multiline: bool,
    /// Unicode-aware character classes.
    pub unicode: bool,
    /// Marks allowed around the match (`None` allows all).
    pub valid_marks: Option<Vec<String>>,
    /// Marks that invalidate the match.
    pub invalid_marks: Vec<String>,
    /// Block kinds the match may live in (`None` allows all).
    pub valid_nodes: Option<Vec<String>>,
    /// Block kinds that invalidate the match.
    pub invalid_nodes: Vec<String>,
    /// Only match while the selection is empty.
    pub empty_selections_only: bool,
    /// Class of the active match decoration.
    pub suggest_class_name: String,
    /// Element of the active match decoration.
    pub suggest_tag: String,
    /// Class of ignored trigger decorations.
    pub ignored_class_name: Option<String>,
    /// Element of ignored trigger decorations.
    pub ignored_tag: String,
    /// Do not decorate the active match.
    pub disable_decorations: bool,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            name: "at".to_string(),
            char: CharPattern::from("@"),
            priority: 50,
            match_offset: 0,
            supported_characters: r"\w+".to_string(),
            valid_prefix_characters: r"^[\s\x00]?$".to_string(),
            invalid_prefix_characters: None,
            start_of_line: false,
            case_insensitive: false,
            multiline: false,
            unicode: true,
            valid_marks: None,
            invalid_marks: Vec::new(),
            valid_nodes: None,
            invalid_nodes: Vec::new(),
            empty_selections_only: false,
            suggest_class_name: "suggest".to_string(),
            suggest_tag: "span".to_string(),
            ignored_class_name: None,
            ignored_tag: "span".to_string(),
            disable_decorations: false,
        }
    }
}

impl SuggesterConfig {
    /// A default configuration named `name`, triggered by the literal `char`.
    pub fn new(name: impl Into<String>, char: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            char: CharPattern::Literal(char.into()),
            ..Self::default()
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the query character pattern.
    pub fn with_supported_characters(mut self, pattern: impl Into<String>) -> Self {
        self.supported_characters = pattern.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_trigger_is_escaped() {
        assert_eq!(CharPattern::from("+").to_pattern(), r"\+");
        let regex = CharPattern::Regex {
            regex: "[@#]".to_string(),
        };
        assert_eq!(regex.to_pattern(), "[@#]");
    }

    #[test]
    fn test_builder_keeps_defaults() {
        let config = SuggesterConfig::new("tag", "#").with_priority(10);
        assert_eq!(config.name, "tag");
        assert_eq!(config.priority, 10);
        assert_eq!(config.supported_characters, r"\w+");
    }
}
