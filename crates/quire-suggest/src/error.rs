use thiserror::Error;

#[derive(Debug, Error)]
/// Suggester configuration errors.
pub enum SuggestError {
    #[error("suggester `{name}`: invalid {field} pattern: {source}")]
    /// A configured pattern failed to compile.
    InvalidPattern {
        /// Suggester name.
        name: String,
        /// Which pattern (`trigger`, `valid_prefix_characters` or `invalid_prefix_characters`).
        field: &'static str,
        /// The regex error.
        #[source]
        source: regex::Error,
    },

    #[error("duplicate suggester name `{0}`")]
    /// Two suggesters share a name.
    DuplicateName(String),

    #[error("unknown suggester `{0}`")]
    /// No suggester with that name is registered.
    UnknownSuggester(String),
}
