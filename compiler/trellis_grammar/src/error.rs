//! Construction-time grammar errors.
//!
//! Scanning itself never fails: unrecognized input is emitted with the
//! unknown label and unterminated runs are emitted as halted tokens. Every
//! error in this module is raised before the first character is consumed.

/// A grammar that cannot be compiled.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A literal of length zero would collide with the end-of-input edge.
    #[error("empty literal in {category} definitions")]
    EmptyLiteral { category: &'static str },

    /// Escape parity is counted over a single repeated character.
    #[error(
        "greedy matcher `{matcher}` escapes with {escape:?}; only single-character escapes are supported"
    )]
    MultiCharEscape { matcher: String, escape: String },

    #[error("greedy matcher opening with {starts_with:?} has an empty type")]
    EmptyMatcherType { starts_with: String },

    /// Two definitions registered different behavior on the same literal.
    ///
    /// Only raised under `ConflictPolicy::Reject`.
    #[error("ambiguous grammar: {literal:?} is claimed by {existing} and by {incoming}")]
    Conflict {
        literal: String,
        existing: String,
        incoming: String,
    },

    #[error("in sub-grammar of `{matcher}`: {source}")]
    SubGrammar {
        matcher: String,
        #[source]
        source: Box<GrammarError>,
    },

    #[error("invalid grammar document: {0}")]
    Json(#[from] serde_json::Error),
}
