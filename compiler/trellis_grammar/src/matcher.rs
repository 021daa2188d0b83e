//! Greedy matcher specifications.

use serde::{Deserialize, Serialize};

use crate::{GrammarConfig, GrammarError};

/// A delimited run that starts at a literal opener.
///
/// Without `ends_with` the opener behaves like a keyword. With `ends_with`
/// the run consumes everything up to the terminator; reaching end of input
/// or `halts_with` first produces a halted token instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedyMatcher {
    #[serde(rename = "type")]
    pub kind: String,
    pub starts_with: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halts_with: Option<String>,
    /// Must be a single character when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escapes_with: Option<String>,
    /// Lexical rules for the interior of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_grammar: Option<Box<GrammarConfig>>,
}

impl GreedyMatcher {
    pub fn new(kind: &str, starts_with: &str) -> Self {
        GreedyMatcher {
            kind: kind.to_owned(),
            starts_with: starts_with.to_owned(),
            ends_with: None,
            halts_with: None,
            escapes_with: None,
            sub_grammar: None,
        }
    }

    #[must_use]
    pub fn ends_with(mut self, terminator: &str) -> Self {
        self.ends_with = Some(terminator.to_owned());
        self
    }

    #[must_use]
    pub fn halts_with(mut self, marker: &str) -> Self {
        self.halts_with = Some(marker.to_owned());
        self
    }

    #[must_use]
    pub fn escapes_with(mut self, escape: &str) -> Self {
        self.escapes_with = Some(escape.to_owned());
        self
    }

    #[must_use]
    pub fn sub_grammar(mut self, grammar: GrammarConfig) -> Self {
        self.sub_grammar = Some(Box::new(grammar));
        self
    }

    /// The terminator, treating an empty string as absent.
    pub fn terminator(&self) -> Option<&str> {
        self.ends_with.as_deref().filter(|s| !s.is_empty())
    }

    /// The halt marker, treating an empty string as absent.
    pub fn halt_marker(&self) -> Option<&str> {
        self.halts_with.as_deref().filter(|s| !s.is_empty())
    }

    /// The escape character.
    ///
    /// Escape detection counts a run of identical single characters, so a
    /// longer marker cannot be honored and is rejected here.
    pub fn escape_char(&self) -> Result<Option<char>, GrammarError> {
        let Some(escape) = self.escapes_with.as_deref() else {
            return Ok(None);
        };
        let mut chars = escape.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(c), None) => Ok(Some(c)),
            (Some(_), Some(_)) => Err(GrammarError::MultiCharEscape {
                matcher: self.kind.clone(),
                escape: escape.to_owned(),
            }),
        }
    }
}
