//! Grammar configuration.
//!
//! [`GrammarConfig`] is the single construction input of the tokenizer. It
//! can be built in code with the chaining helpers or loaded from JSON:
//!
//! ```json
//! {
//!   "keywords": ["gcd", { "type": "BOOLEAN", "matches": ["true", "false"] }],
//!   "punctuation": [{ "type": "OPERATOR", "matches": ["+", "-"] }, ","],
//!   "delimiters": [" ", "\n"],
//!   "greedy_matchers": [
//!     { "type": "STRING", "starts_with": "\"", "ends_with": "\"", "escapes_with": "\\" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{CharClass, Definition, GrammarError, GreedyMatcher, Labels};

/// What to do when two definitions claim the same literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Log a warning and keep the later registration.
    #[default]
    LastWins,
    /// Fail compilation with [`GrammarError::Conflict`].
    Reject,
}

/// Declarative description of a token grammar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub keywords: Vec<Definition>,
    pub punctuation: Vec<Definition>,
    /// Bare delimiters are unnamed and dropped from the output unless
    /// `include_unnamed_delimiters` is set.
    pub delimiters: Vec<Definition>,
    pub greedy_matchers: Vec<GreedyMatcher>,
    /// When `false`, a bare leading `.` starts a float run.
    pub floats_have_leading_number: bool,
    pub identifier_start: CharClass,
    pub identifier_continue: CharClass,
    pub labels: Labels,
    pub include_unnamed_delimiters: bool,
    pub conflicts: ConflictPolicy,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            keywords: Vec::new(),
            punctuation: Vec::new(),
            delimiters: Vec::new(),
            greedy_matchers: Vec::new(),
            floats_have_leading_number: false,
            identifier_start: CharClass::identifier_start(),
            identifier_continue: CharClass::identifier_continue(),
            labels: Labels::default(),
            include_unnamed_delimiters: false,
            conflicts: ConflictPolicy::default(),
        }
    }
}

impl GrammarConfig {
    /// Parse a JSON grammar document. The result is validated.
    pub fn from_json(source: &str) -> Result<Self, GrammarError> {
        let config: GrammarConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn keyword(mut self, def: impl Into<Definition>) -> Self {
        self.keywords.push(def.into());
        self
    }

    #[must_use]
    pub fn punctuation(mut self, def: impl Into<Definition>) -> Self {
        self.punctuation.push(def.into());
        self
    }

    #[must_use]
    pub fn delimiter(mut self, def: impl Into<Definition>) -> Self {
        self.delimiters.push(def.into());
        self
    }

    #[must_use]
    pub fn greedy(mut self, matcher: GreedyMatcher) -> Self {
        self.greedy_matchers.push(matcher);
        self
    }

    /// Add `\n`, space, `\r` and `\t` as unnamed delimiters.
    #[must_use]
    pub fn whitespace_delimiters(self) -> Self {
        ["\n", " ", "\r", "\t"]
            .into_iter()
            .fold(self, |config, literal| config.delimiter(literal))
    }

    #[must_use]
    pub fn identifier_continue(mut self, class: CharClass) -> Self {
        self.identifier_continue = class;
        self
    }

    #[must_use]
    pub fn conflicts(mut self, policy: ConflictPolicy) -> Self {
        self.conflicts = policy;
        self
    }

    /// Check the structural rules that do not depend on trie layout.
    ///
    /// Conflicts between definitions are detected later, during compilation.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let categories = [
            ("keyword", &self.keywords),
            ("punctuation", &self.punctuation),
            ("delimiter", &self.delimiters),
        ];
        for (category, defs) in categories {
            if defs.iter().flat_map(Definition::literals).any(str::is_empty) {
                return Err(GrammarError::EmptyLiteral { category });
            }
        }
        for matcher in &self.greedy_matchers {
            if matcher.starts_with.is_empty() {
                return Err(GrammarError::EmptyLiteral {
                    category: "greedy matcher opener",
                });
            }
            if matcher.kind.is_empty() {
                return Err(GrammarError::EmptyMatcherType {
                    starts_with: matcher.starts_with.clone(),
                });
            }
            matcher.escape_char()?;
            if let Some(sub) = &matcher.sub_grammar {
                sub.validate().map_err(|source| GrammarError::SubGrammar {
                    matcher: matcher.kind.clone(),
                    source: Box::new(source),
                })?;
            }
        }
        Ok(())
    }
}
