//! Default type labels for each token category.

use serde::{Deserialize, Serialize};

/// Labels used when a definition does not name its own type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub keyword: String,
    pub punctuation: String,
    /// Used for unnamed delimiters when they are included in the output.
    pub delimiter: String,
    pub identifier: String,
    pub number: String,
    /// Label for runs containing a decimal point. Falls back to `number`.
    pub float: Option<String>,
    pub unknown: String,
    /// Prepended to a greedy matcher's type when its run is unterminated.
    pub halted_prefix: String,
}

impl Labels {
    pub fn float(&self) -> &str {
        self.float.as_deref().unwrap_or(&self.number)
    }

    /// The label for an unterminated run of `kind`.
    pub fn halted(&self, kind: &str) -> String {
        format!("{}{kind}", self.halted_prefix)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            keyword: "KEYWORD".to_owned(),
            punctuation: "PUNCTUATION".to_owned(),
            delimiter: "DELIMITER".to_owned(),
            identifier: "IDENTIFIER".to_owned(),
            number: "NUMBER".to_owned(),
            float: None,
            unknown: "UNKNOWN".to_owned(),
            halted_prefix: "HALTED_".to_owned(),
        }
    }
}
