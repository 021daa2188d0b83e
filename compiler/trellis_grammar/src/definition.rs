//! Keyword, punctuation and delimiter definitions.
//!
//! A definition is either a bare literal (`"gcd"`) or a named group
//! (`{ "type": "OPERATOR", "matches": ["+", "-"] }`). Both normalize to a
//! label plus a list of literals; a bare literal has no label of its own and
//! takes the category default at compile time.

use serde::{Deserialize, Serialize};

/// One literal or several literals sharing a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Matches {
    One(String),
    Many(Vec<String>),
}

impl Matches {
    /// Iterate over the literals in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Matches::One(literal) => std::slice::from_ref(literal),
            Matches::Many(literals) => literals,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for Matches {
    fn from(literal: &str) -> Self {
        Matches::One(literal.to_owned())
    }
}

impl<const N: usize> From<[&str; N]> for Matches {
    fn from(literals: [&str; N]) -> Self {
        Matches::Many(literals.iter().map(|&s| s.to_owned()).collect())
    }
}

impl From<Vec<String>> for Matches {
    fn from(literals: Vec<String>) -> Self {
        Matches::Many(literals)
    }
}

/// A grammar entry for the keyword, punctuation or delimiter categories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Definition {
    /// A single literal using the category's default label.
    Bare(String),
    /// One or more literals sharing an explicit label.
    Named {
        #[serde(rename = "type")]
        kind: String,
        matches: Matches,
    },
}

impl Definition {
    pub fn named(kind: &str, matches: impl Into<Matches>) -> Self {
        Definition::Named {
            kind: kind.to_owned(),
            matches: matches.into(),
        }
    }

    /// The explicit label, or `None` for a bare literal.
    pub fn label(&self) -> Option<&str> {
        match self {
            Definition::Bare(_) => None,
            Definition::Named { kind, .. } => Some(kind),
        }
    }

    /// The literals this definition matches.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        let (bare, named) = match self {
            Definition::Bare(literal) => (Some(literal.as_str()), None),
            Definition::Named { matches, .. } => (None, Some(matches.iter())),
        };
        bare.into_iter().chain(named.into_iter().flatten())
    }
}

impl From<&str> for Definition {
    fn from(literal: &str) -> Self {
        Definition::Bare(literal.to_owned())
    }
}

#[cfg(test)]
mod tests;
