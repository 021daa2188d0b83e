//! Trellis Grammar - declarative tokenizer configuration.
//!
//! This crate holds the data model shared by the engine and its callers:
//! - [`GrammarConfig`]: keywords, punctuation, delimiters, greedy matchers,
//!   character classes and type labels
//! - [`Definition`]: a normalized `{ type, matches }` grammar entry
//! - [`GreedyMatcher`]: a delimited run such as a quoted string or comment
//! - [`Token`]: an emitted `{ value, kind, position }` triple
//! - [`GrammarError`]: construction-time configuration failures
//!
//! Everything here is plain data. Compilation into an automaton happens in
//! `trellis_lexer_core`; nothing in this crate scans input.
//!
//! # Serialization
//!
//! All configuration types derive `Deserialize` with field defaults, so a
//! grammar can be loaded from a JSON document via [`GrammarConfig::from_json`].

mod char_class;
mod config;
mod definition;
mod error;
mod labels;
mod matcher;
mod token;

pub use char_class::{CharClass, ClassFlags};
pub use config::{ConflictPolicy, GrammarConfig};
pub use definition::{Definition, Matches};
pub use error::GrammarError;
pub use labels::Labels;
pub use matcher::GreedyMatcher;
pub use token::{Label, Token};
