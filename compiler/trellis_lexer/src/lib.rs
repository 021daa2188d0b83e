//! Trellis Lexer - configurable streaming tokenizer.
//!
//! The entry point is [`Tokenizer`], built from a
//! [`GrammarConfig`] or one of the built-in [`Preset`]s. A tokenizer is cheap
//! to clone and hands out independent scanners:
//!
//! ```text
//! let tokenizer = Tokenizer::from_preset(Preset::Math)?;
//! for token in tokenizer.tokenize("gcd(10, 4) + 1") { ... }
//! ```
//!
//! # Adapters
//!
//! - [`ReadTokens`]: tokens from any `std::io::Read`, decoded chunk by chunk
//! - [`PullLexer`]: `next`/`save`/`reset` protocol for parser drivers

mod presets;
mod pull;
mod stream;
mod tokenizer;

pub use presets::{Preset, UnknownPreset};
pub use pull::{Checkpoint, PullLexer};
pub use stream::ReadTokens;
pub use tokenizer::Tokenizer;

pub use trellis_grammar::{
    CharClass, ClassFlags, ConflictPolicy, Definition, GrammarConfig, GrammarError, GreedyMatcher,
    Label, Labels, Matches, Token,
};
pub use trellis_lexer_core::{Automaton, Scanner, TokenBuf, TokenTransform};
