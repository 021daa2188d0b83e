use std::io::Read;
use std::sync::Arc;

use trellis_grammar::{GrammarConfig, GrammarError, Token};
use trellis_lexer_core::{Automaton, Scanner};

use crate::{Preset, PullLexer, ReadTokens};

/// A compiled grammar ready to scan input.
///
/// Cloning shares the compiled automaton.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    automaton: Arc<Automaton>,
}

impl Tokenizer {
    pub fn new(config: &GrammarConfig) -> Result<Self, GrammarError> {
        Ok(Tokenizer {
            automaton: Automaton::compile(config)?,
        })
    }

    /// Compile a built-in grammar.
    pub fn from_preset(preset: Preset) -> Result<Self, GrammarError> {
        Self::new(&preset.config())
    }

    /// Parse and compile a JSON grammar document.
    pub fn from_json(source: &str) -> Result<Self, GrammarError> {
        Self::new(&GrammarConfig::from_json(source)?)
    }

    pub fn automaton(&self) -> &Arc<Automaton> {
        &self.automaton
    }

    /// Tokenize a complete input.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.scanner().tokenize(input)
    }

    /// A fresh scanner for incremental use.
    pub fn scanner(&self) -> Scanner {
        Scanner::new(Arc::clone(&self.automaton))
    }

    /// Tokens from `reader`, decoded and scanned chunk by chunk.
    pub fn read_tokens<R: Read>(&self, reader: R) -> ReadTokens<R> {
        ReadTokens::new(self.scanner(), reader)
    }

    pub fn pull(&self) -> PullLexer {
        PullLexer::new(self.scanner())
    }
}
