//! Nested scanning inside greedy runs.
//!
//! A greedy matcher with a sub-grammar owns a nested [`Scanner`] while its
//! run is open. Interior bytes are pushed into it as the outer scanner
//! advances, except for a short tail that might still turn out to be a
//! terminator. Nested tokens are buffered until the run resolves, since the
//! opener must be emitted first.

use trellis_grammar::Token;

use crate::scanner::Scanner;
use crate::trie::RunId;

pub(crate) struct ActiveRun {
    pub(crate) id: RunId,
    pub(crate) scanner: Box<Scanner>,
    /// Absolute offset of the first interior byte.
    pub(crate) interior: usize,
    /// Absolute offset of the first byte not yet pushed.
    pub(crate) fed: usize,
    pub(crate) hold: usize,
    pub(crate) tokens: Vec<Token>,
}

impl ActiveRun {
    pub(crate) fn new(id: RunId, mut scanner: Box<Scanner>, interior: usize, hold: usize) -> Self {
        scanner.reset(0);
        tracing::trace!(run = id, interior, "nested run opened");
        ActiveRun {
            id,
            scanner,
            interior,
            fed: interior,
            hold,
            tokens: Vec::new(),
        }
    }

    /// Push `text`, which starts at absolute offset `self.fed`.
    pub(crate) fn feed(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let tokens = &mut self.tokens;
        self.scanner.consume(text, &mut |token| tokens.push(token));
        self.fed += text.len();
    }

    /// Flush the nested scanner and return its tokens at absolute positions.
    pub(crate) fn finish(&mut self) -> impl Iterator<Item = Token> + '_ {
        let tokens = &mut self.tokens;
        self.scanner.flush(&mut |token| tokens.push(token));
        let offset = self.interior;
        self.tokens.drain(..).map(move |token| token.shifted(offset))
    }
}

/// Largest char boundary in `text` that is `<= index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
