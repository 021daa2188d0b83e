//! Pull-style lexing for parser drivers.
//!
//! Parser generators that backtrack want a lexer they can pull tokens from,
//! mark, and later rewind. [`PullLexer`] buffers the scanner's push output
//! and records the end of the last token handed out; rewinding restarts the
//! scanner at that offset and re-scans whatever input the caller supplies.

use std::collections::VecDeque;

use trellis_grammar::Token;
use trellis_lexer_core::Scanner;

/// An opaque resumption point captured by [`PullLexer::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Checkpoint {
    position: usize,
}

impl Checkpoint {
    /// Absolute byte offset input must be re-supplied from.
    pub fn position(self) -> usize {
        self.position
    }
}

pub struct PullLexer {
    scanner: Scanner,
    queue: VecDeque<Token>,
    /// End of the last token returned by `next`.
    boundary: usize,
}

impl PullLexer {
    pub fn new(mut scanner: Scanner) -> Self {
        scanner.reset(0);
        PullLexer {
            scanner,
            queue: VecDeque::new(),
            boundary: 0,
        }
    }

    /// Scan another chunk of input.
    pub fn feed(&mut self, chunk: &str) {
        let queue = &mut self.queue;
        self.scanner.consume(chunk, |token| queue.push_back(token));
    }

    /// Mark end of input so trailing runs are emitted.
    pub fn finish(&mut self) {
        let queue = &mut self.queue;
        self.scanner.flush(|token| queue.push_back(token));
    }

    pub fn save(&self) -> Checkpoint {
        Checkpoint {
            position: self.boundary,
        }
    }

    /// Rewind to `checkpoint` and scan `chunk`, which must be the input
    /// starting at `checkpoint.position()`.
    ///
    /// Tokens scanned but not yet returned are discarded. Call
    /// [`finish`](Self::finish) if `chunk` ends the input.
    pub fn reset(&mut self, chunk: &str, checkpoint: Checkpoint) {
        tracing::trace!(position = checkpoint.position, "rewinding pull lexer");
        self.queue.clear();
        self.scanner.reset(checkpoint.position);
        self.boundary = checkpoint.position;
        self.feed(chunk);
    }

    /// Tokens scanned but not yet returned.
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }
}

impl Iterator for PullLexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.queue.pop_front()?;
        self.boundary = token.end();
        Some(token)
    }
}
