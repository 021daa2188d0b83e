//! Incremental scanner.
//!
//! A [`Scanner`] walks an [`Automaton`] one character at a time, emitting
//! tokens through a caller-supplied sink. Input may arrive in chunks of any
//! size; chunk boundaries never change the token sequence.
//!
//! # Buffer Model
//!
//! `buffer` holds the input since the current token start, plus whatever the
//! last chunk added. `base` is the absolute offset of `buffer[0]`, and the
//! emitter's position is the absolute offset of the next token start. After
//! every chunk the emitted prefix is drained, so `base == position` between
//! calls and memory stays bounded by the longest open token.
//!
//! # Stepping
//!
//! Each symbol is resolved against the current node (which may emit through
//! a punctuation release), then the landed node's action fires with the
//! symbol's byte range. Boundary actions replay their terminator from the
//! root so a terminator that is itself a token is still emitted.

use std::sync::Arc;

use trellis_grammar::{Label, Token};

use crate::automaton::{Automaton, Step};
use crate::emit::{Emitter, TokenTransform};
use crate::run::{floor_char_boundary, ActiveRun};
use crate::trie::{Action, Close, Edge, NodeId, RunId};

/// Streaming tokenizer state over a shared [`Automaton`].
pub struct Scanner {
    automaton: Arc<Automaton>,
    node: NodeId,
    buffer: String,
    base: usize,
    emitter: Emitter,
    run: Option<ActiveRun>,
    /// Idle nested scanners, indexed by run.
    nested: Vec<Option<Box<Scanner>>>,
}

impl Scanner {
    pub fn new(automaton: Arc<Automaton>) -> Self {
        let emitter = Emitter::new(automaton.unnamed.clone());
        let nested = (0..automaton.runs.len()).map(|_| None).collect();
        Scanner {
            automaton,
            node: NodeId::ROOT,
            buffer: String::new(),
            base: 0,
            emitter,
            run: None,
            nested,
        }
    }

    /// Route every emitted token through `transform`.
    #[must_use]
    pub fn with_transform(mut self, transform: impl TokenTransform + 'static) -> Self {
        self.emitter.set_transform(Box::new(transform));
        self
    }

    pub fn automaton(&self) -> &Arc<Automaton> {
        &self.automaton
    }

    /// Absolute offset of the next token start.
    pub fn position(&self) -> usize {
        self.emitter.position()
    }

    /// Input consumed but not yet emitted.
    pub fn pending(&self) -> &str {
        &self.buffer[self.token_start()..]
    }

    /// Scan `chunk`, calling `sink` for each completed token.
    pub fn consume(&mut self, chunk: &str, mut sink: impl FnMut(Token)) {
        self.consume_dyn(chunk, &mut sink);
    }

    /// Signal end of input: emit any trailing run and return to the root.
    pub fn flush(&mut self, mut sink: impl FnMut(Token)) {
        self.flush_dyn(&mut sink);
    }

    /// Discard all state and continue as if the stream started at `position`.
    pub fn reset(&mut self, position: usize) {
        self.buffer.clear();
        self.base = position;
        self.emitter.reset(position);
        self.node = NodeId::ROOT;
        self.park_run();
    }

    /// Tokenize a complete input from position 0.
    pub fn tokenize(&mut self, input: &str) -> Vec<Token> {
        self.reset(0);
        let mut tokens = Vec::new();
        self.consume(input, |token| tokens.push(token));
        self.flush(|token| tokens.push(token));
        tokens
    }

    fn consume_dyn(&mut self, chunk: &str, sink: &mut dyn FnMut(Token)) {
        let mut at = self.buffer.len();
        self.buffer.push_str(chunk);
        while let Some(c) = self.buffer[at..].chars().next() {
            let end = at + c.len_utf8();
            self.step(Edge::Char(c), end, sink);
            at = end;
        }
        self.trim();
    }

    fn flush_dyn(&mut self, sink: &mut dyn FnMut(Token)) {
        let end = self.buffer.len();
        self.step(Edge::End, end, sink);
        self.trim();
        if !self.buffer.is_empty() {
            tracing::debug!(
                position = self.base,
                pending = self.buffer.as_str(),
                "input left open at end of input"
            );
            self.emitter.advance_to(self.base + self.buffer.len());
        }
        self.buffer.clear();
        self.base = self.emitter.position();
        self.node = NodeId::ROOT;
        self.park_run();
    }

    #[inline]
    fn token_start(&self) -> usize {
        self.emitter.position() - self.base
    }

    fn trim(&mut self) {
        let start = self.token_start();
        if start > 0 {
            self.buffer.drain(..start);
            self.base += start;
        }
    }

    /// Process one symbol ending at byte `end` of the buffer.
    fn step(&mut self, symbol: Edge, end: usize, sink: &mut dyn FnMut(Token)) {
        let at = match symbol {
            Edge::Char(c) => end - c.len_utf8(),
            Edge::End => end,
        };
        let next = self.transition(self.node, symbol, at, sink);
        self.node = next;
        if self.run.is_none() {
            self.open_run(next);
        }
        self.fire(next, end, sink, false);
        if self.run.is_some() {
            self.feed_run(end);
        }
    }

    /// Resolve `symbol` at `from`. A release emits the pending literal, which
    /// ends before `at`, and resolves again from the root.
    fn transition(
        &mut self,
        from: NodeId,
        symbol: Edge,
        at: usize,
        sink: &mut dyn FnMut(Token),
    ) -> NodeId {
        match self.automaton.resolve(from, symbol) {
            Step::Node(next) => next,
            Step::Release(label) => {
                self.send(at, Some(&label), sink);
                self.transition(NodeId::ROOT, symbol, at, sink)
            }
        }
    }

    fn fire(&mut self, node: NodeId, end: usize, sink: &mut dyn FnMut(Token), replaying: bool) {
        match self.automaton.node(node).action.clone() {
            Action::None => {}
            Action::Literal(label) => self.send(end, label.as_ref(), sink),
            Action::Boundary {
                label,
                terminator_len,
            } => {
                if replaying {
                    return;
                }
                let cut = end - terminator_len;
                self.send(cut, Some(&label), sink);

                let mut node = NodeId::ROOT;
                let mut at = cut;
                while let Some(c) = self.buffer[at..end].chars().next() {
                    node = self.transition(node, Edge::Char(c), at, sink);
                    at += c.len_utf8();
                }
                self.node = node;
                self.fire(node, end, sink, true);
            }
            Action::Close(close) => self.close(&close, end, sink),
        }
    }

    /// Emit everything from the token start to `end` and return to the root.
    fn send(&mut self, end: usize, label: Option<&Label>, sink: &mut dyn FnMut(Token)) {
        let start = self.token_start();
        self.emitter.send(&self.buffer[start..end], label, sink);
        self.node = NodeId::ROOT;
    }

    fn close(&mut self, close: &Close, end: usize, sink: &mut dyn FnMut(Token)) {
        let term_start = end - close.terminator_len;
        if let Some(escape) = close.escape {
            // Only interior escapes count; the opener may contain the escape
            // character itself.
            let floor = (self.token_start() + close.opener_len).min(term_start);
            let escapes = self.buffer[floor..term_start]
                .chars()
                .rev()
                .take_while(|&c| c == escape)
                .count();
            if escapes % 2 == 1 {
                tracing::trace!(position = self.base + term_start, "escaped terminator");
                self.node = close.body;
                return;
            }
        }
        match close.nested {
            Some(id) => {
                // A run that closes straight after its opener never reached
                // the body.
                let run = match self.run.take() {
                    Some(run) => run,
                    None => self.start_run(id),
                };
                self.finish_run(run, close, term_start, end, sink);
            }
            None => self.send(end, Some(&close.label), sink),
        }
    }

    // === Nested runs ===

    /// Start the nested run of a body node on first entry.
    fn open_run(&mut self, node: NodeId) {
        if let Some(id) = self.automaton.node(node).run {
            self.run = Some(self.start_run(id));
        }
    }

    /// The interior begins right after the opener of the current token.
    fn start_run(&mut self, id: RunId) -> ActiveRun {
        let spec = self.automaton.run(id);
        let scanner = self.nested[id]
            .take()
            .unwrap_or_else(|| Box::new(Scanner::new(Arc::clone(&spec.grammar))));
        let interior = self.emitter.position() + spec.opener_len;
        ActiveRun::new(id, scanner, interior, spec.hold)
    }

    /// Push interior bytes that can no longer be part of a terminator.
    fn feed_run(&mut self, end: usize) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let limit = floor_char_boundary(&self.buffer, end.saturating_sub(run.hold));
        let from = run.fed - self.base;
        if limit > from {
            run.feed(&self.buffer[from..limit]);
        }
    }

    /// Emit opener, nested tokens and terminator for a resolved run.
    fn finish_run(
        &mut self,
        mut run: ActiveRun,
        close: &Close,
        term_start: usize,
        end: usize,
        sink: &mut dyn FnMut(Token),
    ) {
        let from = run.fed - self.base;
        if term_start > from {
            run.feed(&self.buffer[from..term_start]);
        }

        let start = self.token_start();
        let interior = run.interior - self.base;
        self.emitter
            .send(&self.buffer[start..interior], Some(&close.label), sink);
        for token in run.finish() {
            self.emitter.forward(token, sink);
        }
        self.emitter.advance_to(self.base + term_start);
        self.emitter
            .send(&self.buffer[term_start..end], Some(&close.label), sink);

        tracing::trace!(run = run.id, halted = close.halted, "nested run closed");
        self.node = NodeId::ROOT;
        self.nested[run.id] = Some(run.scanner);
    }

    fn park_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.nested[run.id] = Some(run.scanner);
        }
    }
}

#[cfg(test)]
mod tests;
