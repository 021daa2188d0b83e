//! Token emission policy.
//!
//! Every token leaves the scanner through [`Emitter::send`]. The emitter owns
//! the absolute position and the optional [`TokenTransform`].

use std::sync::Arc;

use smallvec::SmallVec;
use trellis_grammar::{Label, Token};

/// Output of a [`TokenTransform`]. Most transforms yield zero or one token.
pub type TokenBuf = SmallVec<[Token; 2]>;

/// Rewrites each emitted token into zero or more tokens.
///
/// Implemented for any `FnMut(Token) -> TokenBuf + Send` closure. Tokens with
/// an empty value in the output are dropped.
pub trait TokenTransform: Send {
    fn apply(&mut self, token: Token) -> TokenBuf;
}

impl<F> TokenTransform for F
where
    F: FnMut(Token) -> TokenBuf + Send,
{
    fn apply(&mut self, token: Token) -> TokenBuf {
        self(token)
    }
}

pub(crate) struct Emitter {
    position: usize,
    /// Label for unnamed delimiters; `None` suppresses them.
    unnamed: Option<Label>,
    transform: Option<Box<dyn TokenTransform>>,
}

impl Emitter {
    pub(crate) fn new(unnamed: Option<Label>) -> Self {
        Emitter {
            position: 0,
            unnamed,
            transform: None,
        }
    }

    pub(crate) fn set_transform(&mut self, transform: Box<dyn TokenTransform>) {
        self.transform = Some(transform);
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn reset(&mut self, position: usize) {
        self.position = position;
    }

    /// Skip over bytes already reported by other means.
    pub(crate) fn advance_to(&mut self, position: usize) {
        debug_assert!(position >= self.position, "position moved backwards");
        self.position = position;
    }

    /// Emit `value` at the current position and advance past it.
    ///
    /// The position advances even when nothing is forwarded: empty values,
    /// and unnamed delimiters while inclusion is off.
    pub(crate) fn send(&mut self, value: &str, label: Option<&Label>, sink: &mut dyn FnMut(Token)) {
        let position = self.position;
        self.position += value.len();
        if value.is_empty() {
            return;
        }
        let Some(kind) = label.or(self.unnamed.as_ref()) else {
            tracing::trace!(position, value, "unnamed delimiter dropped");
            return;
        };
        let token = Token {
            value: value.to_owned(),
            kind: Arc::clone(kind),
            position,
        };
        self.forward(token, sink);
    }

    /// Pass a finished token through the transform to the sink.
    pub(crate) fn forward(&mut self, token: Token, sink: &mut dyn FnMut(Token)) {
        tracing::trace!(?token, "emit");
        match &mut self.transform {
            None => sink(token),
            Some(transform) => {
                for out in transform.apply(token) {
                    if !out.value.is_empty() {
                        sink(out);
                    }
                }
            }
        }
    }
}
