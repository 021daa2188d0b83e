//! Emitted tokens.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A token type label such as `NUMBER` or `HALTED_STRING`.
///
/// Labels are shared: the compiled automaton holds one `Arc` per distinct
/// label and every emitted token clones it.
pub type Label = Arc<str>;

/// A typed run of input with its absolute start offset.
///
/// `position` is a byte offset into the whole input stream, never into a
/// single chunk. Consecutive tokens satisfy
/// `prev.position + prev.value.len() <= next.position`.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: Label,
    pub position: usize,
}

impl Token {
    #[inline]
    pub fn new(value: impl Into<String>, kind: impl Into<Label>, position: usize) -> Self {
        Token {
            value: value.into(),
            kind: kind.into(),
            position,
        }
    }

    /// Byte offset one past the last byte of `value`.
    #[inline]
    pub fn end(&self) -> usize {
        self.position + self.value.len()
    }

    /// Returns `true` if this token reports an unterminated greedy run.
    pub fn is_halted(&self, halted_prefix: &str) -> bool {
        !halted_prefix.is_empty() && self.kind.starts_with(halted_prefix)
    }

    /// Move the token forward by `offset` bytes.
    ///
    /// Used when re-emitting tokens produced by a nested scanner, whose
    /// positions are relative to the start of the nested region.
    #[must_use]
    pub fn shifted(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) @ {}", self.kind, self.value, self.position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}  {:<20} {:?}", self.position, self.kind, self.value)
    }
}
