//! Trellis Lexer Core - trie automaton engine.
//!
//! This crate turns a [`GrammarConfig`](trellis_grammar::GrammarConfig) into
//! a character automaton and runs it over streaming input:
//! - [`trie`]: the node arena, edges, fallbacks and actions
//! - [`Automaton`]: a compiled grammar, immutable and shared via `Arc`
//! - [`Scanner`]: incremental tokenizer state (`consume`, `flush`, `reset`)
//! - [`TokenTransform`]: optional rewriting of emitted tokens
//!
//! # Design
//!
//! Every behavior the grammar can express is data on a node: a [`Fallback`]
//! for symbols without an explicit child and an [`Action`] fired on landing.
//! The scanner holds no grammar knowledge of its own; it only resolves
//! transitions and executes actions.
//!
//! Greedy runs with a sub-grammar are scanned by a nested [`Scanner`] over
//! the sub-grammar's automaton, owned by the outer scanner while the run is
//! open.

mod automaton;
mod compile;
mod emit;
mod run;
mod scanner;
pub mod trie;

pub use automaton::{Automaton, Step};
pub use emit::{TokenBuf, TokenTransform};
pub use scanner::Scanner;
pub use trie::{Action, Edge, Fallback, NodeId};
