//! Compiled grammar.
//!
//! An [`Automaton`] is immutable after [`compile`](Automaton::compile) and is
//! shared by every scanner that uses it, including the nested scanners of
//! sub-grammar runs.

use std::sync::Arc;

use trellis_grammar::{CharClass, GrammarConfig, GrammarError, Label};

use crate::trie::{ClassRef, Edge, Fallback, Node, NodeId, RunId, Trie};

/// Outcome of resolving one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Continue in this node.
    Node(NodeId),
    /// The current literal is complete; emit it with this label and resolve
    /// the symbol again from the root.
    Release(Label),
}

/// A greedy run whose interior is tokenized by another grammar.
#[derive(Debug)]
pub(crate) struct RunSpec {
    pub(crate) grammar: Arc<Automaton>,
    pub(crate) opener_len: usize,
    /// Interior bytes that might still belong to a terminator.
    pub(crate) hold: usize,
}

/// A grammar compiled into a trie automaton.
#[derive(Debug)]
pub struct Automaton {
    pub(crate) trie: Trie,
    pub(crate) ident: NodeId,
    pub(crate) number: NodeId,
    pub(crate) unknown: NodeId,
    pub(crate) identifier_start: CharClass,
    pub(crate) identifier_continue: CharClass,
    pub(crate) runs: Vec<RunSpec>,
    /// Label given to unnamed delimiters; `None` drops them.
    pub(crate) unnamed: Option<Label>,
    pub(crate) halted_prefix: Box<str>,
}

impl Automaton {
    /// Validate `config` and compile it.
    pub fn compile(config: &GrammarConfig) -> Result<Arc<Self>, GrammarError> {
        crate::compile::compile(config).map(Arc::new)
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.trie.node(id)
    }

    pub fn halted_prefix(&self) -> &str {
        &self.halted_prefix
    }

    /// Resolve `symbol` at `node`: the explicit child if any, else the
    /// node's fallback. Always produces a step.
    pub fn resolve(&self, node: NodeId, symbol: Edge) -> Step {
        let mut at = node;
        loop {
            if let Some(child) = self.trie.child(at, symbol) {
                return Step::Node(child);
            }
            match &self.trie.node(at).fallback {
                Fallback::Stay => return Step::Node(at),
                Fallback::Goto(target) => return Step::Node(*target),
                // Reroute targets never reroute, so this runs at most twice.
                Fallback::Reroute(target) => at = *target,
                Fallback::Classify { class, hit, miss } => {
                    let target = if self.class_contains(*class, symbol) {
                        *hit
                    } else {
                        *miss
                    };
                    return Step::Node(target);
                }
                Fallback::Dispatch => return Step::Node(self.dispatch(symbol)),
                Fallback::Release(label) => return Step::Release(Arc::clone(label)),
            }
        }
    }

    pub(crate) fn run(&self, id: RunId) -> &RunSpec {
        &self.runs[id]
    }

    fn dispatch(&self, symbol: Edge) -> NodeId {
        match symbol {
            Edge::Char(c) if self.identifier_start.contains(c) => self.ident,
            Edge::Char(c) if c.is_ascii_digit() => self.number,
            _ => self.unknown,
        }
    }

    fn class_contains(&self, class: ClassRef, symbol: Edge) -> bool {
        let Edge::Char(c) = symbol else {
            return false;
        };
        match class {
            ClassRef::IdentStart => self.identifier_start.contains(c),
            ClassRef::IdentContinue => self.identifier_continue.contains(c),
            ClassRef::Digit => c.is_ascii_digit(),
        }
    }
}
