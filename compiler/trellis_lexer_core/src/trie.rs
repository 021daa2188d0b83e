//! Automaton states stored in an index arena.
//!
//! Each [`Node`] owns a map from [`Edge`] to child [`NodeId`], a [`Fallback`]
//! describing where symbols without an explicit child go, and an [`Action`]
//! fired whenever traversal lands on the node.
//!
//! # Graph Shape
//!
//! Children form a tree rooted at [`NodeId::ROOT`]. Fallbacks may name any
//! node, so the full transition relation is a general directed graph with
//! cycles (self-loops for "keep consuming" states). Using indices instead of
//! closures over shared nodes keeps ownership in a single `Vec`.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use trellis_grammar::Label;

/// Index of a node in the [`Trie`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The start state. Always the first node allocated.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An input symbol: one character, or the end-of-input sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Edge {
    Char(char),
    End,
}

/// Identifier of a greedy run that owns a nested scanner.
pub type RunId = usize;

/// Character predicate referenced by [`Fallback::Classify`].
///
/// The identifier classes are configurable per grammar and live on the
/// automaton; digits are always ASCII.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ClassRef {
    IdentStart,
    IdentContinue,
    Digit,
}

/// Resolution strategy for a symbol with no explicit child.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Remain in the current node.
    #[default]
    Stay,
    /// Move to a fixed node.
    Goto(NodeId),
    /// Resolve the same symbol as if traversal were at another node.
    ///
    /// The target's own fallback is never `Reroute`.
    Reroute(NodeId),
    /// Route on a character class. `End` always takes `miss`.
    Classify {
        class: ClassRef,
        hit: NodeId,
        miss: NodeId,
    },
    /// Root dispatch: identifier start, digit, or unknown.
    Dispatch,
    /// Emit the pending literal with this label, then resolve the symbol
    /// from the root.
    Release(Label),
}

/// Side effect of landing on a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Action {
    #[default]
    None,
    /// Emit everything since the token start. `None` marks an unnamed
    /// delimiter.
    Literal(Option<Label>),
    /// Emit the run before a terminator, then replay the terminator from the
    /// root. The terminator occupies the last `terminator_len` bytes.
    Boundary { label: Label, terminator_len: usize },
    /// Resolve a greedy run.
    Close(Close),
}

/// Resolution of a greedy run at a terminator, halt marker or end of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Close {
    pub label: Label,
    /// Set for halt markers and end of input.
    pub halted: bool,
    pub escape: Option<char>,
    pub terminator_len: usize,
    pub opener_len: usize,
    /// Where traversal resumes when the terminator turns out to be escaped.
    pub body: NodeId,
    pub nested: Option<RunId>,
}

/// A single automaton state.
#[derive(Clone, Debug, Default)]
pub struct Node {
    children: FxHashMap<Edge, NodeId>,
    pub fallback: Fallback,
    pub action: Action,
    /// Marks the body of a greedy run with a sub-grammar.
    pub run: Option<RunId>,
}

impl Node {
    pub fn children(&self) -> impl Iterator<Item = (Edge, NodeId)> + '_ {
        self.children.iter().map(|(&edge, &id)| (edge, id))
    }
}

/// A node visited by [`Trie::path`], and whether the walk created it.
pub type PathStep = (NodeId, bool);

/// Arena of automaton nodes.
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Create a trie holding only the root.
    pub fn new() -> Self {
        Trie {
            nodes: vec![Node::default()],
        }
    }

    /// Allocate a detached node.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "grammars never approach u32::MAX nodes"
    )]
    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::default());
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The explicit child for `edge`, ignoring the fallback.
    #[inline]
    pub fn child(&self, id: NodeId, edge: Edge) -> Option<NodeId> {
        self.nodes[id.index()].children.get(&edge).copied()
    }

    /// Return the child for `edge`, creating it if absent.
    pub fn add_child(&mut self, id: NodeId, edge: Edge) -> NodeId {
        self.add_child_reporting(id, edge).0
    }

    /// Bind `edge` to an existing node, replacing any previous child.
    pub fn set_child(&mut self, id: NodeId, edge: Edge, child: NodeId) {
        self.nodes[id.index()].children.insert(edge, child);
    }

    /// Unlink the child for `edge`. The detached subtree stays allocated.
    pub fn remove_child(&mut self, id: NodeId, edge: Edge) -> Option<NodeId> {
        self.nodes[id.index()].children.remove(&edge)
    }

    /// Walk or create the chain spelling `literal` and return its last node.
    ///
    /// An empty literal descends through the end-of-input edge.
    pub fn add_descendant(&mut self, from: NodeId, literal: &str) -> NodeId {
        self.path(from, literal).last().map_or(from, |&(id, _)| id)
    }

    /// Like [`add_descendant`](Self::add_descendant), returning every node
    /// along the way. Never empty.
    pub fn path(&mut self, from: NodeId, literal: &str) -> SmallVec<[PathStep; 8]> {
        let mut steps = SmallVec::new();
        if literal.is_empty() {
            steps.push(self.add_child_reporting(from, Edge::End));
            return steps;
        }
        let mut node = from;
        for c in literal.chars() {
            let step = self.add_child_reporting(node, Edge::Char(c));
            node = step.0;
            steps.push(step);
        }
        steps
    }

    /// Follow explicit children only.
    pub fn descendant(&self, from: NodeId, literal: &str) -> Option<NodeId> {
        if literal.is_empty() {
            return self.child(from, Edge::End);
        }
        literal
            .chars()
            .try_fold(from, |node, c| self.child(node, Edge::Char(c)))
    }

    fn add_child_reporting(&mut self, id: NodeId, edge: Edge) -> PathStep {
        if let Some(existing) = self.child(id, edge) {
            return (existing, false);
        }
        let child = self.alloc();
        self.nodes[id.index()].children.insert(edge, child);
        (child, true)
    }
}
