//! Grammar compilation.
//!
//! Translates a [`GrammarConfig`] into an [`Automaton`]. The order of the
//! passes matters: category nodes and their boundaries come first, then
//! keywords, greedy matchers, delimiters and punctuation, and finally the
//! root bindings.
//!
//! # Claims
//!
//! Every node that carries behavior records the [`Role`] that claimed it.
//! A second claim with a different role is an ambiguous grammar. Keyword
//! prefixes and the identifier boundaries hanging off them are *weak*: a
//! strong claim replaces them silently and never loses to them, so keyword
//! registration order does not matter. Two strong claims conflict, and the
//! [`ConflictPolicy`] decides.
//!
//! # Runs
//!
//! A terminated greedy matcher gets a body node of its own, off the root
//! trie. The opener reroutes into it, so the first interior symbol still
//! sees longer literals sharing the opener, and every later one sees only
//! the terminator, halt marker and end of input.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use trellis_grammar::{
    ConflictPolicy, Definition, GrammarConfig, GrammarError, GreedyMatcher, Label,
};

use crate::automaton::{Automaton, RunSpec};
use crate::trie::{Action, ClassRef, Close, Edge, Fallback, NodeId, Trie};

/// Behavior attached to a node by one definition.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Role {
    Prefix,
    WeakBoundary(Label),
    Keyword(Label),
    Boundary(Label),
    Delimiter(Option<Label>),
    Punctuation(Label),
    Opener(Label),
    Close(Label),
    Float,
}

impl Role {
    fn is_weak(&self) -> bool {
        matches!(self, Role::Prefix | Role::WeakBoundary(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Prefix => f.write_str("an identifier prefix"),
            Role::WeakBoundary(label) | Role::Boundary(label) => {
                write!(f, "the end of a `{label}` run")
            }
            Role::Keyword(label) => write!(f, "keyword `{label}`"),
            Role::Delimiter(Some(label)) => write!(f, "delimiter `{label}`"),
            Role::Delimiter(None) => f.write_str("an unnamed delimiter"),
            Role::Punctuation(label) => write!(f, "punctuation `{label}`"),
            Role::Opener(label) => write!(f, "the opener of `{label}`"),
            Role::Close(label) => write!(f, "a terminator of `{label}`"),
            Role::Float => f.write_str("the decimal point"),
        }
    }
}

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        keywords = config.keywords.len(),
        punctuation = config.punctuation.len(),
        delimiters = config.delimiters.len(),
        greedy = config.greedy_matchers.len(),
    )
)]
pub(crate) fn compile(config: &GrammarConfig) -> Result<Automaton, GrammarError> {
    config.validate()?;

    let mut compiler = Compiler::new(config);
    compiler.categories()?;
    compiler.keywords()?;
    compiler.greedy_matchers()?;
    compiler.delimiters()?;
    compiler.punctuation()?;
    compiler.leading_float()?;
    let automaton = compiler.finish();

    tracing::debug!(
        nodes = automaton.trie.len(),
        runs = automaton.runs.len(),
        "grammar compiled"
    );
    Ok(automaton)
}

struct Compiler<'a> {
    config: &'a GrammarConfig,
    trie: Trie,
    labels: FxHashMap<Box<str>, Label>,
    claims: FxHashMap<NodeId, Role>,
    /// Delimiters, end of input and punctuation, deduplicated.
    terminators: Vec<&'a str>,
    runs: Vec<RunSpec>,
    /// Opener and body of every terminated greedy matcher.
    openers: Vec<(NodeId, NodeId)>,
    unknown: NodeId,
    ident: NodeId,
    number: NodeId,
    float: NodeId,
    identifier: Label,
}

impl<'a> Compiler<'a> {
    fn new(config: &'a GrammarConfig) -> Self {
        let mut trie = Trie::new();
        let unknown = trie.alloc();
        let ident = trie.alloc();
        let number = trie.alloc();
        let float = trie.add_child(number, Edge::Char('.'));

        let mut terminators: Vec<&'a str> = Vec::new();
        let literals = config
            .delimiters
            .iter()
            .flat_map(Definition::literals)
            .chain([""])
            .chain(config.punctuation.iter().flat_map(Definition::literals));
        for literal in literals {
            if !terminators.contains(&literal) {
                terminators.push(literal);
            }
        }

        let identifier: Label = Arc::from(config.labels.identifier.as_str());
        let mut labels = FxHashMap::default();
        labels.insert(config.labels.identifier.as_str().into(), Arc::clone(&identifier));

        Compiler {
            config,
            trie,
            labels,
            claims: FxHashMap::default(),
            terminators,
            runs: Vec::new(),
            openers: Vec::new(),
            unknown,
            ident,
            number,
            float,
            identifier,
        }
    }

    fn intern(&mut self, name: &str) -> Label {
        if let Some(label) = self.labels.get(name) {
            return Arc::clone(label);
        }
        let label: Label = Arc::from(name);
        self.labels.insert(name.into(), Arc::clone(&label));
        label
    }

    fn identifier_fallback(&self) -> Fallback {
        Fallback::Classify {
            class: ClassRef::IdentContinue,
            hit: self.ident,
            miss: self.unknown,
        }
    }

    fn is_identifier_shaped(&self, text: &str) -> bool {
        let mut chars = text.chars();
        chars
            .next()
            .is_some_and(|c| self.config.identifier_start.contains(c))
            && chars.all(|c| self.config.identifier_continue.contains(c))
    }

    /// Record `role` on `node`. Returns whether the caller should apply it.
    fn claim(&mut self, node: NodeId, literal: &str, role: Role) -> Result<bool, GrammarError> {
        let Some(existing) = self.claims.get(&node).cloned() else {
            self.claims.insert(node, role);
            return Ok(true);
        };
        if existing == role {
            return Ok(true);
        }
        match (existing.is_weak(), role.is_weak()) {
            (false, true) => return Ok(false),
            (true, _) => {
                self.claims.insert(node, role);
                return Ok(true);
            }
            (false, false) => {}
        }
        match self.config.conflicts {
            ConflictPolicy::Reject => Err(GrammarError::Conflict {
                literal: literal.to_owned(),
                existing: existing.to_string(),
                incoming: role.to_string(),
            }),
            ConflictPolicy::LastWins => {
                tracing::warn!(
                    literal,
                    existing = %existing,
                    incoming = %role,
                    "ambiguous grammar, the later definition wins"
                );
                self.claims.insert(node, role);
                Ok(true)
            }
        }
    }

    // === Category nodes ===

    fn categories(&mut self) -> Result<(), GrammarError> {
        let config = self.config;
        let labels = &config.labels;
        let unknown = self.intern(&labels.unknown);
        let number = self.intern(&labels.number);
        let float = self.intern(labels.float());
        let identifier = Arc::clone(&self.identifier);

        let ident_fallback = self.identifier_fallback();
        self.trie.node_mut(self.ident).fallback = ident_fallback;
        self.trie.node_mut(self.number).fallback = Fallback::Classify {
            class: ClassRef::Digit,
            hit: self.number,
            miss: self.unknown,
        };

        self.wait_to_tokenize(self.unknown, &unknown, false)?;
        self.wait_to_tokenize(self.ident, &identifier, false)?;
        self.wait_to_tokenize(self.number, &number, false)?;

        // A `.` terminator after a number collides with the decimal point.
        if self.claim(self.float, ".", Role::Float)? {
            let node = self.trie.node_mut(self.float);
            node.action = Action::None;
            node.fallback = Fallback::Classify {
                class: ClassRef::Digit,
                hit: self.float,
                miss: self.unknown,
            };
            self.wait_to_tokenize(self.float, &float, false)?;
        }
        Ok(())
    }

    /// Attach a boundary for every terminator below `node`.
    fn wait_to_tokenize(&mut self, node: NodeId, label: &Label, weak: bool) -> Result<(), GrammarError> {
        for index in 0..self.terminators.len() {
            let terminator = self.terminators[index];
            let path = self.trie.path(node, terminator);
            let Some((&(end, _), intermediates)) = path.split_last() else {
                continue;
            };
            for &(mid, created) in intermediates {
                if created {
                    self.trie.node_mut(mid).fallback = Fallback::Reroute(self.unknown);
                }
            }
            let role = if weak {
                Role::WeakBoundary(Arc::clone(label))
            } else {
                Role::Boundary(Arc::clone(label))
            };
            if self.claim(end, terminator, role)? {
                let end = self.trie.node_mut(end);
                end.action = Action::Boundary {
                    label: Arc::clone(label),
                    terminator_len: terminator.len(),
                };
                end.fallback = Fallback::Stay;
            }
        }
        Ok(())
    }

    // === Keywords ===

    fn keywords(&mut self) -> Result<(), GrammarError> {
        let config = self.config;
        for def in &config.keywords {
            let label = self.intern(def.label().unwrap_or(config.labels.keyword.as_str()));
            for literal in def.literals() {
                self.keyword(literal, &label)?;
            }
        }
        Ok(())
    }

    fn keyword(&mut self, literal: &str, label: &Label) -> Result<(), GrammarError> {
        let path = self.trie.path(NodeId::ROOT, literal);
        let Some((&(terminal, _), prefixes)) = path.split_last() else {
            return Ok(());
        };
        let mut end = 0;
        for (&(node, _), c) in prefixes.iter().zip(literal.chars()) {
            end += c.len_utf8();
            self.prefix(node, &literal[..end])?;
        }
        if self.claim(terminal, literal, Role::Keyword(Arc::clone(label)))? {
            let fallback = self.identifier_fallback();
            let node = self.trie.node_mut(terminal);
            node.fallback = fallback;
            node.action = Action::None;
            self.wait_to_tokenize(terminal, label, false)?;
        }
        Ok(())
    }

    /// Wire a proper prefix of a keyword: an identifier that has not decayed
    /// yet.
    fn prefix(&mut self, node: NodeId, prefix: &str) -> Result<(), GrammarError> {
        if self.claims.get(&node) == Some(&Role::Prefix) {
            return Ok(());
        }
        if self.claim(node, prefix, Role::Prefix)? {
            let fallback = self.identifier_fallback();
            let target = self.trie.node_mut(node);
            target.fallback = fallback;
            target.action = Action::None;
            let identifier = Arc::clone(&self.identifier);
            self.wait_to_tokenize(node, &identifier, true)?;
        }
        Ok(())
    }

    /// Build a literal path from the root and return its terminal.
    ///
    /// New intermediate nodes either behave as identifier prefixes or route
    /// the next symbol through the unknown node.
    fn root_path(&mut self, literal: &str) -> Result<NodeId, GrammarError> {
        let path = self.trie.path(NodeId::ROOT, literal);
        let Some((&(terminal, _), intermediates)) = path.split_last() else {
            return Ok(NodeId::ROOT);
        };
        let mut end = 0;
        for (&(node, created), c) in intermediates.iter().zip(literal.chars()) {
            end += c.len_utf8();
            if !created {
                continue;
            }
            let prefix = &literal[..end];
            if self.is_identifier_shaped(prefix) {
                self.prefix(node, prefix)?;
            } else {
                self.trie.node_mut(node).fallback = Fallback::Reroute(self.unknown);
            }
        }
        Ok(terminal)
    }

    // === Greedy matchers ===

    fn greedy_matchers(&mut self) -> Result<(), GrammarError> {
        let config = self.config;
        for matcher in &config.greedy_matchers {
            let label = self.intern(&matcher.kind);
            match matcher.terminator() {
                None => self.keyword(&matcher.starts_with, &label)?,
                Some(terminator) => self.greedy_run(matcher, terminator, label)?,
            }
        }
        Ok(())
    }

    fn greedy_run(
        &mut self,
        matcher: &GreedyMatcher,
        terminator: &str,
        label: Label,
    ) -> Result<(), GrammarError> {
        let opener = self.root_path(&matcher.starts_with)?;
        let body = self.trie.alloc();
        let escape = matcher.escape_char()?;
        let halted_name = self.config.labels.halted(&matcher.kind);
        let halted = self.intern(&halted_name);

        let nested = match &matcher.sub_grammar {
            Some(grammar) => {
                let automaton = compile(grammar).map_err(|source| GrammarError::SubGrammar {
                    matcher: matcher.kind.clone(),
                    source: Box::new(source),
                })?;
                let hold = [Some(terminator), matcher.halt_marker()]
                    .into_iter()
                    .flatten()
                    .map(str::len)
                    .max()
                    .map_or(0, |len| len.saturating_sub(1));
                self.runs.push(RunSpec {
                    grammar: Arc::new(automaton),
                    opener_len: matcher.starts_with.len(),
                    hold,
                });
                Some(self.runs.len() - 1)
            }
            None => None,
        };

        self.trie.node_mut(body).run = nested;
        if self.claim(opener, &matcher.starts_with, Role::Opener(Arc::clone(&label)))? {
            self.prune_boundaries(opener);
            let node = self.trie.node_mut(opener);
            node.fallback = Fallback::Reroute(body);
            node.action = Action::None;
            self.openers.push((opener, body));
        }

        let close = |label: &Label, halted: bool, escape: Option<char>, terminator_len: usize| Close {
            label: Arc::clone(label),
            halted,
            escape,
            terminator_len,
            opener_len: matcher.starts_with.len(),
            body,
            nested,
        };
        self.close_path(body, terminator, close(&label, false, escape, terminator.len()))?;
        self.close_path(body, "", close(&halted, true, None, 0))?;
        if let Some(marker) = matcher.halt_marker() {
            self.close_path(body, marker, close(&halted, true, escape, marker.len()))?;
        }
        Ok(())
    }

    fn close_path(&mut self, body: NodeId, terminator: &str, close: Close) -> Result<(), GrammarError> {
        let path = self.trie.path(body, terminator);
        let Some((&(end, _), intermediates)) = path.split_last() else {
            return Ok(());
        };
        for &(mid, created) in intermediates {
            if created {
                self.trie.node_mut(mid).fallback = Fallback::Reroute(body);
            }
        }
        if self.claim(end, terminator, Role::Close(Arc::clone(&close.label)))? {
            let node = self.trie.node_mut(end);
            node.fallback = Fallback::Stay;
            node.action = Action::Close(close);
        }
        Ok(())
    }

    /// Unlink the boundary paths below `node` left by a keyword or prefix
    /// it replaced.
    fn prune_boundaries(&mut self, node: NodeId) {
        let children: Vec<(Edge, NodeId)> = self.trie.node(node).children().collect();
        for (edge, child) in children {
            if self.only_boundaries(child) {
                self.trie.remove_child(node, edge);
                self.unclaim(child);
            }
        }
    }

    fn only_boundaries(&self, node: NodeId) -> bool {
        let boundary = matches!(
            self.claims.get(&node),
            None | Some(Role::Boundary(_) | Role::WeakBoundary(_))
        );
        boundary
            && self
                .trie
                .node(node)
                .children()
                .all(|(_, child)| self.only_boundaries(child))
    }

    fn unclaim(&mut self, node: NodeId) {
        self.claims.remove(&node);
        let children: Vec<NodeId> = self.trie.node(node).children().map(|(_, id)| id).collect();
        for child in children {
            self.unclaim(child);
        }
    }

    /// Send unmatched symbols below each opener into its run body.
    ///
    /// Longer literals sharing an opener leave unclaimed intermediates that
    /// would otherwise decay to the unknown node mid-run.
    fn settle_openers(&mut self) {
        for (opener, body) in std::mem::take(&mut self.openers) {
            if self.trie.node(opener).fallback != Fallback::Reroute(body) {
                continue;
            }
            let mut stack: Vec<NodeId> = self.trie.node(opener).children().map(|(_, id)| id).collect();
            while let Some(node) = stack.pop() {
                if self.claims.contains_key(&node) {
                    continue;
                }
                self.trie.node_mut(node).fallback = Fallback::Reroute(body);
                stack.extend(self.trie.node(node).children().map(|(_, id)| id));
            }
        }
    }

    // === Root literals ===

    fn delimiters(&mut self) -> Result<(), GrammarError> {
        let config = self.config;
        for def in &config.delimiters {
            let label = def.label().map(|name| self.intern(name));
            for literal in def.literals() {
                let node = self.root_path(literal)?;
                if self.claim(node, literal, Role::Delimiter(label.clone()))? {
                    let node = self.trie.node_mut(node);
                    node.action = Action::Literal(label.clone());
                }
            }
        }
        Ok(())
    }

    fn punctuation(&mut self) -> Result<(), GrammarError> {
        let config = self.config;
        for def in &config.punctuation {
            let label = self.intern(def.label().unwrap_or(config.labels.punctuation.as_str()));
            for literal in def.literals() {
                let node = self.root_path(literal)?;
                if self.claim(node, literal, Role::Punctuation(Arc::clone(&label)))? {
                    self.prune_boundaries(node);
                    let node = self.trie.node_mut(node);
                    node.action = Action::None;
                    node.fallback = Fallback::Release(Arc::clone(&label));
                }
            }
        }
        Ok(())
    }

    /// Bind the root's `.` to the float node so `.5` scans as a float.
    fn leading_float(&mut self) -> Result<(), GrammarError> {
        if self.config.floats_have_leading_number {
            return Ok(());
        }
        let dot = Edge::Char('.');
        if let Some(existing) = self.trie.child(NodeId::ROOT, dot) {
            let existing = self
                .claims
                .get(&existing)
                .map_or_else(|| "the prefix of a longer literal".to_owned(), ToString::to_string);
            match self.config.conflicts {
                ConflictPolicy::Reject => {
                    return Err(GrammarError::Conflict {
                        literal: ".".to_owned(),
                        existing,
                        incoming: Role::Float.to_string(),
                    });
                }
                ConflictPolicy::LastWins => tracing::warn!(
                    literal = ".",
                    existing = %existing,
                    "leading `.` starts a float, shadowing an earlier definition"
                ),
            }
        }
        self.trie.set_child(NodeId::ROOT, dot, self.float);
        Ok(())
    }

    fn finish(mut self) -> Automaton {
        self.settle_openers();
        self.trie.node_mut(NodeId::ROOT).fallback = Fallback::Dispatch;
        let config = self.config;
        let unnamed = config
            .include_unnamed_delimiters
            .then(|| self.intern(&config.labels.delimiter));
        Automaton {
            trie: self.trie,
            ident: self.ident,
            number: self.number,
            unknown: self.unknown,
            identifier_start: config.identifier_start.clone(),
            identifier_continue: config.identifier_continue.clone(),
            runs: self.runs,
            unnamed,
            halted_prefix: config.labels.halted_prefix.as_str().into(),
        }
    }
}

#[cfg(test)]
mod tests;
