use super::*;
use pretty_assertions::assert_eq;
use trellis_grammar::{CharClass, Token};

use crate::Scanner;

fn scan(config: &GrammarConfig, input: &str) -> Vec<Token> {
    let automaton = Automaton::compile(config).expect("grammar compiles");
    Scanner::new(automaton).tokenize(input)
}

fn kinds(tokens: &[Token]) -> Vec<(&str, &str)> {
    tokens
        .iter()
        .map(|t| (t.value.as_str(), t.kind.as_ref()))
        .collect()
}

fn rejecting() -> GrammarConfig {
    GrammarConfig::default()
        .whitespace_delimiters()
        .conflicts(ConflictPolicy::Reject)
}

// === Structure ===

#[test]
fn empty_grammar_has_category_nodes() {
    let automaton = Automaton::compile(&GrammarConfig::default()).expect("compiles");
    // root, unknown, identifier, number, float, and each category's
    // end-of-input boundary
    assert_eq!(automaton.trie().len(), 9);
    assert_eq!(
        automaton.node(NodeId::ROOT).fallback,
        Fallback::Dispatch
    );
}

#[test]
fn root_dot_is_bound_to_float_by_default() {
    let automaton = Automaton::compile(&GrammarConfig::default()).expect("compiles");
    let dot = automaton.trie().child(NodeId::ROOT, Edge::Char('.'));
    assert_eq!(dot, Some(automaton.trie().descendant(automaton.number, ".").expect("float")));
}

#[test]
fn leading_number_keeps_root_dot_unbound() {
    let config = GrammarConfig {
        floats_have_leading_number: true,
        ..GrammarConfig::default()
    };
    let automaton = Automaton::compile(&config).expect("compiles");
    assert_eq!(automaton.trie().child(NodeId::ROOT, Edge::Char('.')), None);
}

#[test]
fn delimiter_nodes_carry_literal_actions() {
    let config = GrammarConfig::default()
        .delimiter(" ")
        .delimiter(Definition::named("NEWLINE", "\n"));
    let automaton = Automaton::compile(&config).expect("compiles");
    let trie = automaton.trie();
    let space = trie.child(NodeId::ROOT, Edge::Char(' ')).expect("space");
    let newline = trie.child(NodeId::ROOT, Edge::Char('\n')).expect("newline");
    assert_eq!(automaton.node(space).action, Action::Literal(None));
    assert_eq!(automaton.node(newline).action, Action::Literal(Some(Arc::from("NEWLINE"))));
}

#[test]
fn run_body_hangs_off_the_opener() {
    let config = GrammarConfig::default().greedy(GreedyMatcher::new("TAG", "<").ends_with(">"));
    let automaton = Automaton::compile(&config).expect("compiles");
    let trie = automaton.trie();
    let opener = trie.child(NodeId::ROOT, Edge::Char('<')).expect("opener");
    assert_eq!(trie.child(opener, Edge::Char('>')), None);
    let Fallback::Reroute(body) = automaton.node(opener).fallback else {
        panic!("opener should reroute into its body");
    };
    let close = trie.child(body, Edge::Char('>')).expect("terminator");
    assert!(matches!(automaton.node(close).action, Action::Close(ref c) if c.body == body));
}

#[test]
fn invalid_grammar_fails_before_compiling() {
    let config = GrammarConfig::default().keyword("");
    assert!(matches!(
        Automaton::compile(&config),
        Err(GrammarError::EmptyLiteral { category: "keyword" })
    ));
}

// === Keywords ===

#[test]
fn keyword_decays_into_identifier() {
    let config = GrammarConfig::default()
        .keyword(Definition::named("BOOLEAN", ["true", "false"]))
        .whitespace_delimiters();
    let tokens = scan(&config, "true truex tru false");
    assert_eq!(
        kinds(&tokens),
        vec![
            ("true", "BOOLEAN"),
            ("truex", "IDENTIFIER"),
            ("tru", "IDENTIFIER"),
            ("false", "BOOLEAN"),
        ]
    );
}

#[test]
fn keyword_prefix_order_does_not_matter() {
    for keywords in [["in", "int"], ["int", "in"]] {
        let config = keywords
            .into_iter()
            .fold(GrammarConfig::default(), |config, keyword| config.keyword(keyword))
            .whitespace_delimiters();
        let tokens = scan(&config, "in int i into");
        assert_eq!(
            kinds(&tokens),
            vec![
                ("in", "KEYWORD"),
                ("int", "KEYWORD"),
                ("i", "IDENTIFIER"),
                ("into", "IDENTIFIER"),
            ],
            "keyword order {keywords:?}"
        );
    }
}

#[test]
fn keyword_with_non_identifier_chars() {
    let config = GrammarConfig::default()
        .keyword("#if")
        .whitespace_delimiters();
    let tokens = scan(&config, "#if x");
    assert_eq!(kinds(&tokens), vec![("#if", "KEYWORD"), ("x", "IDENTIFIER")]);
}

#[test]
fn custom_identifier_class_extends_runs() {
    let config = GrammarConfig::default()
        .identifier_continue(CharClass::identifier_continue().with_extra("-"))
        .whitespace_delimiters();
    let tokens = scan(&config, "xml-stylesheet a-b");
    assert_eq!(
        kinds(&tokens),
        vec![("xml-stylesheet", "IDENTIFIER"), ("a-b", "IDENTIFIER")]
    );
}

// === Conflicts ===

#[test]
fn identical_registrations_are_not_conflicts() {
    let config = rejecting().keyword("if").keyword("if").punctuation("+").punctuation("+");
    assert!(Automaton::compile(&config).is_ok());
}

#[test]
fn keyword_prefixes_are_not_conflicts() {
    let config = rejecting().keyword("int").keyword("in").keyword("i");
    assert!(Automaton::compile(&config).is_ok());
}

#[test]
fn relabeled_keyword_is_rejected() {
    let config = rejecting()
        .keyword("null")
        .keyword(Definition::named("NULL", "null"));
    let err = Automaton::compile(&config).expect_err("ambiguous");
    assert_eq!(
        err.to_string(),
        "ambiguous grammar: \"null\" is claimed by keyword `KEYWORD` and by keyword `NULL`"
    );
}

#[test]
fn punctuation_and_delimiter_collision_is_rejected() {
    let config = rejecting().punctuation(";").delimiter(";");
    let err = Automaton::compile(&config).expect_err("ambiguous");
    assert!(matches!(err, GrammarError::Conflict { ref literal, .. } if literal == ";"));
}

#[test]
fn duplicate_opener_is_rejected() {
    let config = rejecting()
        .greedy(GreedyMatcher::new("A", "'").ends_with("'"))
        .greedy(GreedyMatcher::new("B", "'").ends_with("'"));
    assert!(matches!(
        Automaton::compile(&config),
        Err(GrammarError::Conflict { .. })
    ));
}

#[test]
fn dot_punctuation_conflicts_with_float() {
    let config = rejecting().punctuation(".");
    assert!(matches!(
        Automaton::compile(&config),
        Err(GrammarError::Conflict { .. })
    ));
}

#[test]
fn later_definition_wins_by_default() {
    let config = GrammarConfig::default()
        .punctuation(Definition::named("OPERATOR", "+"))
        .punctuation(Definition::named("PLUS", "+"))
        .whitespace_delimiters();
    let tokens = scan(&config, "1 + 2");
    assert_eq!(
        kinds(&tokens),
        vec![("1", "NUMBER"), ("+", "PLUS"), ("2", "NUMBER")]
    );
}

#[test]
fn float_wins_over_dot_punctuation_by_default() {
    let config = GrammarConfig::default()
        .punctuation(".")
        .whitespace_delimiters();
    let tokens = scan(&config, "1.5 .5");
    assert_eq!(kinds(&tokens), vec![("1.5", "NUMBER"), (".5", "NUMBER")]);
}

#[test]
fn sub_grammar_conflicts_are_wrapped() {
    let inner = rejecting().punctuation("=").delimiter("=");
    let config = GrammarConfig::default()
        .greedy(GreedyMatcher::new("TAG", "<").ends_with(">").sub_grammar(inner));
    let err = Automaton::compile(&config).expect_err("inner conflict");
    let GrammarError::SubGrammar { matcher, source } = err else {
        panic!("expected a wrapped error, got {err:?}");
    };
    assert_eq!(matcher, "TAG");
    assert!(matches!(*source, GrammarError::Conflict { .. }));
}

#[test]
fn punctuation_replacing_an_opener_drops_the_run() {
    let config = GrammarConfig::default()
        .greedy(GreedyMatcher::new("TAG", "<").ends_with(">"))
        .punctuation("<")
        .whitespace_delimiters();
    assert_eq!(kinds(&scan(&config, "<")), vec![("<", "PUNCTUATION")]);
    assert_eq!(
        kinds(&scan(&config, "<>")),
        vec![("<", "PUNCTUATION"), (">", "UNKNOWN")]
    );
    assert_eq!(
        kinds(&scan(&config, "< x")),
        vec![("<", "PUNCTUATION"), ("x", "IDENTIFIER")]
    );
}

#[test]
fn delimiter_replacing_an_opener_drops_the_run() {
    let config = GrammarConfig::default()
        .greedy(GreedyMatcher::new("COMMENT", "#").ends_with("\n"))
        .delimiter(Definition::named("HASH", "#"));
    assert_eq!(
        kinds(&scan(&config, "#a")),
        vec![("#", "HASH"), ("a", "IDENTIFIER")]
    );
}

#[test]
fn opener_replacing_a_keyword_drops_its_boundaries() {
    let config = GrammarConfig::default()
        .keyword("rem")
        .greedy(GreedyMatcher::new("COMMENT", "rem").ends_with("\n"))
        .whitespace_delimiters();
    assert_eq!(
        kinds(&scan(&config, "rem a b\nre x")),
        vec![
            ("rem a b\n", "COMMENT"),
            ("re", "IDENTIFIER"),
            ("x", "IDENTIFIER"),
        ]
    );
    assert_eq!(kinds(&scan(&config, "rem")), vec![("rem", "HALTED_COMMENT")]);
}
