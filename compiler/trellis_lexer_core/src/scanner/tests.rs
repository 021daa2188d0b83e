use super::*;
use pretty_assertions::assert_eq;
use smallvec::smallvec;
use trellis_grammar::{Definition, GrammarConfig, GreedyMatcher, Labels};

use crate::TokenBuf;

fn tok(value: &str, kind: &str, position: usize) -> Token {
    Token::new(value, kind, position)
}

fn scanner(config: &GrammarConfig) -> Scanner {
    Scanner::new(Automaton::compile(config).expect("grammar compiles"))
}

fn scan(config: &GrammarConfig, input: &str) -> Vec<Token> {
    scanner(config).tokenize(input)
}

fn scan_chunks(config: &GrammarConfig, chunks: &[&str]) -> Vec<Token> {
    let mut scanner = scanner(config);
    let mut tokens = Vec::new();
    for chunk in chunks {
        scanner.consume(chunk, |t| tokens.push(t));
    }
    scanner.flush(|t| tokens.push(t));
    tokens
}

/// Every split of `input` into two chunks, at each char boundary.
fn assert_split_invariant(config: &GrammarConfig, input: &str) {
    let whole = scan(config, input);
    for (split, _) in input.char_indices().skip(1) {
        let (head, tail) = input.split_at(split);
        assert_eq!(scan_chunks(config, &[head, tail]), whole, "split at {split}");
    }
}

fn math() -> GrammarConfig {
    GrammarConfig::default()
        .keyword("gcd")
        .punctuation(Definition::named("OPERATOR", ["+", "-", "/"]))
        .punctuation(Definition::named("PAREN_OPEN", "("))
        .punctuation(Definition::named("PAREN_CLOSE", ")"))
        .punctuation(",")
        .whitespace_delimiters()
}

fn strings() -> GrammarConfig {
    GrammarConfig::default()
        .greedy(
            GreedyMatcher::new("STRING", "\"")
                .ends_with("\"")
                .halts_with("\n")
                .escapes_with("\\"),
        )
        .whitespace_delimiters()
}

// === Basic scanning ===

#[test]
fn math_expression() {
    let tokens = scan(&math(), "5 + 6 -(4/2) + gcd(10 * 2, 5)");
    assert_eq!(
        tokens,
        vec![
            tok("5", "NUMBER", 0),
            tok("+", "OPERATOR", 2),
            tok("6", "NUMBER", 4),
            tok("-", "OPERATOR", 6),
            tok("(", "PAREN_OPEN", 7),
            tok("4", "NUMBER", 8),
            tok("/", "OPERATOR", 9),
            tok("2", "NUMBER", 10),
            tok(")", "PAREN_CLOSE", 11),
            tok("+", "OPERATOR", 13),
            tok("gcd", "KEYWORD", 15),
            tok("(", "PAREN_OPEN", 18),
            tok("10", "NUMBER", 19),
            tok("*", "UNKNOWN", 22),
            tok("2", "NUMBER", 24),
            tok(",", "PUNCTUATION", 25),
            tok("5", "NUMBER", 27),
            tok(")", "PAREN_CLOSE", 28),
        ]
    );
}

#[test]
fn math_expression_is_split_invariant() {
    assert_split_invariant(&math(), "5 + 6 -(4/2) + gcd(10 * 2, 5)");
}

#[test]
fn one_char_chunks_match_whole_input() {
    let input = "gcd(12,3)+x";
    let chunks: Vec<String> = input.chars().map(String::from).collect();
    let chunks: Vec<&str> = chunks.iter().map(String::as_str).collect();
    assert_eq!(scan_chunks(&math(), &chunks), scan(&math(), input));
}

#[test]
fn empty_input_yields_nothing() {
    assert!(scan(&math(), "").is_empty());
    assert!(scan_chunks(&math(), &["", ""]).is_empty());
}

#[test]
fn unknown_runs_end_at_terminators() {
    let tokens = scan(&math(), "x@y z");
    assert_eq!(
        tokens,
        vec![tok("x@y", "UNKNOWN", 0), tok("z", "IDENTIFIER", 4)]
    );
}

#[test]
fn digits_followed_by_letters_are_unknown() {
    let tokens = scan(&math(), "12ab 3");
    assert_eq!(tokens, vec![tok("12ab", "UNKNOWN", 0), tok("3", "NUMBER", 5)]);
}

#[test]
fn longest_punctuation_is_preferred() {
    let config = GrammarConfig::default()
        .punctuation("<")
        .punctuation("<=")
        .punctuation("=");
    let tokens = scan(&config, "a<=b<c");
    assert_eq!(
        tokens,
        vec![
            tok("a", "IDENTIFIER", 0),
            tok("<=", "PUNCTUATION", 1),
            tok("b", "IDENTIFIER", 3),
            tok("<", "PUNCTUATION", 4),
            tok("c", "IDENTIFIER", 5),
        ]
    );
}

#[test]
fn adjacent_punctuation_releases_in_turn() {
    let config = GrammarConfig::default()
        .punctuation("(")
        .punctuation(")");
    let tokens = scan(&config, "(()");
    assert_eq!(
        tokens,
        vec![
            tok("(", "PUNCTUATION", 0),
            tok("(", "PUNCTUATION", 1),
            tok(")", "PUNCTUATION", 2),
        ]
    );
}

#[test]
fn multi_char_delimiter_ends_runs() {
    let config = GrammarConfig::default().delimiter("\r\n");
    let tokens = scan(&config, "ab\r\ncd");
    assert_eq!(
        tokens,
        vec![tok("ab", "IDENTIFIER", 0), tok("cd", "IDENTIFIER", 4)]
    );
}

#[test]
fn partial_delimiter_becomes_unknown_content() {
    let config = GrammarConfig::default().delimiter("\r\n");
    let tokens = scan(&config, "ab\rx");
    assert_eq!(tokens, vec![tok("ab\rx", "UNKNOWN", 0)]);
}

// === Numbers ===

#[test]
fn floats_use_their_own_label() {
    let config = GrammarConfig {
        labels: Labels {
            float: Some("FLOAT".to_owned()),
            ..Labels::default()
        },
        ..GrammarConfig::default()
    }
    .whitespace_delimiters();
    let tokens = scan(&config, "3.14 .5 7");
    assert_eq!(
        tokens,
        vec![
            tok("3.14", "FLOAT", 0),
            tok(".5", "FLOAT", 5),
            tok("7", "NUMBER", 8),
        ]
    );
}

#[test]
fn leading_dot_is_unknown_when_floats_need_a_number() {
    let config = GrammarConfig {
        floats_have_leading_number: true,
        ..GrammarConfig::default()
    }
    .whitespace_delimiters();
    let tokens = scan(&config, ".5 1.5");
    assert_eq!(
        tokens,
        vec![tok(".5", "UNKNOWN", 0), tok("1.5", "NUMBER", 3)]
    );
}

// === Delimiters ===

#[test]
fn named_delimiters_are_emitted() {
    let config = GrammarConfig::default()
        .delimiter(Definition::named("NEWLINE", "\n"))
        .delimiter(" ");
    let tokens = scan(&config, "a\n b");
    assert_eq!(
        tokens,
        vec![
            tok("a", "IDENTIFIER", 0),
            tok("\n", "NEWLINE", 1),
            tok("b", "IDENTIFIER", 3),
        ]
    );
}

#[test]
fn unnamed_delimiters_can_be_included() {
    let config = GrammarConfig {
        include_unnamed_delimiters: true,
        ..GrammarConfig::default()
    }
    .whitespace_delimiters();
    let tokens = scan(&config, "a \tb");
    assert_eq!(
        tokens,
        vec![
            tok("a", "IDENTIFIER", 0),
            tok(" ", "DELIMITER", 1),
            tok("\t", "DELIMITER", 2),
            tok("b", "IDENTIFIER", 3),
        ]
    );
}

// === Greedy runs ===

#[test]
fn escaped_quote_stays_inside_string() {
    let tokens = scan(&strings(), r#""esc\"""#);
    assert_eq!(tokens, vec![tok(r#""esc\"""#, "STRING", 0)]);
}

#[test]
fn escaped_terminator_followed_by_content() {
    let tokens = scan(&strings(), r#""a\"b" c"#);
    assert_eq!(
        tokens,
        vec![tok(r#""a\"b""#, "STRING", 0), tok("c", "IDENTIFIER", 7)]
    );
}

#[test]
fn escape_parity() {
    // (input, string token, remainder)
    let cases: [(&str, &str, Option<Token>); 4] = [
        (r#""a" b"#, r#""a""#, Some(tok("b", "IDENTIFIER", 4))),
        (r#""a\"b""#, r#""a\"b""#, None),
        (r#""a\\"b"#, r#""a\\""#, Some(tok("b", "IDENTIFIER", 5))),
        (r#""a\\\"b""#, r#""a\\\"b""#, None),
    ];
    for (input, string, rest) in cases {
        let mut expected = vec![tok(string, "STRING", 0)];
        expected.extend(rest);
        assert_eq!(scan(&strings(), input), expected, "input {input}");
    }
}

#[test]
fn opener_escape_does_not_count() {
    let config = GrammarConfig::default().greedy(
        GreedyMatcher::new("QUOTED", "@\\")
            .ends_with(";")
            .escapes_with("\\"),
    );
    let tokens = scan(&config, r"@\;");
    assert_eq!(tokens, vec![tok(r"@\;", "QUOTED", 0)]);
    let tokens = scan(&config, r"@\a\;;");
    assert_eq!(tokens, vec![tok(r"@\a\;;", "QUOTED", 0)]);
}

#[test]
fn halt_marker_reports_unterminated_run() {
    let tokens = scan(&strings(), "\"unterminated\n");
    assert_eq!(tokens, vec![tok("\"unterminated\n", "HALTED_STRING", 0)]);
}

#[test]
fn end_of_input_reports_unterminated_run() {
    let tokens = scan(&strings(), "x \"abc");
    assert_eq!(
        tokens,
        vec![tok("x", "IDENTIFIER", 0), tok("\"abc", "HALTED_STRING", 2)]
    );
    assert!(tokens[1].is_halted("HALTED_"));
}

#[test]
fn multi_char_terminator_with_partial_matches() {
    let config = GrammarConfig::default()
        .punctuation("/")
        .punctuation("*")
        .greedy(GreedyMatcher::new("COMMENT", "/*").ends_with("*/"))
        .whitespace_delimiters();
    let tokens = scan(&config, "a/b /* x * y **/ *");
    assert_eq!(
        tokens,
        vec![
            tok("a", "IDENTIFIER", 0),
            tok("/", "PUNCTUATION", 1),
            tok("b", "IDENTIFIER", 2),
            tok("/* x * y **/", "COMMENT", 4),
            tok("*", "PUNCTUATION", 17),
        ]
    );
}

#[test]
fn greedy_runs_are_split_invariant() {
    assert_split_invariant(&strings(), r#"say "hi \" there" "open"#);
}

#[test]
fn opener_without_terminator_acts_as_keyword() {
    let config = GrammarConfig::default()
        .greedy(GreedyMatcher::new("DIRECTIVE", "use"))
        .whitespace_delimiters();
    let tokens = scan(&config, "use user");
    assert_eq!(
        tokens,
        vec![tok("use", "DIRECTIVE", 0), tok("user", "IDENTIFIER", 4)]
    );
}

fn tag_and_comment(comment_first: bool) -> GrammarConfig {
    let tag = GreedyMatcher::new("TAG", "<").ends_with(">");
    let comment = GreedyMatcher::new("COMMENT", "<!--").ends_with("-->");
    let [first, second] = if comment_first {
        [comment, tag]
    } else {
        [tag, comment]
    };
    GrammarConfig::default()
        .greedy(first)
        .greedy(second)
        .whitespace_delimiters()
}

#[test]
fn longer_opener_only_matches_at_the_run_start() {
    for comment_first in [false, true] {
        let tokens = scan(&tag_and_comment(comment_first), "<a!b> c <!x> <!-- d > e -->");
        assert_eq!(
            tokens,
            vec![
                tok("<a!b>", "TAG", 0),
                tok("c", "IDENTIFIER", 6),
                tok("<!x>", "TAG", 8),
                tok("<!-- d > e -->", "COMMENT", 13),
            ],
            "comment first: {comment_first}"
        );
    }
}

#[test]
fn abandoned_longer_opener_stays_in_the_run() {
    let tokens = scan(&tag_and_comment(false), "<!-x> <!-");
    assert_eq!(
        tokens,
        vec![tok("<!-x>", "TAG", 0), tok("<!-", "HALTED_TAG", 6)]
    );
    assert_split_invariant(&tag_and_comment(true), "<a!b> <!-x> <!-- > -->");
}

// === Nested runs ===

fn tags() -> GrammarConfig {
    let inner = GrammarConfig::default()
        .punctuation("=")
        .greedy(GreedyMatcher::new("STRING", "\"").ends_with("\""))
        .whitespace_delimiters();
    GrammarConfig::default()
        .greedy(GreedyMatcher::new("TAG", "<").ends_with(">").sub_grammar(inner))
        .whitespace_delimiters()
}

#[test]
fn sub_grammar_tokens_are_shifted() {
    let tokens = scan(&tags(), "<a href=\"x\">hi");
    assert_eq!(
        tokens,
        vec![
            tok("<", "TAG", 0),
            tok("a", "IDENTIFIER", 1),
            tok("href", "IDENTIFIER", 3),
            tok("=", "PUNCTUATION", 7),
            tok("\"x\"", "STRING", 8),
            tok(">", "TAG", 11),
            tok("hi", "IDENTIFIER", 12),
        ]
    );
}

#[test]
fn unterminated_sub_grammar_run_is_halted() {
    let tokens = scan(&tags(), "<a b");
    assert_eq!(
        tokens,
        vec![
            tok("<", "HALTED_TAG", 0),
            tok("a", "IDENTIFIER", 1),
            tok("b", "IDENTIFIER", 3),
        ]
    );
}

#[test]
fn sub_grammar_holds_back_partial_terminators() {
    let inner = GrammarConfig::default()
        .punctuation("}")
        .whitespace_delimiters();
    let config = GrammarConfig::default()
        .greedy(GreedyMatcher::new("TEMPLATE", "{{").ends_with("}}").sub_grammar(inner))
        .whitespace_delimiters();
    let input = "{{ a } }} y";
    let tokens = scan(&config, input);
    assert_eq!(
        tokens,
        vec![
            tok("{{", "TEMPLATE", 0),
            tok("a", "IDENTIFIER", 3),
            tok("}", "PUNCTUATION", 5),
            tok("}}", "TEMPLATE", 7),
            tok("y", "IDENTIFIER", 10),
        ]
    );
    assert_split_invariant(&config, input);
}

#[test]
fn nested_scanner_is_reused_across_runs() {
    let mut scanner = scanner(&tags());
    let first = scanner.tokenize("<a><b>");
    assert_eq!(
        first,
        vec![
            tok("<", "TAG", 0),
            tok("a", "IDENTIFIER", 1),
            tok(">", "TAG", 2),
            tok("<", "TAG", 3),
            tok("b", "IDENTIFIER", 4),
            tok(">", "TAG", 5),
        ]
    );
    assert_eq!(scanner.tokenize("<a><b>"), first);
}

#[test]
fn empty_sub_grammar_run_keeps_opener_and_terminator_apart() {
    assert_eq!(
        scan(&tags(), "<> <"),
        vec![tok("<", "TAG", 0), tok(">", "TAG", 1), tok("<", "HALTED_TAG", 3)]
    );
}

#[test]
fn sub_grammar_is_split_invariant() {
    assert_split_invariant(&tags(), "<a href=\"x y\" b> t <c");
}

// === State ===

#[test]
fn reset_resumes_at_position() {
    let mut scanner = scanner(&math());
    let mut tokens = Vec::new();
    scanner.consume("gc", |t| tokens.push(t));
    assert_eq!(scanner.pending(), "gc");
    scanner.reset(40);
    scanner.consume("7 +", |t| tokens.push(t));
    scanner.flush(|t| tokens.push(t));
    assert_eq!(tokens, vec![tok("7", "NUMBER", 40), tok("+", "OPERATOR", 42)]);
    assert_eq!(scanner.position(), 43);
}

#[test]
fn pending_input_is_bounded_by_open_token() {
    let mut scanner = scanner(&math());
    scanner.consume("alpha beta gam", |_| {});
    assert_eq!(scanner.pending(), "gam");
    assert_eq!(scanner.position(), 11);
}

#[test]
fn transform_rewrites_emitted_tokens() {
    let automaton = Automaton::compile(&strings()).expect("compiles");
    let mut scanner = Scanner::new(automaton).with_transform(|token: Token| -> TokenBuf {
        if token.kind.as_ref() == "STRING" {
            let inner = token.value.trim_matches('"').to_owned();
            smallvec![Token::new(inner, "TEXT", token.position + 1)]
        } else {
            smallvec![token]
        }
    });
    let tokens = scanner.tokenize(r#"a "" "b""#);
    assert_eq!(
        tokens,
        vec![tok("a", "IDENTIFIER", 0), tok("b", "TEXT", 6)]
    );
}

#[test]
fn positions_are_byte_offsets() {
    let config = GrammarConfig::default()
        .punctuation("→")
        .whitespace_delimiters();
    let tokens = scan(&config, "é → x");
    assert_eq!(
        tokens,
        vec![
            tok("é", "UNKNOWN", 0),
            tok("→", "PUNCTUATION", 3),
            tok("x", "IDENTIFIER", 7),
        ]
    );
}
