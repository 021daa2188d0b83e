//! Built-in grammars.

use std::fmt;
use std::str::FromStr;

use trellis_grammar::{CharClass, Definition, GrammarConfig, GreedyMatcher};

/// A named grammar shipped with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Arithmetic with `gcd`, operators and parentheses.
    Math,
    /// A small SQL query subset.
    Sql,
    Json,
    /// C-family source: operators, three string kinds and both comment styles.
    Common,
    /// Markup tags and attributes.
    XmlLike,
    /// Whole tags and comments, with attributes scanned inside each tag.
    Markup,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown preset `{0}`")]
pub struct UnknownPreset(pub String);

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Math,
        Preset::Sql,
        Preset::Json,
        Preset::Common,
        Preset::XmlLike,
        Preset::Markup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Math => "math",
            Preset::Sql => "sql",
            Preset::Json => "json",
            Preset::Common => "common",
            Preset::XmlLike => "xml_like",
            Preset::Markup => "markup",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Math => "numbers, + - /, parentheses and the gcd keyword",
            Preset::Sql => "SELECT/FROM/WHERE queries with double-quoted strings",
            Preset::Json => "JSON documents",
            Preset::Common => "C-like operators, quoted strings and comments",
            Preset::XmlLike => "tags, attributes and quoted values",
            Preset::Markup => "whole tags with nested attribute tokens, and comments",
        }
    }

    /// The grammar configuration for this preset.
    pub fn config(self) -> GrammarConfig {
        match self {
            Preset::Math => math(),
            Preset::Sql => sql(),
            Preset::Json => json(),
            Preset::Common => common(),
            Preset::XmlLike => xml_like(),
            Preset::Markup => markup(),
        }
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| UnknownPreset(name.to_owned()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn quoted(kind: &str, quote: &str) -> GreedyMatcher {
    GreedyMatcher::new(kind, quote)
        .ends_with(quote)
        .halts_with("\n")
        .escapes_with("\\")
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

fn sql() -> GrammarConfig {
    GrammarConfig::default()
        .keyword(Definition::named("FUNCTION", "COUNT"))
        .keyword(Definition::named("BOOLEAN", ["TRUE", "FALSE"]))
        .keyword(Definition::named("NULL", "NULL"))
        .keyword(Definition::named(
            "KEYWORD",
            ["SELECT", "FROM", "WHERE", "AND", "IS"],
        ))
        .punctuation(Definition::named("OPERATOR", ["+", "="]))
        .punctuation(Definition::named("PAREN_OPEN", "("))
        .punctuation(Definition::named("PAREN_CLOSE", ")"))
        .punctuation(",")
        .whitespace_delimiters()
        .greedy(quoted("DOUBLE_QUOTED_STRING", "\""))
}

fn json() -> GrammarConfig {
    GrammarConfig::default()
        .keyword(Definition::named("BOOLEAN", ["true", "false"]))
        .keyword(Definition::named("NULL", "null"))
        .punctuation(Definition::named("ARRAY_OPEN", "["))
        .punctuation(Definition::named("ARRAY_CLOSE", "]"))
        .punctuation(Definition::named("ARRAY_ITEM_SEPARATOR", ","))
        .punctuation(Definition::named("OBJECT_OPEN", "{"))
        .punctuation(Definition::named("OBJECT_CLOSE", "}"))
        .punctuation(Definition::named("ASSIGNMENT", ":"))
        .whitespace_delimiters()
        .greedy(GreedyMatcher::new("STRING", "\"").ends_with("\"").escapes_with("\\"))
}

fn common() -> GrammarConfig {
    let config = GrammarConfig::default()
        .keyword(Definition::named("BOOLEAN", ["true", "false"]))
        .keyword(Definition::named("NULL", "null"))
        .keyword("this")
        .punctuation(Definition::named(
            "OPERATOR",
            [
                "?", "%", "+", "-", "*", "/", "!=", "=", "!", "<=", ">=", "<", ">", "^", "&&", "&",
                "||", "|",
            ],
        ))
        .punctuation(Definition::named("ASSIGNMENT", ":"));
    ["[", ",", "(", ")", "{", "}", "]"]
        .into_iter()
        .fold(config, |config, literal| config.punctuation(literal))
        .greedy(quoted("DOUBLE_QUOTED_STRING", "\""))
        .greedy(quoted("SINGLE_QUOTED_STRING", "'"))
        .greedy(GreedyMatcher::new("BACKTICK_STRING", "`").ends_with("`"))
        .greedy(GreedyMatcher::new("SINGLE_LINE_COMMENT", "//").ends_with("\n"))
        .greedy(GreedyMatcher::new("MULTI_LINE_COMMENT", "/*").ends_with("*/"))
        .delimiter(Definition::named("NEWLINE", "\n"))
        .delimiter(" ")
        .delimiter("\r")
        .delimiter("\t")
}

fn xml_like() -> GrammarConfig {
    GrammarConfig::default()
        .punctuation(Definition::named("START_TAG_OPEN", "<"))
        .punctuation(Definition::named("START_TAG_SELF_CLOSE", "/>"))
        .punctuation(Definition::named("END_TAG_OPEN", "</"))
        .punctuation(Definition::named("TAG_CLOSE", ">"))
        .punctuation(Definition::named("PROCESSING_TAG_OPEN", "<?"))
        .punctuation(Definition::named("PROCESSING_TAG_CLOSE", "?>"))
        .punctuation(Definition::named("MARKUP_TAG_OPEN", "<!"))
        .punctuation(Definition::named("ASSIGNMENT", "="))
        .whitespace_delimiters()
        .greedy(GreedyMatcher::new("DOUBLE_QUOTED_STRING", "\"").ends_with("\"").escapes_with("\\"))
        .greedy(GreedyMatcher::new("SINGLE_QUOTED_STRING", "'").ends_with("'").escapes_with("\\"))
        .identifier_continue(CharClass::identifier_continue().with_extra(":.-"))
}

fn markup() -> GrammarConfig {
    let attributes = GrammarConfig::default()
        .punctuation(Definition::named("ASSIGNMENT", "="))
        .punctuation(Definition::named("SLASH", "/"))
        .whitespace_delimiters()
        .greedy(GreedyMatcher::new("DOUBLE_QUOTED_STRING", "\"").ends_with("\""))
        .greedy(GreedyMatcher::new("SINGLE_QUOTED_STRING", "'").ends_with("'"))
        .identifier_continue(CharClass::identifier_continue().with_extra(":.-"));
    GrammarConfig::default()
        .whitespace_delimiters()
        .greedy(GreedyMatcher::new("TAG", "<").ends_with(">").sub_grammar(attributes))
        .greedy(GreedyMatcher::new("COMMENT", "<!--").ends_with("-->"))
}
