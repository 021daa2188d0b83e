//! `trellis check`: report unterminated runs.

use super::{line_col, load_tokenizer, read_file};
use crate::options::LexOptions;

pub fn check_file(options: &LexOptions) {
    let tokenizer = load_tokenizer(&options.grammar);
    let path = options.path.as_str();
    let content = read_file(path);
    let prefix = tokenizer.automaton().halted_prefix();

    let mut halted = 0usize;
    for token in tokenizer.tokenize(&content) {
        if !token.is_halted(prefix) {
            continue;
        }
        halted += 1;
        let (line, column) = line_col(&content, token.position);
        let kind = &token.kind[prefix.len()..];
        eprintln!("{path}:{line}:{column}: unterminated {kind}");
    }

    if halted > 0 {
        eprintln!();
        eprintln!("{halted} unterminated run(s) in '{path}'");
        std::process::exit(1);
    }
    println!("{path}: ok");
}
