//! `trellis lex`: print the token stream of a file.

use std::fs::File;

use trellis_lexer::Token;

use super::{fail, io_message, load_tokenizer, read_file};
use crate::options::LexOptions;

pub fn lex_file(options: &LexOptions) {
    let tokenizer = load_tokenizer(&options.grammar);
    let path = options.path.as_str();

    if let Some(chunk) = options.chunk {
        let file = File::open(path).unwrap_or_else(|e| fail(&io_message(path, &e)));
        for token in tokenizer.read_tokens(file).chunk_size(chunk) {
            match token {
                Ok(token) => print_token(&token, options.json),
                Err(e) => fail(&io_message(path, &e)),
            }
        }
        return;
    }

    let content = read_file(path);
    let tokens = tokenizer.tokenize(&content);
    if !options.json {
        println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    }
    for token in &tokens {
        print_token(token, options.json);
    }
}

fn print_token(token: &Token, json: bool) {
    if json {
        match serde_json::to_string(token) {
            Ok(line) => println!("{line}"),
            Err(e) => fail(&format!("cannot encode token: {e}")),
        }
    } else {
        println!("  {:>6}  {:<28} {:?}", token.position, token.kind, token.value);
    }
}
