//! Command handlers for the `trellis` CLI.
//!
//! Handlers print their output and terminate the process with status 1 on
//! failure. Shared helpers for loading input and grammars live here.

mod check;
mod lex;
mod presets;

pub use check::check_file;
pub use lex::lex_file;
pub use presets::list_presets;

use trellis_lexer::{GrammarConfig, Tokenizer};

use crate::options::GrammarSource;

pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail(&io_message(path, &e)),
    }
}

pub(crate) fn io_message(path: &str, e: &std::io::Error) -> String {
    match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    }
}

pub(crate) fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

/// Compile the selected grammar, exiting on configuration errors.
pub(crate) fn load_tokenizer(source: &GrammarSource) -> Tokenizer {
    let (name, config) = match source {
        GrammarSource::Preset(preset) => (preset.name().to_owned(), preset.config()),
        GrammarSource::File(path) => {
            let text = read_file(path);
            match GrammarConfig::from_json(&text) {
                Ok(config) => (path.clone(), config),
                Err(e) => fail(&format!("invalid grammar '{path}': {e}")),
            }
        }
    };
    tracing::debug!(grammar = %name, "compiling grammar");
    match Tokenizer::new(&config) {
        Ok(tokenizer) => tokenizer,
        Err(e) => fail(&format!("invalid grammar '{name}': {e}")),
    }
}

/// 1-based line and column (in characters) of byte `offset` in `text`.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |at| at + 1);
    let line = before.matches('\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
