//! Options shared by the `lex` and `check` commands.

use std::fmt;

use trellis_lexer::Preset;

/// Where the grammar comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarSource {
    Preset(Preset),
    /// Path to a JSON grammar document.
    File(String),
}

impl Default for GrammarSource {
    fn default() -> Self {
        GrammarSource::Preset(Preset::Common)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexOptions {
    pub path: String,
    pub grammar: GrammarSource,
    /// Stream the file in reads of this many bytes instead of loading it.
    pub chunk: Option<usize>,
    /// Print one JSON object per token.
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionError {
    MissingPath,
    UnknownPreset(String),
    BadChunk(String),
    UnknownFlag(String),
    ExtraArgument(String),
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::MissingPath => f.write_str("missing file path"),
            OptionError::UnknownPreset(name) => {
                write!(f, "unknown preset '{name}' (run `trellis presets` to list them)")
            }
            OptionError::BadChunk(value) => {
                write!(f, "--chunk expects a positive byte count, got '{value}'")
            }
            OptionError::UnknownFlag(flag) => write!(f, "unknown option '{flag}'"),
            OptionError::ExtraArgument(arg) => write!(f, "unexpected argument '{arg}'"),
        }
    }
}

/// Parse the arguments following the command name.
///
/// Flags may appear before or after the path. A later `--preset` or
/// `--grammar` replaces an earlier one.
pub fn parse_lex_options(args: &[String]) -> Result<LexOptions, OptionError> {
    let mut path = None;
    let mut grammar = GrammarSource::default();
    let mut chunk = None;
    let mut json = false;

    for arg in args {
        if let Some(name) = arg.strip_prefix("--preset=") {
            let preset = name
                .parse()
                .map_err(|_| OptionError::UnknownPreset(name.to_owned()))?;
            grammar = GrammarSource::Preset(preset);
        } else if let Some(file) = arg.strip_prefix("--grammar=") {
            grammar = GrammarSource::File(file.to_owned());
        } else if let Some(size) = arg.strip_prefix("--chunk=") {
            match size.parse::<usize>() {
                Ok(size) if size > 0 => chunk = Some(size),
                _ => return Err(OptionError::BadChunk(size.to_owned())),
            }
        } else if arg == "--json" {
            json = true;
        } else if arg.starts_with('-') {
            return Err(OptionError::UnknownFlag(arg.clone()));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(OptionError::ExtraArgument(arg.clone()));
        }
    }

    Ok(LexOptions {
        path: path.ok_or(OptionError::MissingPath)?,
        grammar,
        chunk,
        json,
    })
}
