//! Trellis CLI
//!
//! Tokenize files with a built-in or JSON-defined grammar.

use trellisc::commands::{check_file, lex_file, list_presets};
use trellisc::options::parse_lex_options;

fn main() {
    trellisc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" | "check" => {
            let options = match parse_lex_options(&args[2..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!(
                        "Usage: trellis {command} <file> [--preset=<name> | --grammar=<file.json>]"
                    );
                    std::process::exit(1);
                }
            };
            if command == "lex" {
                lex_file(&options);
            } else {
                check_file(&options);
            }
        }
        "presets" => {
            list_presets();
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Trellis {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Trellis tokenizer");
    println!();
    println!("Usage: trellis <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>        Tokenize a file and print the tokens");
    println!("  check <file>      Report unterminated strings and comments (exit 1 if any)");
    println!("  presets           List built-in grammars");
    println!("  help              Show this help message");
    println!("  version           Show version information");
    println!();
    println!("Options:");
    println!("  --preset=<name>         Built-in grammar (default: common)");
    println!("  --grammar=<file.json>   Grammar from a JSON document");
    println!("  --chunk=<bytes>         Stream the file in reads of this size (lex only)");
    println!("  --json                  One JSON object per token (lex only)");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=trellis_lexer_core=trace    Enable tracing output");
    println!("  TRELLIS_LOG_TREE=1                   Render spans as a tree");
    println!();
    println!("Examples:");
    println!("  trellis lex query.sql --preset=sql");
    println!("  trellis lex data.json --preset=json --json");
    println!("  trellis check main.js");
    println!("  trellis lex notes.txt --grammar=notes.grammar.json --chunk=4096");
}
