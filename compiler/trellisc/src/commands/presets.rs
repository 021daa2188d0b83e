use trellis_lexer::Preset;

/// Print every built-in grammar with a one-line description.
pub fn list_presets() {
    println!("Built-in grammars:");
    for preset in Preset::ALL {
        println!("  {:<10} {}", preset.name(), preset.description());
    }
}
