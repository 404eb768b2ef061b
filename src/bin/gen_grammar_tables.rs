// src/bin/gen_grammar_tables.rs
// Dump every built-in grammar as JSON, one file per grammar, so the tables
// can be reviewed, diffed, or edited and loaded back via SYNHL_GRAMMAR_DIR.

use std::path::PathBuf;

use anyhow::Result;
use synhl::highlight::{registry, tables::save_grammar_json};

/// `C++` -> `cpp`, `C#` -> `csharp`, `Plain Text` -> `plain_text`.
fn file_stem(name: &str) -> String {
    name.to_lowercase()
        .replace('+', "p")
        .replace('#', "sharp")
        .replace(' ', "_")
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "tables".into()));
    println!("[gen_grammar_tables] writing {} grammars to {}", registry().len(), out_dir.display());

    for name in registry().names() {
        let Some(g) = registry().by_name(name) else {
            continue;
        };
        let path = out_dir.join(format!("{}.json", file_stem(name)));
        save_grammar_json(&path, g)?;
        println!(
            "[gen_grammar_tables] {:<10} states={:<2} words={:<4} -> {}",
            name,
            g.reachable_states().len(),
            g.keywords().word_count(),
            path.display()
        );
    }
    Ok(())
}
