// src/highlight/tables/mod.rs
pub mod grammar;
pub mod io;
pub mod keywords;
pub mod processor;
pub mod states;

// Re-exports to keep the external API flat.
pub use grammar::{ASCII, Grammar, GrammarBuilder, TransitionTable};
pub use io::{grammar_to_json, load_grammar_json_bytes, save_grammar_json};
pub use keywords::{KeywordOverlay, KeywordSet};
pub use processor::{Processor, escape_html};
pub use states::{ALL_STATES, N_STATES, State};

/// Markup used by the built-in grammars.
pub mod markup {
    pub const CLOSE: &str = "</span>";

    /// Opening tag followed by the literal text it introduces.
    pub fn open_with(class: &str, text: &str) -> String {
        format!("<span class=\"{class}\">{text}")
    }
}
