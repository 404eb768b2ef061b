// src/highlight/mod.rs
pub mod engine;
pub mod grammars;
pub mod tables;

pub use engine::highlight_with;
pub use grammars::{GrammarInfo, GrammarRegistry, PLAIN_TEXT, registry};

/// Highlight `text` with the built-in grammar called `language`.
///
/// Never fails: `Plain Text` and unknown languages return `text` unchanged,
/// and unterminated constructs are closed on a best-effort basis.
pub fn highlight(text: &str, language: &str) -> String {
    registry().highlight(text, language)
}

/// Like [`highlight`], decoding `bytes` as UTF-8 first (invalid sequences
/// become U+FFFD).
pub fn highlight_bytes(bytes: &[u8], language: &str) -> String {
    highlight(&String::from_utf8_lossy(bytes), language)
}
