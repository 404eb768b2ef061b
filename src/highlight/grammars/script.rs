// src/highlight/grammars/script.rs
// Hash-comment scripting languages.

use anyhow::Result;

use super::{common::*, words::*};
use crate::highlight::tables::{Grammar, State::*};

/// Single-line quoted literals and `#` comments.
fn script_base(name: &str) -> Result<Grammar> {
    let b = Grammar::builder(name).with_default(Normal, Normal);
    let b = quoted(b, b'"', DoubleQuoteLiteral, Some(DoubleQuoteEscape));
    let b = quoted(b, b'\'', SingleQuoteLiteral, Some(SingleQuoteEscape));
    line_comment(b, b'#')
        .with_transition(DoubleQuoteLiteral, b"\n", Normal)
        .with_transition(SingleQuoteLiteral, b"\n", Normal)
        .build()
}

/// Base plus literals that may span lines and backtick command literals.
fn multiline_script(name: &str) -> Result<Grammar> {
    let base = script_base(name)?;
    let b = Grammar::derive_from(&base, name)
        .with_transition(DoubleQuoteLiteral, b"\n", DoubleQuoteLiteral)
        .with_transition(SingleQuoteLiteral, b"\n", SingleQuoteLiteral);
    quoted(b, b'`', BacktickLiteral, Some(BacktickEscape)).build()
}

pub fn python() -> Result<Grammar> {
    Grammar::derive_from(&script_base("Python")?, "Python")
        .with_keywords("keyword", PYTHON_KEYWORDS)
        .build()
}

pub fn perl() -> Result<Grammar> {
    Grammar::derive_from(&multiline_script("Perl")?, "Perl")
        .ident_chars("$@%")
        .with_keywords("keyword", PERL_KEYWORDS)
        .build()
}

pub fn ruby() -> Result<Grammar> {
    Grammar::derive_from(&multiline_script("Ruby")?, "Ruby")
        .ident_chars("$@")
        .with_keywords("keyword", RUBY_KEYWORDS)
        .build()
}
