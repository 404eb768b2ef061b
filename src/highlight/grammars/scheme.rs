// src/highlight/grammars/scheme.rs
use anyhow::Result;

use super::{common::*, words::SCHEME_KEYWORDS};
use crate::highlight::tables::{
    Grammar, GrammarBuilder, Processor,
    State::{self, *},
    markup::{CLOSE, open_with},
};

const IDENT_PUNCT: &str = "!$%&*/:<=>?^~+-.@";

/// Characters that keep a `'symbol` or `#\char` token going.
fn token_bytes() -> Vec<u8> {
    (b'0'..=b'9')
        .chain(b'a'..=b'z')
        .chain(b'A'..=b'Z')
        .chain(b"_".iter().copied())
        .chain(IDENT_PUNCT.bytes())
        .collect()
}

/// A token state that runs over identifier characters. It ends on anything
/// else; the four openers of `Normal` start their construct right away.
fn token_run(b: GrammarBuilder, state: State) -> GrammarBuilder {
    b.with_transition(state, &token_bytes(), state)
        .with_default(state, Normal)
        .with_processor(state, Normal, Processor::CarryTrigger)
        .with_edge(state, Normal, CLOSE)
        .with_transition(state, b"\"", DoubleQuoteLiteral)
        .with_processor(state, DoubleQuoteLiteral, Processor::DropTrigger)
        .with_edge(state, DoubleQuoteLiteral, format!("{CLOSE}{}", open_with("literal", "\"")))
        .with_transition(state, b";", LineComment)
        .with_processor(state, LineComment, Processor::DropTrigger)
        .with_edge(state, LineComment, format!("{CLOSE}{}", open_with("comment", ";")))
        .with_transition(state, b"#", SchemeHash)
        .with_processor(state, SchemeHash, Processor::DropTrigger)
        .with_edge(state, SchemeHash, CLOSE)
}

/// Scheme: `;` and `#| |#` comments, strings, `#\c` characters and quoted
/// symbols. Punctuation such as `!` and `*` is part of identifiers.
pub fn scheme() -> Result<Grammar> {
    let b = Grammar::builder("Scheme").with_default(Normal, Normal);
    let b = quoted(b, b'"', DoubleQuoteLiteral, Some(DoubleQuoteEscape));
    let b = line_comment(b, b';');

    let b = lookahead(b, b'#', SchemeHash);
    let b = lookahead_into(b, SchemeHash, b'|', BlockCommentBody, "comment", "#|");
    let b = block_comment_body(b, b'|', b'#');

    // #\x, #\space: the first character always belongs to the literal.
    let b = lookahead_into(b, SchemeHash, b'\\', SchemeCharLiteral, "literal", "#\\")
        .with_default(SchemeCharLiteral, SchemeCharBody)
        .with_closure(SchemeCharLiteral, CLOSE);
    let b = token_run(b, SchemeCharBody);

    let b = b
        .with_transition(Normal, b"'", SchemeSymbol)
        .with_processor(Normal, SchemeSymbol, Processor::TrimTrigger)
        .with_edge(Normal, SchemeSymbol, open_with("symbol", "'"));
    token_run(b, SchemeSymbol)
        .reopen_after(SchemeHash, "#")
        .ident_chars(IDENT_PUNCT)
        .with_keywords("keyword", SCHEME_KEYWORDS)
        .build()
}
