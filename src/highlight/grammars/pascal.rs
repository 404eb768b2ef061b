// src/highlight/grammars/pascal.rs
use anyhow::Result;

use super::{common::*, words::PASCAL_KEYWORDS};
use crate::highlight::tables::{
    Grammar, Processor,
    State::*,
    markup::{CLOSE, open_with},
};

/// Pascal/Delphi: `'...'` strings (quotes doubled, no escapes), `{ }` and
/// `(* *)` comments, `//` line comments.
pub fn pascal() -> Result<Grammar> {
    let b = Grammar::builder("Pascal").with_default(Normal, Normal);
    let b = quoted(b, b'\'', SingleQuoteLiteral, None);

    // { ... }
    let b = b
        .with_transition(Normal, b"{", BraceComment)
        .with_processor(Normal, BraceComment, Processor::TrimTrigger)
        .with_edge(Normal, BraceComment, open_with("comment", "{"))
        .with_default(BraceComment, BraceComment)
        .with_transition(BraceComment, b"}", Normal)
        .with_edge(BraceComment, Normal, CLOSE)
        .with_closure(BraceComment, CLOSE);

    // (* ... *)
    let b = lookahead(b, b'(', ParenSeen);
    let b = lookahead_into(b, ParenSeen, b'*', BlockCommentBody, "comment", "(*");
    let b = block_comment_body(b, b'*', b')');

    // // ...
    let b = lookahead(b, b'/', SlashSeen);
    let b = lookahead_into(b, SlashSeen, b'/', LineComment, "comment", "//");
    line_comment_body(b)
        .with_transition(SingleQuoteLiteral, b"\n", Normal)
        .reopen_after(ParenSeen, "(")
        .reopen_after(SlashSeen, "/")
        .case_insensitive(true)
        .with_keywords("keyword", PASCAL_KEYWORDS)
        .build()
}
