// src/highlight/grammars/common.rs
// Table fragments shared by several grammars. Each helper wires states,
// processors and edges together so content is never lost at a boundary.

use crate::highlight::tables::{
    GrammarBuilder, Processor,
    State::{self, *},
    markup::{CLOSE, open_with},
};

/// A quoted literal opened from `Normal` by `quote` and closed by the same
/// byte, with an optional backslash escape state.
pub(super) fn quoted(b: GrammarBuilder, quote: u8, body: State, escape: Option<State>) -> GrammarBuilder {
    let q = (quote as char).to_string();
    let b = b
        .with_transition(Normal, &[quote], body)
        .with_processor(Normal, body, Processor::TrimTrigger)
        .with_edge(Normal, body, open_with("literal", &q))
        .with_default(body, body)
        .with_transition(body, &[quote], Normal)
        .with_edge(body, Normal, CLOSE);
    match escape {
        Some(esc) => b
            .with_transition(body, b"\\", esc)
            .with_default(esc, body)
            .with_closure(esc, CLOSE),
        None => b,
    }
}

/// Line comment body: runs to the newline, which is handed back to `Normal`
/// after the span closes.
pub(super) fn line_comment_body(b: GrammarBuilder) -> GrammarBuilder {
    b.with_default(LineComment, LineComment)
        .with_transition(LineComment, b"\n", Normal)
        .with_processor(LineComment, Normal, Processor::CarryTrigger)
        .with_edge(LineComment, Normal, CLOSE)
}

/// Line comment started by a single `trigger` byte in `Normal`.
pub(super) fn line_comment(b: GrammarBuilder, trigger: u8) -> GrammarBuilder {
    let t = (trigger as char).to_string();
    line_comment_body(
        b.with_transition(Normal, &[trigger], LineComment)
            .with_processor(Normal, LineComment, Processor::TrimTrigger)
            .with_edge(Normal, LineComment, open_with("comment", &t)),
    )
}

/// `held` in `Normal` moves to the lookahead state `state`, holding the byte
/// back. Anything unexpected puts it back in front of the text.
pub(super) fn lookahead(b: GrammarBuilder, held: u8, state: State) -> GrammarBuilder {
    let h = (held as char).to_string();
    b.with_transition(Normal, &[held], state)
        .with_processor(Normal, state, Processor::TrimTrigger)
        .with_default(state, Normal)
        .with_processor(state, Normal, Processor::putback(&h))
}

/// The second byte of a lookahead pair leads into `target`; the edge spells
/// out both bytes (`opener`) at the head of a new `class` span. Held bytes
/// piled up by a loop on `state` come out as plain text before it.
pub(super) fn lookahead_into(
    b: GrammarBuilder,
    state: State,
    second: u8,
    target: State,
    class: &str,
    opener: &str,
) -> GrammarBuilder {
    b.with_transition(state, &[second], target)
        .with_processor(state, target, Processor::DropTrigger)
        .with_edge(state, target, open_with(class, opener))
}

/// Block comment body closed by `star` followed by `close`.
pub(super) fn block_comment_body(b: GrammarBuilder, star: u8, close: u8) -> GrammarBuilder {
    b.with_default(BlockCommentBody, BlockCommentBody)
        .with_transition(BlockCommentBody, &[star], BlockCommentEnd)
        .with_default(BlockCommentEnd, BlockCommentBody)
        .with_transition(BlockCommentEnd, &[star], BlockCommentEnd)
        .with_transition(BlockCommentEnd, &[close], Normal)
        .with_edge(BlockCommentEnd, Normal, CLOSE)
        .with_closure(BlockCommentBody, CLOSE)
}
