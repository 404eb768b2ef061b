// src/highlight/engine.rs
// Streaming scan: one pass over the input, one table lookup per character,
// markup spliced in at state changes.

use super::tables::Grammar;

/// Highlight `text` with `grammar`. Total: every input produces output.
pub fn highlight_with(grammar: &Grammar, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let initial = grammar.initial_state();
    let keywords = grammar.keywords();

    let mut state = initial;
    let mut segment = String::new();

    for c in text.chars() {
        let next = grammar.next_state(state, c);
        segment.push(c);
        if next == state {
            continue;
        }

        // The processor leaves in `segment` whatever the next state starts with.
        grammar
            .processor_for(state, next)
            .close(&mut segment, keywords, &mut out);
        if let Some(edge) = grammar.edge(state, next) {
            out.push_str(edge);
        }
        state = next;
    }

    // End of input: same processor as a return to the initial state, in flush
    // mode so nothing held back is lost.
    grammar
        .processor_for(state, initial)
        .flush(&segment, keywords, &mut out);
    if state != initial {
        if let Some(close) = grammar.closure(state) {
            out.push_str(close);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::tables::{Grammar, Processor, State};

    fn quotes() -> Grammar {
        Grammar::builder("quotes")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, b"\"", State::DoubleQuoteLiteral)
            .with_transition(State::Normal, b"/", State::SlashSeen)
            .with_default(State::DoubleQuoteLiteral, State::DoubleQuoteLiteral)
            .with_transition(State::DoubleQuoteLiteral, b"\"", State::Normal)
            .with_default(State::SlashSeen, State::Normal)
            .with_processor(State::Normal, State::DoubleQuoteLiteral, Processor::TrimTrigger)
            .with_processor(State::Normal, State::SlashSeen, Processor::TrimTrigger)
            .with_processor(State::SlashSeen, State::Normal, Processor::putback("/"))
            .with_edge(State::Normal, State::DoubleQuoteLiteral, "<q>\"")
            .with_edge(State::DoubleQuoteLiteral, State::Normal, "</q>")
            .with_keywords("kw", &["if"])
            .build()
            .unwrap()
    }

    #[test]
    fn markup_at_transitions() {
        assert_eq!(
            highlight_with(&quotes(), "if \"if\" x"),
            "<span class=\"kw\">if</span> <q>\"if\"</q> x"
        );
    }

    #[test]
    fn unterminated_literal_is_closed() {
        assert_eq!(highlight_with(&quotes(), "a \"open"), "a <q>\"open</q>");
    }

    #[test]
    fn putback_keeps_words_whole() {
        assert_eq!(highlight_with(&quotes(), "x/if"), "x/<span class=\"kw\">if</span>");
        assert_eq!(highlight_with(&quotes(), "x/"), "x/");
    }

    #[test]
    fn passthrough_is_identity() {
        let g = Grammar::passthrough();
        for s in ["", "abc", "<a & b>", "/* é */"] {
            assert_eq!(highlight_with(&g, s), s);
        }
    }
}
