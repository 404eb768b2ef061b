// src/highlight/tables/processor.rs
use serde::{Deserialize, Serialize};

use super::keywords::KeywordOverlay;

/// Transform applied to a segment when the scanner leaves a state.
///
/// The segment always ends with the character that fired the transition
/// (the "trigger"). Variants that trim it rely on the edge markup of the same
/// transition to print it again, inside the span that edge opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Processor {
    /// Emit the segment unchanged.
    Raw,
    /// Default-state text: keyword overlay.
    Keywords,
    /// HTML-escape `&`, `<` and `>`.
    Escape,
    /// Overlay everything but the trigger.
    TrimTrigger,
    /// Emit everything but the trigger unchanged.
    DropTrigger,
    /// Escape everything but the trigger.
    EscapeTrimTrigger,
    /// Escape the segment, except that a trigger listed in `chars` is held
    /// back to start the next segment, after the edge markup.
    EscapeCarry { chars: String },
    /// Drop the segment; the edge markup spells it out.
    Discard,
    /// Abandoned lookahead back to plain text: restore `prefix` and keep the
    /// result as the start of the next segment.
    Putback { prefix: String },
    /// Abandoned lookahead directly followed by another opener: emit `prefix`
    /// and the segment minus its trigger as plain text.
    PutbackTrim { prefix: String },
    /// Emit everything but the trigger unchanged; the trigger starts the next
    /// segment, after the edge markup.
    CarryTrigger,
}

impl Processor {
    pub fn putback(prefix: &str) -> Self {
        Processor::Putback {
            prefix: prefix.to_owned(),
        }
    }

    pub fn escape_carry(chars: &str) -> Self {
        Processor::EscapeCarry {
            chars: chars.to_owned(),
        }
    }

    pub fn putback_trim(prefix: &str) -> Self {
        Processor::PutbackTrim {
            prefix: prefix.to_owned(),
        }
    }

    /// Close `segment` on a transition, writing its transformed text to
    /// `out`. Whatever is left in `segment` seeds the next state's segment.
    pub fn close(&self, segment: &mut String, keywords: &KeywordOverlay, out: &mut String) {
        match self {
            Processor::Raw => out.push_str(segment),
            Processor::Keywords => keywords.apply(segment, out),
            Processor::Escape => escape_html(segment, out),
            Processor::TrimTrigger => {
                segment.pop();
                keywords.apply(segment, out);
            }
            Processor::EscapeTrimTrigger => {
                segment.pop();
                escape_html(segment, out);
            }
            Processor::DropTrigger => {
                segment.pop();
                out.push_str(segment);
            }
            Processor::EscapeCarry { chars } => {
                let held = segment.chars().next_back().filter(|&c| chars.contains(c));
                if held.is_some() {
                    segment.pop();
                }
                escape_html(segment, out);
                segment.clear();
                if let Some(c) = held {
                    segment.push(c);
                }
                return;
            }
            Processor::Discard => {}
            Processor::Putback { prefix } => {
                segment.insert_str(0, prefix);
                return;
            }
            Processor::PutbackTrim { prefix } => {
                segment.pop();
                segment.insert_str(0, prefix);
                keywords.apply(segment, out);
            }
            Processor::CarryTrigger => {
                let trigger = segment.pop();
                out.push_str(segment);
                segment.clear();
                if let Some(c) = trigger {
                    segment.push(c);
                }
                return;
            }
        }
        segment.clear();
    }

    /// Flush the last segment at end of input. There is no trigger to trim,
    /// and any held lookahead prefix is restored.
    pub fn flush(&self, segment: &str, keywords: &KeywordOverlay, out: &mut String) {
        match self {
            Processor::Keywords | Processor::TrimTrigger => keywords.apply(segment, out),
            Processor::Escape | Processor::EscapeTrimTrigger | Processor::EscapeCarry { .. } => {
                escape_html(segment, out)
            }
            Processor::Putback { prefix } | Processor::PutbackTrim { prefix } => {
                let mut restored = String::with_capacity(prefix.len() + segment.len());
                restored.push_str(prefix);
                restored.push_str(segment);
                keywords.apply(&restored, out);
            }
            Processor::Raw
            | Processor::DropTrigger
            | Processor::Discard
            | Processor::CarryTrigger => out.push_str(segment),
        }
    }
}

pub fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordOverlay {
        let mut k = KeywordOverlay::new();
        k.add_words("keyword", &["if"]);
        k
    }

    fn close(p: &Processor, seg: &str) -> (String, String) {
        let mut segment = seg.to_owned();
        let mut out = String::new();
        p.close(&mut segment, &keywords(), &mut out);
        (out, segment)
    }

    #[test]
    fn trim_trigger_drops_last_char_only() {
        let (out, rest) = close(&Processor::TrimTrigger, "if é\"");
        assert_eq!(out, "<span class=\"keyword\">if</span> é");
        assert!(rest.is_empty());
    }

    #[test]
    fn putback_seeds_next_segment() {
        let (out, rest) = close(&Processor::putback("/"), "i");
        assert!(out.is_empty());
        assert_eq!(rest, "/i");
    }

    #[test]
    fn putback_trim_emits_prefix() {
        let (out, rest) = close(&Processor::putback_trim("-"), "'");
        assert_eq!(out, "-");
        assert!(rest.is_empty());
    }

    #[test]
    fn carry_trigger_moves_trigger_forward() {
        let (out, rest) = close(&Processor::CarryTrigger, "// note\n");
        assert_eq!(out, "// note");
        assert_eq!(rest, "\n");
    }

    #[test]
    fn drop_trigger_skips_overlay() {
        let (out, rest) = close(&Processor::DropTrigger, "'if<\"");
        assert_eq!(out, "'if<");
        assert!(rest.is_empty());
    }

    #[test]
    fn escape_carry_holds_listed_triggers() {
        let p = Processor::escape_carry(" \n");
        let (out, rest) = close(&p, "a<b ");
        assert_eq!(out, "a&lt;b");
        assert_eq!(rest, " ");

        let (out, rest) = close(&p, "amp;");
        assert_eq!(out, "amp;");
        assert!(rest.is_empty());
    }

    #[test]
    fn escape_variants() {
        assert_eq!(close(&Processor::Escape, "a<b&c>").0, "a&lt;b&amp;c&gt;");
        assert_eq!(close(&Processor::EscapeTrimTrigger, "x&<").0, "x&amp;");
    }

    #[test]
    fn flush_restores_held_prefix() {
        let mut out = String::new();
        Processor::putback("/").flush("", &keywords(), &mut out);
        assert_eq!(out, "/");

        let mut out = String::new();
        Processor::EscapeTrimTrigger.flush("a<", &keywords(), &mut out);
        assert_eq!(out, "a&lt;");
    }
}
