// src/highlight/grammars/xml.rs
// Markup: every text byte goes through the escaper, so the output can be
// dropped into a page as-is.

use anyhow::Result;

use crate::highlight::tables::{
    Grammar, Processor,
    State::*,
    markup::{CLOSE, open_with},
};

const TAG_END: &str = "&gt;</span>";

pub fn xml() -> Result<Grammar> {
    Grammar::builder("XML")
        .default_processor(Processor::Escape)
        .with_default(Normal, Normal)
        .with_transition(Normal, b"<", XmlTagStart)
        .with_processor(Normal, XmlTagStart, Processor::EscapeTrimTrigger)
        .with_edge(Normal, XmlTagStart, open_with("tag", "&lt;"))
        .with_transition(Normal, b"&", HtmlEntity)
        .with_processor(Normal, HtmlEntity, Processor::EscapeTrimTrigger)
        .with_edge(Normal, HtmlEntity, open_with("entity", "&amp;"))
        // <name, <?pi, <>
        .with_default(XmlTagStart, XmlTag)
        .with_from_processor(XmlTagStart, Processor::Escape)
        .with_transition(XmlTagStart, b"?", XmlProcessingInstruction)
        .with_transition(XmlTagStart, b">", Normal)
        .with_processor(XmlTagStart, Normal, Processor::EscapeTrimTrigger)
        .with_edge(XmlTagStart, Normal, TAG_END)
        .with_closure(XmlTagStart, CLOSE)
        // attributes
        .with_default(XmlTag, XmlTag)
        .with_transition(XmlTag, b">", Normal)
        .with_processor(XmlTag, Normal, Processor::EscapeTrimTrigger)
        .with_edge(XmlTag, Normal, TAG_END)
        .with_transition(XmlTag, b"\"", DoubleQuoteLiteral)
        .with_processor(XmlTag, DoubleQuoteLiteral, Processor::EscapeTrimTrigger)
        .with_edge(XmlTag, DoubleQuoteLiteral, open_with("literal", "\""))
        .with_transition(XmlTag, b"'", SingleQuoteLiteral)
        .with_processor(XmlTag, SingleQuoteLiteral, Processor::EscapeTrimTrigger)
        .with_edge(XmlTag, SingleQuoteLiteral, open_with("literal", "'"))
        .with_closure(XmlTag, CLOSE)
        .with_default(DoubleQuoteLiteral, DoubleQuoteLiteral)
        .with_transition(DoubleQuoteLiteral, b"\"", XmlTag)
        .with_from_processor(DoubleQuoteLiteral, Processor::Escape)
        .with_edge(DoubleQuoteLiteral, XmlTag, CLOSE)
        .with_closure(DoubleQuoteLiteral, "</span></span>")
        .with_default(SingleQuoteLiteral, SingleQuoteLiteral)
        .with_transition(SingleQuoteLiteral, b"'", XmlTag)
        .with_from_processor(SingleQuoteLiteral, Processor::Escape)
        .with_edge(SingleQuoteLiteral, XmlTag, CLOSE)
        .with_closure(SingleQuoteLiteral, "</span></span>")
        // <? ... >
        .with_default(XmlProcessingInstruction, XmlProcessingInstruction)
        .with_transition(XmlProcessingInstruction, b">", Normal)
        .with_processor(XmlProcessingInstruction, Normal, Processor::EscapeTrimTrigger)
        .with_edge(XmlProcessingInstruction, Normal, TAG_END)
        .with_closure(XmlProcessingInstruction, CLOSE)
        // &name;
        .with_default(HtmlEntity, HtmlEntity)
        .with_transition(HtmlEntity, b"; \t\r\n", Normal)
        .with_processor(HtmlEntity, Normal, Processor::escape_carry(" \t\r\n"))
        .with_edge(HtmlEntity, Normal, CLOSE)
        .with_transition(HtmlEntity, b"<", XmlTagStart)
        .with_processor(HtmlEntity, XmlTagStart, Processor::EscapeTrimTrigger)
        .with_edge(HtmlEntity, XmlTagStart, format!("{CLOSE}{}", open_with("tag", "&lt;")))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::engine::highlight_with;

    #[test]
    fn tag_with_attribute() {
        let g = xml().unwrap();
        assert_eq!(
            highlight_with(&g, "<a href=\"x\">"),
            "<span class=\"tag\">&lt;a href=<span class=\"literal\">\"x\"</span>&gt;</span>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let g = xml().unwrap();
        assert_eq!(
            highlight_with(&g, "a > b &amp; c"),
            "a &gt; b <span class=\"entity\">&amp;amp;</span> c"
        );
    }

    #[test]
    fn whitespace_after_entity_stays_outside() {
        let g = xml().unwrap();
        assert_eq!(
            highlight_with(&g, "&x y"),
            "<span class=\"entity\">&amp;x</span> y"
        );
        assert_eq!(
            highlight_with(&g, "&lt;\n"),
            "<span class=\"entity\">&amp;lt;</span>\n"
        );
        assert_eq!(
            highlight_with(&g, "&a\n&b;"),
            "<span class=\"entity\">&amp;a</span>\n<span class=\"entity\">&amp;b;</span>"
        );
    }

    #[test]
    fn entity_runs_into_tag() {
        let g = xml().unwrap();
        assert_eq!(
            highlight_with(&g, "&x<b>"),
            "<span class=\"entity\">&amp;x</span><span class=\"tag\">&lt;b&gt;</span>"
        );
    }

    #[test]
    fn processing_instruction() {
        let g = xml().unwrap();
        assert_eq!(
            highlight_with(&g, "<?xml v='1'?>"),
            "<span class=\"tag\">&lt;?xml v='1'?&gt;</span>"
        );
    }

    #[test]
    fn unterminated_tag_gets_no_fake_bracket() {
        let g = xml().unwrap();
        assert_eq!(highlight_with(&g, "<a"), "<span class=\"tag\">&lt;a</span>");
        assert_eq!(
            highlight_with(&g, "<a b=\"c"),
            "<span class=\"tag\">&lt;a b=<span class=\"literal\">\"c</span></span>"
        );
        assert_eq!(highlight_with(&g, "<"), "<span class=\"tag\">&lt;</span>");
    }
}
