// src/highlight/grammars/c_family.rs
use anyhow::Result;

use super::{common::*, words::*};
use crate::highlight::tables::{
    Grammar, Processor,
    State::*,
    markup::{CLOSE, open_with},
};

/// C89: quoted literals and `/* */` comments.
pub fn c89() -> Result<Grammar> {
    let b = Grammar::builder("C89").with_default(Normal, Normal);
    let b = quoted(b, b'"', DoubleQuoteLiteral, Some(DoubleQuoteEscape));
    let b = quoted(b, b'\'', SingleQuoteLiteral, Some(SingleQuoteEscape));
    let b = lookahead(b, b'/', SlashSeen);
    let b = lookahead_into(b, SlashSeen, b'*', BlockCommentBody, "comment", "/*");
    block_comment_body(b, b'*', b'/')
        .reopen_after(SlashSeen, "/")
        // A newline ends a runaway literal.
        .with_transition(DoubleQuoteLiteral, b"\n", Normal)
        .with_transition(SingleQuoteLiteral, b"\n", Normal)
        .with_keywords("preprocessor", C_PREPROCESSOR)
        .with_keywords("keyword", C89_KEYWORDS)
        .build()
}

/// C99 adds `//` comments with backslash line continuation.
pub fn c99() -> Result<Grammar> {
    let base = c89()?;
    let b = Grammar::derive_from(&base, "C");
    let b = lookahead_into(b, SlashSeen, b'/', LineComment, "comment", "//");
    line_comment_body(b)
        .with_transition(LineComment, b"\\", LineCommentEscape)
        .with_default(LineCommentEscape, LineComment)
        .with_closure(LineCommentEscape, CLOSE)
        .with_keywords("keyword", C99_KEYWORDS)
        .build()
}

pub fn cpp() -> Result<Grammar> {
    Grammar::derive_from(&c99()?, "C++")
        .with_keywords("keyword", CPP_KEYWORDS)
        .build()
}

/// Java has no preprocessor; C99 tables without C's words.
pub fn java() -> Result<Grammar> {
    Grammar::derive_from(&c99()?, "Java")
        .clear_keywords()
        .with_keywords("keyword", JAVA_KEYWORDS)
        .build()
}

pub fn csharp() -> Result<Grammar> {
    Grammar::derive_from(&c99()?, "C#")
        .clear_keywords()
        .with_keywords("preprocessor", CSHARP_PREPROCESSOR)
        .with_keywords("keyword", CSHARP_KEYWORDS)
        .build()
}

/// PHP: C99 comments plus `#` comments, multi-line strings, backticks and
/// case-insensitive keywords.
pub fn php() -> Result<Grammar> {
    let b = Grammar::derive_from(&c99()?, "PHP")
        .clear_keywords()
        .with_transition(Normal, b"#", LineComment)
        .with_processor(Normal, LineComment, Processor::TrimTrigger)
        .with_edge(Normal, LineComment, open_with("comment", "#"))
        .with_transition(DoubleQuoteLiteral, b"\n", DoubleQuoteLiteral)
        .with_transition(SingleQuoteLiteral, b"\n", SingleQuoteLiteral);
    quoted(b, b'`', BacktickLiteral, Some(BacktickEscape))
        .reopen_after(SlashSeen, "/")
        .case_insensitive(true)
        .ident_chars("$")
        .with_keywords("keyword", PHP_KEYWORDS)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::engine::highlight_with;

    #[test]
    fn c89_has_no_line_comments() {
        let g = c89().unwrap();
        assert_eq!(highlight_with(&g, "a // b"), "a // b");
    }

    #[test]
    fn derived_grammars_do_not_leak_into_base() {
        let c89 = c89().unwrap();
        let c99 = c99().unwrap();
        assert_eq!(c89.transitions().explicit(SlashSeen, b'/'), Some(SlashSeen));
        assert_eq!(c99.transitions().explicit(SlashSeen, b'/'), Some(LineComment));
        assert_eq!(c89.keywords().classify("inline"), None);
        assert_eq!(c99.keywords().classify("inline"), Some("keyword"));
    }

    #[test]
    fn extra_slash_before_block_comment() {
        let g = c89().unwrap();
        assert_eq!(
            highlight_with(&g, "a//* c */"),
            "a/<span class=\"comment\">/* c */</span>"
        );
        assert_eq!(highlight_with(&g, "x///"), "x///");
        assert_eq!(
            highlight_with(&g, "x/\"a\""),
            "x/<span class=\"literal\">\"a\"</span>"
        );
    }

    #[test]
    fn php_slash_before_backtick() {
        let g = php().unwrap();
        assert_eq!(
            highlight_with(&g, "1/`ls`"),
            "1/<span class=\"literal\">`ls`</span>"
        );
    }

    #[test]
    fn java_has_no_preprocessor_class() {
        let g = java().unwrap();
        assert_eq!(g.keywords().classify("define"), None);
        assert_eq!(g.keywords().classify("extends"), Some("keyword"));
        assert_eq!(g.transitions().explicit(SlashSeen, b'/'), Some(LineComment));
    }

    #[test]
    fn php_strings_span_lines() {
        let g = php().unwrap();
        assert_eq!(
            highlight_with(&g, "echo \"a\nb\";"),
            "<span class=\"keyword\">echo</span> <span class=\"literal\">\"a\nb\"</span>;"
        );
        let c = c99().unwrap();
        assert_eq!(
            highlight_with(&c, "\"a\nb"),
            "<span class=\"literal\">\"a\n</span>b"
        );
    }
}
