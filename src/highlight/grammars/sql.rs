// src/highlight/grammars/sql.rs
use anyhow::Result;

use super::{
    c_family::c89,
    common::*,
    words::{SQL_KEYWORDS, SQL_TYPES},
};
use crate::highlight::tables::{Grammar, State::*};

/// SQL: C89 quoting and block comments, plus `--` comments. Quotes are
/// doubled rather than backslash-escaped and may span lines.
pub fn sql() -> Result<Grammar> {
    let b = Grammar::derive_from(&c89()?, "SQL")
        .clear_keywords()
        .with_transition(SingleQuoteLiteral, b"\\\n", SingleQuoteLiteral)
        .with_transition(DoubleQuoteLiteral, b"\\\n", DoubleQuoteLiteral);
    let b = lookahead(b, b'-', DashSeen);
    let b = lookahead_into(b, DashSeen, b'-', LineComment, "comment", "--");
    line_comment_body(b)
        .reopen_after(SlashSeen, "/")
        .reopen_after(DashSeen, "-")
        .case_insensitive(true)
        .with_keywords("keyword", SQL_KEYWORDS)
        .with_keywords("keyword", SQL_TYPES)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::engine::highlight_with;

    #[test]
    fn minus_is_not_a_comment() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "SELECT a-1, b - -2"),
            "<span class=\"keyword\">SELECT</span> a-1, b - -2"
        );
    }

    #[test]
    fn backslash_does_not_escape() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "'C:\\' AS p"),
            "<span class=\"literal\">'C:\\'</span> <span class=\"keyword\">AS</span> p"
        );
    }

    #[test]
    fn minus_before_quote() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "-'x'"),
            "-<span class=\"literal\">'x'</span>"
        );
    }

    #[test]
    fn minus_before_block_comment() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "1-/* c */2"),
            "1-<span class=\"comment\">/* c */</span>2"
        );
    }

    #[test]
    fn slash_before_line_comment() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "10/-- c\n2"),
            "10/<span class=\"comment\">-- c</span>\n2"
        );
        assert_eq!(highlight_with(&g, "a/-b"), "a/-b");
    }

    #[test]
    fn derived_grammar_can_turn_case_folding_off() {
        let g = Grammar::derive_from(&sql().unwrap(), "Strict SQL")
            .case_insensitive(false)
            .build()
            .unwrap();
        assert_eq!(
            highlight_with(&g, "SELECT select"),
            "<span class=\"keyword\">SELECT</span> select"
        );
    }

    #[test]
    fn block_comment_spans_lines() {
        let g = sql().unwrap();
        assert_eq!(
            highlight_with(&g, "/* a\n b */ drop"),
            "<span class=\"comment\">/* a\n b */</span> <span class=\"keyword\">drop</span>"
        );
    }
}
