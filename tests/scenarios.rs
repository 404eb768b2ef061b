//! End-to-end highlighting of small snippets through the public API.

use synhl::{highlight, highlight_bytes};

#[test]
fn c_keyword() {
    assert_eq!(
        highlight("int x = 1;", "C"),
        "<span class=\"keyword\">int</span> x = 1;"
    );
}

#[test]
fn sql_line_comment_then_keyword() {
    assert_eq!(
        highlight("-- comment\nSELECT 1;", "SQL"),
        "<span class=\"comment\">-- comment</span>\n<span class=\"keyword\">SELECT</span> 1;"
    );
}

#[test]
fn c_open_block_comment_is_closed() {
    assert_eq!(
        highlight("/* open", "C"),
        "<span class=\"comment\">/* open</span>"
    );
}

#[test]
fn xml_tag_and_attribute() {
    assert_eq!(
        highlight("<a href=\"x\">", "XML"),
        "<span class=\"tag\">&lt;a href=<span class=\"literal\">\"x\"</span>&gt;</span>"
    );
}

#[test]
fn sql_keywords_ignore_case() {
    assert_eq!(
        highlight("select 1", "SQL"),
        "<span class=\"keyword\">select</span> 1"
    );
    assert_eq!(
        highlight("SeLeCt 1", "sql"),
        "<span class=\"keyword\">SeLeCt</span> 1"
    );
}

#[test]
fn c_is_case_sensitive() {
    assert_eq!(highlight("INT x;", "C"), "INT x;");
}

#[test]
fn preprocessor_words_have_their_own_class() {
    assert_eq!(
        highlight("#include <stdio.h>", "C"),
        "#<span class=\"preprocessor\">include</span> <stdio.h>"
    );
}

#[test]
fn keywords_inside_strings_and_comments_are_left_alone() {
    assert_eq!(
        highlight("return \"if\"; /* while */", "C"),
        "<span class=\"keyword\">return</span> <span class=\"literal\">\"if\"</span>; \
         <span class=\"comment\">/* while */</span>"
    );
}

#[test]
fn division_is_not_a_comment() {
    assert_eq!(
        highlight("a/b/if", "C"),
        "a/b/<span class=\"keyword\">if</span>"
    );
    assert_eq!(
        highlight("x/\"s\"", "C"),
        "x/<span class=\"literal\">\"s\"</span>"
    );
}

#[test]
fn escaped_quote_stays_inside_literal() {
    assert_eq!(
        highlight(r#"s = "a\"b" + 'c';"#, "Java"),
        r#"s = <span class="literal">"a\"b"</span> + <span class="literal">'c'</span>;"#
    );
}

#[test]
fn php_hash_comment_and_variables() {
    assert_eq!(
        highlight("$this->x; # note\nECHO $if;", "PHP"),
        "<span class=\"keyword\">$this</span>->x; <span class=\"comment\"># note</span>\n\
         <span class=\"keyword\">ECHO</span> $if;"
    );
}

#[test]
fn plain_text_and_unknown_languages_pass_through() {
    let text = "int <b> & \"x\" /* y */ é";
    assert_eq!(highlight(text, "Plain Text"), text);
    assert_eq!(highlight(text, "PLAIN TEXT"), text);
    assert_eq!(highlight(text, "Fortran"), text);
    assert_eq!(highlight("", "C"), "");
}

#[test]
fn bytes_are_decoded_lossily() {
    assert_eq!(
        highlight_bytes(b"int \xff;", "C"),
        "<span class=\"keyword\">int</span> \u{FFFD};"
    );
}

#[test]
fn language_names_ignore_case() {
    assert_eq!(highlight("int", "c"), highlight("int", "C"));
    assert_eq!(highlight("def", "PYTHON"), "<span class=\"keyword\">def</span>");
}
