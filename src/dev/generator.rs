// src/dev/generator.rs
// Random source text with the surface syntax of a given language: its
// comments, quotes and keywords mixed with identifiers, numbers and
// operators. Used by fuzz_highlight, perf_one and the integration tests.
//
// Nothing generated spells out a `<span class="...">` or `</span>` tag (no
// `n` in free-form words), so markup can be stripped back off unambiguously.

use rand::Rng;

use crate::highlight::registry;

struct Flavor {
    line_comments: &'static [&'static str],
    block_comments: &'static [(&'static str, &'static str)],
    quotes: &'static [char],
    extras: &'static [&'static str],
}

const OPS: &[&str] = &[
    "(", ")", "+", "-", "*", "/", "=", "==", "!", "[", "]", "{", "}", "<", "<=", ">", ">=", "&",
    "&&", "|", ";", ",", ".", ":", "#", "$", "@", "%", "?", "\\", "'", "\"", "`",
];

const WIDE: &[char] = &['é', 'λ', '→', 'ß', '中', '\u{1F600}', '\u{a0}'];

fn flavor(language: &str) -> Flavor {
    const NONE: &[&str] = &[];
    match language.to_ascii_lowercase().as_str() {
        "c89" => Flavor {
            line_comments: NONE,
            block_comments: &[("/*", "*/")],
            quotes: &['"', '\''],
            extras: &["#define", "//", "/'", "\\\n"],
        },
        "c" | "c++" | "java" | "c#" => Flavor {
            line_comments: &["//"],
            block_comments: &[("/*", "*/")],
            quotes: &['"', '\''],
            extras: &["#include", "/\"", "\\\n", "'\\''"],
        },
        "php" => Flavor {
            line_comments: &["//", "#"],
            block_comments: &[("/*", "*/")],
            quotes: &['"', '\'', '`'],
            extras: &["$this", "<?php", "\\\""],
        },
        "perl" | "ruby" | "python" => Flavor {
            line_comments: &["#"],
            block_comments: &[],
            quotes: &['"', '\'', '`'],
            extras: &["$x", "@y", "%h", "\\'"],
        },
        "pascal" => Flavor {
            line_comments: &["//"],
            block_comments: &[("{", "}"), ("(*", "*)")],
            quotes: &['\''],
            extras: &["''", "(x)", "(**)", ":="],
        },
        "sql" => Flavor {
            line_comments: &["--"],
            block_comments: &[("/*", "*/")],
            quotes: &['\'', '"'],
            extras: &["''", "-'", "- -", "\\'"],
        },
        "xml" => Flavor {
            line_comments: &[],
            block_comments: &[("<", ">"), ("<?", "?>"), ("&", ";"), ("</", ">")],
            quotes: &['"', '\''],
            extras: &["&amp;", "&lt;", "<a b=\"c\">", "& ", "&x<"],
        },
        "scheme" => Flavor {
            line_comments: &[";"],
            block_comments: &[("#|", "|#")],
            quotes: &['"'],
            extras: &["#\\a", "#\\", "#t", "'sym", "'x\"", "call/cc", "set!"],
        },
        _ => Flavor {
            line_comments: &["//", "#", "--", ";"],
            block_comments: &[("/*", "*/"), ("<", ">")],
            quotes: &['"', '\''],
            extras: &["&amp;", "<b>"],
        },
    }
}

/// Keywords of `language`, sorted so generation does not depend on hash
/// iteration order.
fn keywords(language: &str) -> Vec<String> {
    let mut words: Vec<String> = registry()
        .by_name(language)
        .map(|g| {
            g.keywords()
                .sets()
                .iter()
                .flat_map(|s| s.words.iter().cloned())
                .collect()
        })
        .unwrap_or_default();
    words.sort_unstable();
    words.dedup();
    words
}

/// At least `target_len` bytes of `language`-flavoured text. Constructs are
/// left unterminated now and then, including at the very end.
pub fn gen_source<R: Rng>(rng: &mut R, language: &str, target_len: usize) -> String {
    let fl = flavor(language);
    let words = keywords(language);
    let mut out = String::with_capacity(target_len + 64);

    while out.len() < target_len {
        match rng.random_range(0u32..100) {
            0..=19 => push_ident(rng, &mut out),
            20..=31 => match pick(rng, &words) {
                Some(w) => push_cased(rng, &mut out, w),
                None => push_ident(rng, &mut out),
            },
            32..=39 => push_int(rng, &mut out),
            40..=54 => push_ws(rng, &mut out),
            55..=61 => {
                if let Some(open) = pick(rng, fl.line_comments) {
                    out.push_str(open);
                    push_text(rng, &mut out, 0..=30);
                    if rng.random_bool(0.9) {
                        out.push('\n');
                    }
                }
            }
            62..=68 => {
                if let Some((open, close)) = pick(rng, fl.block_comments) {
                    out.push_str(open);
                    push_text(rng, &mut out, 0..=40);
                    if rng.random_bool(0.9) {
                        out.push_str(close);
                    }
                }
            }
            69..=78 => {
                if let Some(&q) = pick(rng, fl.quotes) {
                    out.push(q);
                    push_text(rng, &mut out, 0..=20);
                    if rng.random_bool(0.9) {
                        out.push(q);
                    }
                }
            }
            79..=84 => {
                if let Some(e) = pick(rng, fl.extras) {
                    out.push_str(e);
                }
            }
            85..=87 => out.push(WIDE[rng.random_range(0..WIDE.len())]),
            _ => {
                out.push_str(OPS[rng.random_range(0..OPS.len())]);
                if rng.random_bool(0.25) {
                    out.push(' ');
                }
            }
        }
    }
    out
}

fn pick<'a, R: Rng, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.random_range(0..items.len())])
    }
}

fn push_cased<R: Rng>(rng: &mut R, out: &mut String, word: &str) {
    if rng.random_bool(0.2) {
        out.push_str(&word.to_ascii_uppercase());
    } else {
        out.push_str(word);
    }
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    const FIRST: &[u8] = b"abcdefghijklmopqrstuvwxyzABCDEFGHIJKLMOPQRSTUVWXYZ_";
    const REST: &[u8] = b"abcdefghijklmopqrstuvwxyz0123456789_";
    let len = rng.random_range(1..=10);
    out.push(FIRST[rng.random_range(0..FIRST.len())] as char);
    for _ in 1..len {
        out.push(REST[rng.random_range(0..REST.len())] as char);
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=6);
    for _ in 0..len {
        out.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    const WS: [char; 4] = [' ', '\t', '\r', '\n'];
    let len = rng.random_range(1..=4);
    for _ in 0..len {
        out.push(WS[rng.random_range(0..WS.len())]);
    }
}

/// Comment/literal body: anything printable except `n`, including escapes
/// and the delimiters of other constructs.
fn push_text<R: Rng>(rng: &mut R, out: &mut String, len: std::ops::RangeInclusive<usize>) {
    const BODY: &[u8] =
        b"abcdefghijklmopqrstuvwxyz0123456789 \t+-*/\\&|!#;{}()<>=\"'`$@%?:.,";
    let len = rng.random_range(len);
    for _ in 0..len {
        if rng.random_bool(0.03) {
            out.push(WIDE[rng.random_range(0..WIDE.len())]);
        } else {
            out.push(BODY[rng.random_range(0..BODY.len())] as char);
        }
    }
}
