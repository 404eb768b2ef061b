// src/dev/markup.rs
// Undo what the highlighter added, to compare against the input.

const OPEN_PREFIX: &str = "<span class=\"";
const CLOSE: &str = "</span>";

/// Remove every `<span class="...">` and `</span>` tag.
///
/// Only sound for inputs that do not contain such tags themselves; the
/// generator never produces them.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(CLOSE) {
            rest = after;
        } else if let Some(skip) = open_tag_len(tail) {
            rest = &tail[skip..];
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn open_tag_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix(OPEN_PREFIX)?;
    let end = body.find("\">")?;
    let class = &body[..end];
    (!class.is_empty() && class.bytes().all(|b| b.is_ascii_lowercase() || b == b'-'))
        .then_some(OPEN_PREFIX.len() + end + 2)
}

/// Reverse of the `&`, `<`, `>` escaping done by the markup grammar.
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

/// The text a highlighted `html` was produced from.
pub fn recover_source(html: &str, language: &str) -> String {
    let text = strip_markup(html);
    if language.eq_ignore_ascii_case("XML") {
        unescape_html(&text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_spans_only() {
        assert_eq!(
            strip_markup("a <span class=\"keyword\">int</span> < b</span"),
            "a int < b</span"
        );
        assert_eq!(strip_markup("<span class=\"\">x"), "<span class=\"\">x");
    }

    #[test]
    fn xml_round_trip_of_escapes() {
        assert_eq!(unescape_html("&amp;lt; &lt;a&gt;"), "&lt; <a>");
        assert_eq!(
            recover_source("<span class=\"tag\">&lt;a&gt;</span>", "xml"),
            "<a>"
        );
        assert_eq!(recover_source("&lt;", "C"), "&lt;");
    }
}
