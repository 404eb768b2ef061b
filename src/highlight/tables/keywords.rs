// src/highlight/tables/keywords.rs
use hashbrown::HashSet;

/// One named group of words sharing a markup class. `words` keeps the
/// spelling they were added with; lookups go through `keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    pub class: String,
    pub words: HashSet<String>,
    keys: HashSet<String>,
}

impl KeywordSet {
    fn rekey(&mut self, case_insensitive: bool) {
        self.keys = self
            .words
            .iter()
            .map(|w| lookup_key(w, case_insensitive))
            .collect();
    }
}

fn lookup_key(word: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        word.to_lowercase()
    } else {
        word.to_owned()
    }
}

/// Word-boundary keyword substitution for text in a grammar's default state.
///
/// Text is split into maximal identifier runs; each run is checked against the
/// sets in declaration order and the first set that knows it decides the
/// class. Runs never overlap, so a word can only be wrapped once and never as
/// part of a longer identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordOverlay {
    sets: Vec<KeywordSet>,
    case_insensitive: bool,
    extra_ident_chars: String,
}

impl KeywordOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self) -> &[KeywordSet] {
        &self.sets
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn extra_ident_chars(&self) -> &str {
        &self.extra_ident_chars
    }

    pub fn word_count(&self) -> usize {
        self.sets.iter().map(|s| s.words.len()).sum()
    }

    pub(crate) fn set_case_insensitive(&mut self, on: bool) {
        if on == self.case_insensitive {
            return;
        }
        self.case_insensitive = on;
        for set in &mut self.sets {
            set.rekey(on);
        }
    }

    pub(crate) fn clear_sets(&mut self) {
        self.sets.clear();
    }

    pub(crate) fn set_extra_ident_chars(&mut self, chars: &str) {
        self.extra_ident_chars = chars.to_owned();
    }

    /// Append words to the set named `class`, creating it at the end of the
    /// list if it does not exist yet.
    pub(crate) fn add_words<S: AsRef<str>>(&mut self, class: &str, words: &[S]) {
        let ci = self.case_insensitive;
        let idx = match self.sets.iter().position(|s| s.class == class) {
            Some(i) => i,
            None => {
                self.sets.push(KeywordSet {
                    class: class.to_owned(),
                    words: HashSet::new(),
                    keys: HashSet::new(),
                });
                self.sets.len() - 1
            }
        };
        let set = &mut self.sets[idx];
        for w in words {
            let w = w.as_ref();
            set.keys.insert(lookup_key(w, ci));
            set.words.insert(w.to_owned());
        }
    }

    #[inline]
    pub fn is_ident_char(&self, c: char) -> bool {
        c.is_alphanumeric() || c == '_' || self.extra_ident_chars.contains(c)
    }

    /// Class of the first set containing `word`, if any.
    pub fn classify(&self, word: &str) -> Option<&str> {
        if self.case_insensitive {
            let key = word.to_lowercase();
            self.sets
                .iter()
                .find(|s| s.keys.contains(key.as_str()))
                .map(|s| s.class.as_str())
        } else {
            self.sets
                .iter()
                .find(|s| s.keys.contains(word))
                .map(|s| s.class.as_str())
        }
    }

    /// Write `text` to `out`, wrapping every recognized word.
    pub fn apply(&self, text: &str, out: &mut String) {
        if self.sets.is_empty() {
            out.push_str(text);
            return;
        }

        let mut word_start: Option<usize> = None;
        for (i, c) in text.char_indices() {
            if self.is_ident_char(c) {
                word_start.get_or_insert(i);
                continue;
            }
            if let Some(start) = word_start.take() {
                self.push_word(&text[start..i], out);
            }
            out.push(c);
        }
        if let Some(start) = word_start {
            self.push_word(&text[start..], out);
        }
    }

    fn push_word(&self, word: &str, out: &mut String) {
        match self.classify(word) {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(word);
                out.push_str("</span>");
            }
            None => out.push_str(word),
        }
    }
}
