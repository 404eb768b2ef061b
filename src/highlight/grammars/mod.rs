// src/highlight/grammars/mod.rs
//! Built-in grammars and the registry that resolves names and file
//! extensions to them.

mod c_family;
mod common;
mod pascal;
mod scheme;
mod script;
mod sql;
pub mod words;
mod xml;

use std::{fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::Serialize;

pub use c_family::{c89, c99, cpp, csharp, java, php};
pub use pascal::pascal;
pub use scheme::scheme;
pub use script::{perl, python, ruby};
pub use sql::sql;
pub use xml::xml;

use super::{
    engine::highlight_with,
    tables::{Grammar, load_grammar_json_bytes},
};

pub const PLAIN_TEXT: &str = "Plain Text";

fn plain_text() -> Result<Grammar> {
    Grammar::derive_from(&Grammar::passthrough(), PLAIN_TEXT).build()
}

type Ctor = fn() -> Result<Grammar>;

const BUILTINS: &[(Ctor, &[&str])] = &[
    (c89, &[]),
    (c99, &["c", "h"]),
    (cpp, &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
    (php, &["php", "php3", "php4", "php5", "phtml"]),
    (perl, &["pl", "pm", "t"]),
    (java, &["java"]),
    (csharp, &["cs"]),
    (ruby, &["rb", "rake"]),
    (python, &["py", "pyw"]),
    (pascal, &["pas", "pp", "dpr"]),
    (sql, &["sql", "ddl"]),
    (xml, &["xml", "html", "htm", "xhtml", "xsl", "svg"]),
    (scheme, &["scm", "ss", "sld", "rkt"]),
    (plain_text, &["txt", "text"]),
];

/// Summary of one registered grammar, as printed by `synhl --list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarInfo {
    pub name: String,
    pub extensions: Vec<String>,
    pub case_insensitive: bool,
    pub states: usize,
    pub keywords: usize,
}

struct Entry {
    grammar: Grammar,
    extensions: Vec<String>,
}

/// Name and extension lookup over a fixed set of grammars. Both keys are
/// matched case-insensitively.
#[derive(Default)]
pub struct GrammarRegistry {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    by_extension: HashMap<String, usize>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in grammar. One that fails validation is logged and left
    /// out, so its name falls back to pass-through.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for &(ctor, exts) in BUILTINS {
            match ctor() {
                Ok(g) => reg.register(g, exts),
                Err(e) => log::error!("skipping built-in grammar: {e:#}"),
            }
        }
        reg
    }

    /// Add `grammar`, replacing any grammar of the same name. A replacement
    /// keeps the old extensions unless new ones are given.
    pub fn register<S: AsRef<str>>(&mut self, grammar: Grammar, extensions: &[S]) {
        let key = grammar.name().to_lowercase();
        let mut exts: Vec<String> = extensions
            .iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();

        let idx = match self.by_name.get(&key) {
            Some(&i) => {
                let old = std::mem::take(&mut self.entries[i].extensions);
                if exts.is_empty() {
                    exts = old;
                } else {
                    for e in old {
                        if self.by_extension.get(&e) == Some(&i) {
                            self.by_extension.remove(&e);
                        }
                    }
                }
                self.entries[i].grammar = grammar;
                i
            }
            None => {
                self.entries.push(Entry {
                    grammar,
                    extensions: Vec::new(),
                });
                self.by_name.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        for e in &exts {
            // Last registration wins an extension.
            if let Some(prev) = self.by_extension.insert(e.clone(), idx) {
                if prev != idx {
                    self.entries[prev].extensions.retain(|x| x != e);
                }
            }
        }
        self.entries[idx].extensions = exts;
    }

    pub fn by_name(&self, name: &str) -> Option<&Grammar> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.entries[i].grammar)
    }

    /// `"rs"`, `".rs"` and `"RS"` are the same extension.
    pub fn for_extension(&self, ext: &str) -> Option<&Grammar> {
        self.by_extension
            .get(&normalize_extension(ext))
            .map(|&i| &self.entries[i].grammar)
    }

    pub fn for_path(&self, path: &Path) -> Option<&Grammar> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.for_extension(e))
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.grammar.name()).collect()
    }

    pub fn catalog(&self) -> Vec<GrammarInfo> {
        self.entries
            .iter()
            .map(|e| GrammarInfo {
                name: e.grammar.name().to_owned(),
                extensions: e.extensions.clone(),
                case_insensitive: e.grammar.keywords().case_insensitive(),
                states: e.grammar.reachable_states().len(),
                keywords: e.grammar.keywords().word_count(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register every `*.json` grammar in `dir`, in file name order. Files
    /// that fail to load are logged and skipped; returns how many loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("reading grammar directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let grammar = fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))
                .and_then(|bytes| load_grammar_json_bytes(&bytes));
            match grammar {
                Ok(g) => {
                    log::debug!("loaded grammar {} from {}", g.name(), path.display());
                    self.register(g, &[] as &[&str]);
                    loaded += 1;
                }
                Err(e) => log::warn!("skipping {}: {e:#}", path.display()),
            }
        }
        log::info!("loaded {loaded} grammar(s) from {}", dir.display());
        Ok(loaded)
    }

    /// Highlight `text` as `language`. `Plain Text` and unknown names return
    /// the text unchanged.
    pub fn highlight(&self, text: &str, language: &str) -> String {
        if language.eq_ignore_ascii_case(PLAIN_TEXT) {
            return text.to_owned();
        }
        match self.by_name(language) {
            Some(g) => highlight_with(g, text),
            None => {
                log::debug!("no grammar named {language:?}; passing text through");
                text.to_owned()
            }
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

static REGISTRY: OnceLock<GrammarRegistry> = OnceLock::new();

/// The process-wide registry of built-in grammars, built on first use.
pub fn registry() -> &'static GrammarRegistry {
    REGISTRY.get_or_init(|| {
        let reg = GrammarRegistry::builtin();
        log::debug!("grammar registry ready: {}", reg.names().join(", "));
        reg
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::tables::save_grammar_json;

    #[test]
    fn every_builtin_validates() {
        for (ctor, _) in BUILTINS {
            ctor().unwrap();
        }
        assert_eq!(
            registry().names(),
            vec![
                "C89", "C", "C++", "PHP", "Perl", "Java", "C#", "Ruby", "Python", "Pascal", "SQL",
                "XML", "Scheme", "Plain Text"
            ]
        );
    }

    #[test]
    fn lookups_ignore_case() {
        let r = registry();
        assert_eq!(r.by_name("sql").map(Grammar::name), Some("SQL"));
        assert_eq!(r.by_name("c#").map(Grammar::name), Some("C#"));
        assert_eq!(r.for_extension(".HPP").map(Grammar::name), Some("C++"));
        assert_eq!(r.for_path(Path::new("a/b.scm")).map(Grammar::name), Some("Scheme"));
        assert!(r.by_name("Cobol").is_none());
        assert!(r.for_path(Path::new("Makefile")).is_none());
    }

    #[test]
    fn unknown_and_plain_text_pass_through() {
        let r = registry();
        let text = "int <b> & /* x";
        assert_eq!(r.highlight(text, "Plain Text"), text);
        assert_eq!(r.highlight(text, "plain text"), text);
        assert_eq!(r.highlight(text, "Brainfuck"), text);
        assert_ne!(r.highlight(text, "C"), text);
    }

    #[test]
    fn catalog_reports_extensions_and_case() {
        let cat = registry().catalog();
        let sql = cat.iter().find(|i| i.name == "SQL").unwrap();
        assert!(sql.case_insensitive);
        assert_eq!(sql.extensions, vec!["sql", "ddl"]);
        assert!(sql.keywords > 100);
        let c89 = cat.iter().find(|i| i.name == "C89").unwrap();
        assert!(c89.extensions.is_empty());
        assert!(!c89.case_insensitive);
    }

    #[test]
    fn register_replaces_by_name() {
        let mut r = GrammarRegistry::builtin();
        let n = r.len();
        let custom = Grammar::derive_from(&sql().unwrap(), "sql")
            .clear_keywords()
            .build()
            .unwrap();
        r.register(custom, &[] as &[&str]);
        assert_eq!(r.len(), n);
        assert_eq!(r.highlight("select 1", "SQL"), "select 1");
        assert_eq!(r.for_extension("sql").map(Grammar::name), Some("sql"));

        r.register(Grammar::passthrough(), &["SQL"]);
        assert_eq!(r.len(), n + 1);
        assert_eq!(r.for_extension("sql").map(Grammar::name), Some("passthrough"));
        let info = r.catalog();
        let sql = info.iter().find(|i| i.name == "sql").unwrap();
        assert_eq!(sql.extensions, vec!["ddl"]);
    }

    #[test]
    fn load_dir_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!("synhl-load-dir-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let g = Grammar::derive_from(&c99().unwrap(), "C")
            .with_keywords("keyword", &["widget"])
            .build()
            .unwrap();
        save_grammar_json(&dir.join("c.json"), &g).unwrap();
        fs::write(dir.join("broken.json"), b"{ not json").unwrap();
        fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let mut r = GrammarRegistry::builtin();
        assert_eq!(r.load_dir(&dir).unwrap(), 1);
        assert_eq!(
            r.highlight("widget", "C"),
            "<span class=\"keyword\">widget</span>"
        );
        assert_eq!(r.for_extension("h").map(Grammar::name), Some("C"));
        fs::remove_dir_all(&dir).unwrap();

        assert!(r.load_dir(&dir).is_err());
    }
}
