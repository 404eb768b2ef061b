// src/highlight/tables/io.rs
use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{
    grammar::{ASCII, Grammar},
    processor::Processor,
    states::{ALL_STATES, State},
};

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct GrammarDisk {
    name: String,
    initial: State,
    /// Explicit edges grouped by `(from, to)`; `on` lists the trigger bytes.
    transitions: Vec<TransitionDisk>,
    wildcards: Vec<WildcardDisk>,
    #[serde(default)]
    processors: Vec<ProcessorDisk>,
    #[serde(default)]
    edges: Vec<EdgeDisk>,
    #[serde(default)]
    closures: Vec<ClosureDisk>,
    #[serde(default)]
    keywords: Vec<KeywordSetDisk>,
    #[serde(default)]
    case_insensitive: bool,
    #[serde(default)]
    ident_chars: String,
    default_processor: Processor,
}

#[derive(Serialize, Deserialize)]
struct TransitionDisk {
    from: State,
    on: String,
    to: State,
}

#[derive(Serialize, Deserialize)]
struct WildcardDisk {
    from: State,
    to: State,
}

#[derive(Serialize, Deserialize)]
struct ProcessorDisk {
    from: State,
    /// `None` registers the processor for every target of `from`.
    #[serde(default)]
    to: Option<State>,
    processor: Processor,
}

#[derive(Serialize, Deserialize)]
struct EdgeDisk {
    from: State,
    to: State,
    markup: String,
}

#[derive(Serialize, Deserialize)]
struct ClosureDisk {
    state: State,
    markup: String,
}

#[derive(Serialize, Deserialize)]
struct KeywordSetDisk {
    class: String,
    words: Vec<String>,
}

impl From<&Grammar> for GrammarDisk {
    fn from(g: &Grammar) -> Self {
        let table = g.transitions();

        let mut grouped: BTreeMap<(State, State), String> = BTreeMap::new();
        let mut wildcards = Vec::new();
        for from in ALL_STATES {
            for b in 0..ASCII as u8 {
                if let Some(to) = table.explicit(from, b) {
                    grouped.entry((from, to)).or_default().push(b as char);
                }
            }
            if let Some(to) = table.wildcard(from) {
                wildcards.push(WildcardDisk { from, to });
            }
        }
        let transitions = grouped
            .into_iter()
            .map(|((from, to), on)| TransitionDisk { from, on, to })
            .collect();

        // Sorted so dumps are stable across runs.
        let mut processors: Vec<ProcessorDisk> = g
            .processors()
            .map(|(&(from, to), p)| ProcessorDisk {
                from,
                to: Some(to),
                processor: p.clone(),
            })
            .chain(g.from_processors().map(|(&from, p)| ProcessorDisk {
                from,
                to: None,
                processor: p.clone(),
            }))
            .collect();
        processors.sort_by_key(|p| (p.from, p.to));

        let mut edges: Vec<EdgeDisk> = g
            .edges()
            .map(|(&(from, to), m)| EdgeDisk {
                from,
                to,
                markup: m.clone(),
            })
            .collect();
        edges.sort_by_key(|e| (e.from, e.to));

        let mut closures: Vec<ClosureDisk> = g
            .closures()
            .map(|(&state, m)| ClosureDisk {
                state,
                markup: m.clone(),
            })
            .collect();
        closures.sort_by_key(|c| c.state);

        let keywords = g
            .keywords()
            .sets()
            .iter()
            .map(|s| {
                let mut words: Vec<String> = s.words.iter().cloned().collect();
                words.sort();
                KeywordSetDisk {
                    class: s.class.clone(),
                    words,
                }
            })
            .collect();

        Self {
            name: g.name().to_owned(),
            initial: g.initial_state(),
            transitions,
            wildcards,
            processors,
            edges,
            closures,
            keywords,
            case_insensitive: g.keywords().case_insensitive(),
            ident_chars: g.keywords().extra_ident_chars().to_owned(),
            default_processor: g.default_processor().clone(),
        }
    }
}

impl GrammarDisk {
    fn into_grammar(self) -> Result<Grammar> {
        // Case flag first so words are keyed the right way as they arrive.
        let mut b = Grammar::builder(&self.name)
            .initial(self.initial)
            .case_insensitive(self.case_insensitive)
            .ident_chars(&self.ident_chars)
            .default_processor(self.default_processor);
        for t in &self.transitions {
            b = b.with_transition(t.from, t.on.as_bytes(), t.to);
        }
        for w in &self.wildcards {
            b = b.with_default(w.from, w.to);
        }
        for p in self.processors {
            b = match p.to {
                Some(to) => b.with_processor(p.from, to, p.processor),
                None => b.with_from_processor(p.from, p.processor),
            };
        }
        for e in self.edges {
            b = b.with_edge(e.from, e.to, e.markup);
        }
        for c in self.closures {
            b = b.with_closure(c.state, c.markup);
        }
        for k in &self.keywords {
            b = b.with_keywords(&k.class, &k.words);
        }
        b.build()
    }
}

pub fn grammar_to_json(g: &Grammar) -> Result<String> {
    serde_json::to_string_pretty(&GrammarDisk::from(g))
        .with_context(|| format!("serialize grammar {}", g.name()))
}

pub fn save_grammar_json(path: &Path, g: &Grammar) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let f = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &GrammarDisk::from(g))
        .with_context(|| format!("write grammar {} to {}", g.name(), path.display()))?;
    w.flush()?;
    Ok(())
}

/// Decode and validate a grammar; the result passes the same checks as a
/// built-in one.
pub fn load_grammar_json_bytes(data: &[u8]) -> Result<Grammar> {
    let disk: GrammarDisk =
        serde_json::from_slice(data).context("failed to parse grammar JSON")?;
    disk.into_grammar()
}
