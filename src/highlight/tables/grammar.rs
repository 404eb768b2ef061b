// src/highlight/tables/grammar.rs
use anyhow::{Result, anyhow};
use hashbrown::HashMap;

use super::{
    keywords::KeywordOverlay,
    processor::Processor,
    states::{ALL_STATES, N_STATES, State},
};

/// Explicit transitions are keyed by ASCII byte; everything else (including
/// every non-ASCII character) goes through the per-state wildcard slot.
pub const ASCII: usize = 128;

static RAW: Processor = Processor::Raw;

/// `[state][byte] -> state`, plus one wildcard per state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    explicit: [[Option<State>; ASCII]; N_STATES],
    wildcard: [Option<State>; N_STATES],
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self {
            explicit: [[None; ASCII]; N_STATES],
            wildcard: [None; N_STATES],
        }
    }
}

impl TransitionTable {
    /// Every state loops on itself for every character.
    pub fn identity() -> Self {
        let mut t = Self::default();
        for s in ALL_STATES {
            t.wildcard[s.idx()] = Some(s);
        }
        t
    }

    #[inline]
    pub fn next(&self, from: State, c: char) -> Option<State> {
        if c.is_ascii() {
            if let Some(to) = self.explicit[from.idx()][c as usize] {
                return Some(to);
            }
        }
        self.wildcard[from.idx()]
    }

    pub fn explicit(&self, from: State, byte: u8) -> Option<State> {
        self.explicit
            .get(from.idx())
            .and_then(|row| row.get(byte as usize))
            .copied()
            .flatten()
    }

    pub fn wildcard(&self, from: State) -> Option<State> {
        self.wildcard[from.idx()]
    }

    fn set(&mut self, from: State, byte: u8, to: State) {
        self.explicit[from.idx()][byte as usize] = Some(to);
    }

    fn set_wildcard(&mut self, from: State, to: State) {
        self.wildcard[from.idx()] = Some(to);
    }

    /// States reachable from `start` through any explicit or wildcard edge.
    pub fn reachable_from(&self, start: State) -> Vec<State> {
        let mut seen = [false; N_STATES];
        let mut stack = vec![start];
        let mut out = Vec::new();
        seen[start.idx()] = true;
        while let Some(s) = stack.pop() {
            out.push(s);
            let row = &self.explicit[s.idx()];
            for to in row.iter().flatten().chain(self.wildcard[s.idx()].iter()) {
                if !seen[to.idx()] {
                    seen[to.idx()] = true;
                    stack.push(*to);
                }
            }
        }
        out.sort();
        out
    }
}

/// A complete, immutable per-language configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    name: String,
    initial: State,
    transitions: TransitionTable,
    processors: HashMap<(State, State), Processor>,
    from_processors: HashMap<State, Processor>,
    default_processor: Processor,
    edges: HashMap<(State, State), String>,
    closures: HashMap<State, String>,
    keywords: KeywordOverlay,
}

impl Grammar {
    /// Start an empty grammar (initial state `Normal`, no transitions).
    pub fn builder(name: &str) -> GrammarBuilder {
        GrammarBuilder {
            grammar: Grammar {
                name: name.to_owned(),
                initial: State::Normal,
                transitions: TransitionTable::default(),
                processors: HashMap::new(),
                from_processors: HashMap::new(),
                default_processor: Processor::Keywords,
                edges: HashMap::new(),
                closures: HashMap::new(),
                keywords: KeywordOverlay::new(),
            },
            problems: Vec::new(),
        }
    }

    /// Start a new grammar from a deep copy of `base`.
    pub fn derive_from(base: &Grammar, name: &str) -> GrammarBuilder {
        let mut grammar = base.clone();
        grammar.name = name.to_owned();
        GrammarBuilder {
            grammar,
            problems: Vec::new(),
        }
    }

    /// Identity transitions and no keywords: output equals input.
    pub fn passthrough() -> Grammar {
        let mut g = Grammar::builder("passthrough").grammar;
        g.transitions = TransitionTable::identity();
        g.default_processor = Processor::Raw;
        g
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_state(&self) -> State {
        self.initial
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn keywords(&self) -> &KeywordOverlay {
        &self.keywords
    }

    pub fn default_processor(&self) -> &Processor {
        &self.default_processor
    }

    #[inline]
    pub fn next_state(&self, from: State, c: char) -> State {
        // Built grammars are total; stay put for unreachable states.
        self.transitions.next(from, c).unwrap_or(from)
    }

    /// `(from,to)`, then `(from,*)`, then the default for the initial state
    /// or `Raw` for any other state.
    pub fn processor_for(&self, from: State, to: State) -> &Processor {
        self.processors
            .get(&(from, to))
            .or_else(|| self.from_processors.get(&from))
            .unwrap_or(if from == self.initial {
                &self.default_processor
            } else {
                &RAW
            })
    }

    pub fn edge(&self, from: State, to: State) -> Option<&str> {
        self.edges.get(&(from, to)).map(String::as_str)
    }

    /// Markup closing a span left open when input ends in `state`.
    pub fn closure(&self, state: State) -> Option<&str> {
        self.closures
            .get(&state)
            .map(String::as_str)
            .or_else(|| self.edge(state, self.initial))
    }

    pub fn reachable_states(&self) -> Vec<State> {
        self.transitions.reachable_from(self.initial)
    }

    pub(crate) fn processors(&self) -> impl Iterator<Item = (&(State, State), &Processor)> {
        self.processors.iter()
    }

    pub(crate) fn from_processors(&self) -> impl Iterator<Item = (&State, &Processor)> {
        self.from_processors.iter()
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = (&(State, State), &String)> {
        self.edges.iter()
    }

    pub(crate) fn closures(&self) -> impl Iterator<Item = (&State, &String)> {
        self.closures.iter()
    }

    fn targets(&self, from: State) -> impl Iterator<Item = State> + '_ {
        (0..ASCII as u8)
            .filter_map(move |b| self.transitions.explicit(from, b))
            .chain(self.transitions.wildcard(from))
    }

    fn loops(&self, s: State) -> bool {
        self.targets(s).any(|t| t == s)
    }

    fn leaves_by_discard(&self, s: State) -> bool {
        self.targets(s)
            .any(|t| t != s && self.processor_for(s, t) == &Processor::Discard)
    }
}

/// Builds or derives a [`Grammar`]; `build` validates totality.
#[derive(Debug)]
pub struct GrammarBuilder {
    grammar: Grammar,
    problems: Vec<String>,
}

impl GrammarBuilder {
    pub fn initial(mut self, s: State) -> Self {
        self.grammar.initial = s;
        self
    }

    /// Route every byte in `bytes` from `from` to `to`.
    pub fn with_transition(mut self, from: State, bytes: &[u8], to: State) -> Self {
        for &b in bytes {
            if (b as usize) < ASCII {
                self.grammar.transitions.set(from, b, to);
            } else {
                self.problems.push(format!(
                    "non-ASCII transition key 0x{b:02X} on {from:?}; use the wildcard"
                ));
            }
        }
        self
    }

    /// Wildcard for `from`.
    pub fn with_default(mut self, from: State, to: State) -> Self {
        self.grammar.transitions.set_wildcard(from, to);
        self
    }

    pub fn with_processor(mut self, from: State, to: State, p: Processor) -> Self {
        self.grammar.processors.insert((from, to), p);
        self
    }

    /// Processor for every transition out of `from` without a specific entry.
    pub fn with_from_processor(mut self, from: State, p: Processor) -> Self {
        self.grammar.from_processors.insert(from, p);
        self
    }

    pub fn default_processor(mut self, p: Processor) -> Self {
        self.grammar.default_processor = p;
        self
    }

    pub fn with_edge(mut self, from: State, to: State, markup: impl Into<String>) -> Self {
        self.grammar.edges.insert((from, to), markup.into());
        self
    }

    /// Markup appended when input ends while still in `state`.
    pub fn with_closure(mut self, state: State, markup: impl Into<String>) -> Self {
        self.grammar.closures.insert(state, markup.into());
        self
    }

    pub fn with_keywords<S: AsRef<str>>(mut self, class: &str, words: &[S]) -> Self {
        self.grammar.keywords.add_words(class, words);
        self
    }

    /// Drop every inherited keyword set.
    pub fn clear_keywords(mut self) -> Self {
        self.grammar.keywords.clear_sets();
        self
    }

    pub fn case_insensitive(mut self, on: bool) -> Self {
        self.grammar.keywords.set_case_insensitive(on);
        self
    }

    /// Let the lookahead state `state`, entered from the initial state by
    /// holding `held`, give up on any byte that opens a construct from the
    /// initial state. The held text is emitted and the byte opens its
    /// construct with the same edge; a byte that re-enters `state` loops.
    ///
    /// Bytes `state` already routes are left alone, as are pairs that already
    /// carry a different processor or edge. Call it once the initial state's
    /// openers are in place.
    pub fn reopen_after(mut self, state: State, held: &str) -> Self {
        let g = &mut self.grammar;
        let from = g.initial;
        let putback = Processor::putback_trim(held);
        for b in 0..ASCII as u8 {
            let Some(to) = g.transitions.explicit(from, b) else {
                continue;
            };
            if to == from
                || g.transitions.explicit(state, b).is_some()
                || g.processor_for(from, to) != &Processor::TrimTrigger
            {
                continue;
            }
            if to == state {
                g.transitions.set(state, b, state);
                continue;
            }
            let edge = g.edges.get(&(from, to)).cloned();
            let clashes = g.processors.get(&(state, to)).is_some_and(|p| p != &putback)
                || g.edges.get(&(state, to)).is_some_and(|e| Some(e) != edge.as_ref());
            if clashes {
                continue;
            }
            g.transitions.set(state, b, to);
            g.processors.insert((state, to), putback.clone());
            if let Some(edge) = edge {
                g.edges.insert((state, to), edge);
            }
        }
        self
    }

    /// Characters besides alphanumerics and `_` that belong to identifiers.
    pub fn ident_chars(mut self, chars: &str) -> Self {
        self.grammar.keywords.set_extra_ident_chars(chars);
        self
    }

    pub fn build(self) -> Result<Grammar> {
        let GrammarBuilder { grammar, problems } = self;
        if let Some(p) = problems.first() {
            return Err(anyhow!("grammar {}: {p}", grammar.name));
        }
        for s in grammar.reachable_states() {
            if grammar.transitions.wildcard(s).is_none() {
                return Err(anyhow!(
                    "grammar {}: state {s:?} is reachable from {:?} but has no wildcard transition",
                    grammar.name,
                    grammar.initial
                ));
            }
            // A loop piles held characters into the segment; Discard would drop them.
            if s.is_lookahead() && grammar.loops(s) && grammar.leaves_by_discard(s) {
                return Err(anyhow!(
                    "grammar {}: lookahead state {s:?} loops on itself but leaves through Discard",
                    grammar.name
                ));
            }
        }
        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Grammar {
        Grammar::builder("base")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, b"\"", State::DoubleQuoteLiteral)
            .with_default(State::DoubleQuoteLiteral, State::DoubleQuoteLiteral)
            .with_transition(State::DoubleQuoteLiteral, b"\"", State::Normal)
            .with_edge(State::DoubleQuoteLiteral, State::Normal, "</span>")
            .with_keywords("keyword", &["if"])
            .build()
            .unwrap()
    }

    #[test]
    fn missing_wildcard_is_rejected() {
        let err = Grammar::builder("broken")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, b"/", State::SlashSeen)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("SlashSeen"), "{err}");
    }

    #[test]
    fn unreachable_states_need_no_wildcard() {
        let g = Grammar::builder("tiny")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::LineComment, b"\n", State::Normal)
            .build()
            .unwrap();
        assert_eq!(g.reachable_states(), vec![State::Normal]);
    }

    fn slash_loop() -> GrammarBuilder {
        Grammar::builder("loop")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, b"/", State::SlashSeen)
            .with_default(State::SlashSeen, State::Normal)
            .with_transition(State::SlashSeen, b"/", State::SlashSeen)
            .with_transition(State::SlashSeen, b"*", State::BlockCommentBody)
            .with_default(State::BlockCommentBody, State::BlockCommentBody)
    }

    #[test]
    fn looping_lookahead_cannot_discard() {
        let err = slash_loop()
            .with_processor(State::SlashSeen, State::BlockCommentBody, Processor::Discard)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("loops"), "{err}");

        assert!(
            slash_loop()
                .with_processor(State::SlashSeen, State::BlockCommentBody, Processor::DropTrigger)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn reopen_copies_openers_into_lookahead() {
        let g = Grammar::builder("reopen")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, b"/", State::SlashSeen)
            .with_processor(State::Normal, State::SlashSeen, Processor::TrimTrigger)
            .with_default(State::SlashSeen, State::Normal)
            .with_transition(State::Normal, b"{", State::BraceComment)
            .with_processor(State::Normal, State::BraceComment, Processor::TrimTrigger)
            .with_edge(State::Normal, State::BraceComment, "<c>{")
            .with_default(State::BraceComment, State::BraceComment)
            .reopen_after(State::SlashSeen, "/")
            .build()
            .unwrap();
        let t = g.transitions();
        assert_eq!(t.explicit(State::SlashSeen, b'{'), Some(State::BraceComment));
        assert_eq!(t.explicit(State::SlashSeen, b'/'), Some(State::SlashSeen));
        assert_eq!(
            g.processor_for(State::SlashSeen, State::BraceComment),
            &Processor::putback_trim("/")
        );
        assert_eq!(g.edge(State::SlashSeen, State::BraceComment), Some("<c>{"));
    }

    #[test]
    fn non_ascii_keys_are_rejected() {
        let err = Grammar::builder("wide")
            .with_default(State::Normal, State::Normal)
            .with_transition(State::Normal, &[0xC3], State::LineComment)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("0xC3"), "{err}");
    }

    #[test]
    fn derivation_leaves_base_untouched() {
        let base = base();
        let derived = Grammar::derive_from(&base, "derived")
            .with_transition(State::DoubleQuoteLiteral, b"\n", State::Normal)
            .with_edge(State::DoubleQuoteLiteral, State::Normal, "</em>")
            .with_keywords("keyword", &["while"])
            .build()
            .unwrap();

        assert_eq!(base.transitions().explicit(State::DoubleQuoteLiteral, b'\n'), None);
        assert_eq!(
            derived.transitions().explicit(State::DoubleQuoteLiteral, b'\n'),
            Some(State::Normal)
        );
        assert_eq!(base.edge(State::DoubleQuoteLiteral, State::Normal), Some("</span>"));
        assert_eq!(derived.edge(State::DoubleQuoteLiteral, State::Normal), Some("</em>"));
        assert_eq!(base.keywords().classify("while"), None);
        assert_eq!(derived.keywords().classify("while"), Some("keyword"));
        assert_eq!(derived.keywords().classify("if"), Some("keyword"));
    }

    #[test]
    fn processor_lookup_order() {
        let g = Grammar::derive_from(&base(), "p")
            .with_from_processor(State::DoubleQuoteLiteral, Processor::Escape)
            .with_processor(State::Normal, State::DoubleQuoteLiteral, Processor::TrimTrigger)
            .build()
            .unwrap();
        assert_eq!(
            g.processor_for(State::Normal, State::DoubleQuoteLiteral),
            &Processor::TrimTrigger
        );
        assert_eq!(
            g.processor_for(State::DoubleQuoteLiteral, State::Normal),
            &Processor::Escape
        );
        assert_eq!(g.processor_for(State::Normal, State::LineComment), &Processor::Keywords);
        assert_eq!(g.processor_for(State::LineComment, State::Normal), &Processor::Raw);
    }

    #[test]
    fn closure_prefers_explicit_entry() {
        let g = Grammar::derive_from(&base(), "c")
            .with_closure(State::BlockCommentBody, "</span>")
            .build()
            .unwrap();
        assert_eq!(g.closure(State::BlockCommentBody), Some("</span>"));
        assert_eq!(g.closure(State::DoubleQuoteLiteral), Some("</span>"));
        assert_eq!(g.closure(State::LineComment), None);
    }
}
