// src/highlight/tables/states.rs
use serde::{Deserialize, Serialize};

/// Scanner states shared by every grammar. A grammar only wires up the
/// subset it needs; the rest stay unreachable in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum State {
    Normal,

    // quoted literals
    DoubleQuoteLiteral,
    DoubleQuoteEscape,
    SingleQuoteLiteral,
    SingleQuoteEscape,
    BacktickLiteral,
    BacktickEscape,

    // comments and the lookahead states that lead into them
    SlashSeen,
    DashSeen,
    ParenSeen,
    BlockCommentBody,
    BlockCommentEnd,
    LineComment,
    LineCommentEscape,
    BraceComment,

    // markup
    XmlTagStart,
    XmlTag,
    XmlProcessingInstruction,
    HtmlEntity,

    // scheme
    SchemeHash,
    SchemeCharLiteral,
    SchemeCharBody,
    SchemeSymbol,
}

impl State {
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    /// States that hold characters back while waiting to see whether a
    /// multi-character opener follows.
    pub fn is_lookahead(self) -> bool {
        matches!(
            self,
            State::SlashSeen | State::DashSeen | State::ParenSeen | State::SchemeHash
        )
    }
}

pub const N_STATES: usize = 23;

pub const ALL_STATES: [State; N_STATES] = [
    State::Normal,
    State::DoubleQuoteLiteral,
    State::DoubleQuoteEscape,
    State::SingleQuoteLiteral,
    State::SingleQuoteEscape,
    State::BacktickLiteral,
    State::BacktickEscape,
    State::SlashSeen,
    State::DashSeen,
    State::ParenSeen,
    State::BlockCommentBody,
    State::BlockCommentEnd,
    State::LineComment,
    State::LineCommentEscape,
    State::BraceComment,
    State::XmlTagStart,
    State::XmlTag,
    State::XmlProcessingInstruction,
    State::HtmlEntity,
    State::SchemeHash,
    State::SchemeCharLiteral,
    State::SchemeCharBody,
    State::SchemeSymbol,
];
