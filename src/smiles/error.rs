use crate::model::types::Element;
use thiserror::Error;

/// Errors raised while reading a SMILES string.
///
/// Positions are zero-based character offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("SMILES string is empty")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },

    #[error("malformed bracket atom at position {pos}: {detail}")]
    BracketAtom { pos: usize, detail: String },

    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParenthesis { pos: usize },

    #[error("branch at position {pos} has no preceding atom")]
    BranchWithoutAtom { pos: usize },

    #[error("ring closure {label} is never closed")]
    UnclosedRing { label: u32 },

    #[error("ring closure {label} at position {pos} bonds an atom to itself or repeats a bond")]
    InvalidRingClosure { label: u32, pos: usize },

    #[error("ring closure {label} at position {pos} has conflicting bond orders")]
    RingBondConflict { label: u32, pos: usize },

    #[error("empty component at the '.' at position {pos}")]
    EmptyComponent { pos: usize },

    #[error("bond symbol at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },

    #[error("atom {index} ({element}) has explicit valence {valence}, above every allowed valence")]
    Valence {
        index: usize,
        element: Element,
        valence: u32,
    },

    #[error("atom {index} is marked aromatic but is not in a ring")]
    AromaticOutsideRing { index: usize },
}

impl ParseError {
    pub(crate) fn bracket(pos: usize, detail: impl Into<String>) -> Self {
        Self::BracketAtom {
            pos,
            detail: detail.into(),
        }
    }
}
