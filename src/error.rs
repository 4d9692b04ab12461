//! Errors raised by the text analytics engine.
//!
//! The engine prefers degenerate-but-defined outputs (empty summaries, empty
//! term lists, zero similarity) over failures. The variants here cover the
//! remaining caller mistakes: a corpus too small to compare, and an output
//! format nobody knows how to render.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The corpus handed to the vectorizer violates its preconditions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A graph output format selector that is neither `mermaid` nor `dot`.
    #[error("unknown graph format '{0}' (expected 'mermaid' or 'dot')")]
    UnknownFormat(String),
}
