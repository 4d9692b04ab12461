//! Text analytics engine.
//!
//! Everything here is a pure function of its inputs: no I/O, no state kept
//! between calls beyond compiled regexes, stop-word sets and the lazily
//! loaded CJK segmenter.
//!
//! ```text
//! tokenize ──┬──────────────▶ summarize ◀── split_sentences
//!            └─▶ vectorize ─┬─▶ compare
//!                           └─▶ pairwise_similarity ─▶ graph::build_edges
//! ```

pub mod compare;
pub mod script;
pub mod sentences;
pub mod summarize;
pub mod tokenize;
pub mod vectorize;

pub use compare::{compare, compare_with, Comparison, TermWeight, DEFAULT_TOP_TERMS};
pub use script::{classify, Script, DEFAULT_CJK_RATIO};
pub use sentences::split_sentences;
pub use summarize::{
    select_sentences, summarize, summarize_with, ScoredSentence, DEFAULT_SUMMARY_SENTENCES,
};
pub use tokenize::{tokenize, Token, Tokenizer};
pub use vectorize::{pairwise_similarity, SimilarityMatrix, TfidfMatrix};
