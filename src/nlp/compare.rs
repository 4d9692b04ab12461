//! Pairwise document comparison.
//!
//! Fits a two-document [`TfidfMatrix`] and sorts every term into one of
//! three buckets: shared terms weigh `min(w1, w2)`, and a term carried by
//! one side only weighs its excess over the other (`max(w1 - w2, 0)` and
//! `max(w2 - w1, 0)`, i.e. its own weight). A term therefore lands in at
//! most one bucket. Each bucket is ranked, truncated, and stripped of zero
//! weights.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::AnalysisError;

use super::tokenize::Tokenizer;
use super::vectorize::TfidfMatrix;

pub const DEFAULT_TOP_TERMS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub similarity: f64,
    pub common_terms: Vec<TermWeight>,
    pub doc1_unique_terms: Vec<TermWeight>,
    pub doc2_unique_terms: Vec<TermWeight>,
}

/// Highest `top` non-zero entries, weight descending then term ascending.
fn rank(vocabulary: &[String], weights: Vec<(usize, f64)>, top: usize) -> Vec<TermWeight> {
    let mut weights = weights;
    weights.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| vocabulary[a.0].cmp(&vocabulary[b.0]))
    });
    weights
        .into_iter()
        .take(top)
        .filter(|&(_, w)| w > 0.0)
        .map(|(i, weight)| TermWeight {
            term: vocabulary[i].clone(),
            weight,
        })
        .collect()
}

pub fn compare_with(
    tokenizer: &Tokenizer,
    text1: &str,
    text2: &str,
    top_terms: usize,
) -> Result<Comparison, AnalysisError> {
    let matrix = TfidfMatrix::fit(tokenizer, &[text1, text2])?;
    let vocabulary = matrix.vocabulary();

    let mut common = Vec::with_capacity(vocabulary.len());
    let mut unique1 = Vec::new();
    let mut unique2 = Vec::new();
    for term in 0..vocabulary.len() {
        let w1 = matrix.weight(0, term);
        let w2 = matrix.weight(1, term);
        common.push((term, w1.min(w2)));
        if w1 > 0.0 && w2 > 0.0 {
            continue;
        }
        unique1.push((term, (w1 - w2).max(0.0)));
        unique2.push((term, (w2 - w1).max(0.0)));
    }

    Ok(Comparison {
        similarity: matrix.cosine(0, 1),
        common_terms: rank(vocabulary, common, top_terms),
        doc1_unique_terms: rank(vocabulary, unique1, top_terms),
        doc2_unique_terms: rank(vocabulary, unique2, top_terms),
    })
}

pub fn compare(text1: &str, text2: &str, top_terms: usize) -> Result<Comparison, AnalysisError> {
    compare_with(&Tokenizer::default(), text1, text2, top_terms)
}
