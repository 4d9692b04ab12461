//! Frequency-based extractive summarization.
//!
//! Every sentence is scored by the summed document-level frequency of its
//! tokens (normalized so the most frequent term weighs 1.0), damped by
//! `1 + ln(1 + token_count)` so long sentences do not win on length alone.
//! The best sentences are returned in document order.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::sentences::split_sentences;
use super::tokenize::{Token, Tokenizer};

pub const DEFAULT_SUMMARY_SENTENCES: usize = 7;

/// A sentence picked for a summary, with its position in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub index: usize,
    pub text: String,
    pub score: f64,
}

/// Document term frequencies divided by the largest count.
fn term_weights(tokens: &[Token]) -> HashMap<&str, f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(0);
    if max == 0 {
        return HashMap::new();
    }
    counts
        .into_iter()
        .map(|(t, c)| (t, c as f64 / max as f64))
        .collect()
}

fn score_sentence(tokens: &[Token], weights: &HashMap<&str, f64>) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let sum: f64 = tokens
        .iter()
        .map(|t| weights.get(t.as_str()).copied().unwrap_or(0.0))
        .sum();
    sum / (1.0 + (1.0 + tokens.len() as f64).ln())
}

/// Pick up to `count` sentences, returned in document order.
///
/// When no token survives filtering the first `count` sentences are
/// returned with a score of 0.
pub fn select_sentences(tokenizer: &Tokenizer, text: &str, count: usize) -> Vec<ScoredSentence> {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Vec::new();
    }

    let doc_tokens = tokenizer.tokenize(text);
    let weights = term_weights(&doc_tokens);
    if weights.is_empty() {
        tracing::debug!(sentences = sentences.len(), "no terms survived filtering, using head sentences");
        return sentences
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, text)| ScoredSentence {
                index,
                text,
                score: 0.0,
            })
            .collect();
    }

    let mut scored: Vec<ScoredSentence> = sentences
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let score = score_sentence(&tokenizer.tokenize(&text), &weights);
            ScoredSentence { index, text, score }
        })
        .collect();

    // Stable sort: equal scores keep ascending index order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(count);
    scored.sort_by_key(|s| s.index);
    scored
}

/// Summary of `text` as newline-joined sentences in document order.
pub fn summarize_with(tokenizer: &Tokenizer, text: &str, sentence_count: usize) -> String {
    select_sentences(tokenizer, text, sentence_count)
        .into_iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn summarize(text: &str, sentence_count: usize) -> String {
    summarize_with(&Tokenizer::default(), text, sentence_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::sentences::split_sentences;

    const ARTICLE: &str = "Social systems reproduce themselves through communication. \
        Communication is a synthesis of information, utterance and understanding. \
        The weather was pleasant on the day of the lecture. \
        Systems observe their environment only through their own communication. \
        Lunch was served at noon in the main hall of the building. \
        Every communication connects to a previous communication within the system.";

    #[test]
    fn empty_text_gives_empty_summary() {
        assert_eq!(summarize("", 3), "");
        assert!(select_sentences(&Tokenizer::default(), "  ", 3).is_empty());
    }

    #[test]
    fn scenario_picks_highest_scoring_sentence_verbatim() {
        let text = "Sentence one is long enough to count. Short. Sentence two is also sufficiently long to count.";
        let summary = summarize(text, 1);
        let sentences = split_sentences(text);
        assert_eq!(summary.lines().count(), 1);
        assert!(sentences.iter().any(|s| s == &summary));
    }

    #[test]
    fn summary_respects_requested_count_and_source_length() {
        for k in 1..10 {
            let summary = summarize(ARTICLE, k);
            let lines = summary.lines().count();
            assert!(lines <= k);
            assert!(lines <= split_sentences(ARTICLE).len());
        }
    }

    #[test]
    fn zero_count_gives_empty_summary() {
        assert_eq!(summarize(ARTICLE, 0), "");
    }

    #[test]
    fn summary_preserves_document_order() {
        let picked = select_sentences(&Tokenizer::default(), ARTICLE, 3);
        assert_eq!(picked.len(), 3);
        for pair in picked.windows(2) {
            assert!(pair[0].index < pair[1].index);
        }
    }

    #[test]
    fn dense_topical_sentences_beat_filler() {
        let summary = summarize(ARTICLE, 2);
        assert!(!summary.contains("weather"));
        assert!(!summary.contains("Lunch"));
    }

    #[test]
    fn tokenless_text_falls_back_to_head_sentences() {
        // Only stop words and short tokens: nothing survives the filter.
        let text = "It is as it was and we are in it.\nHe is at the on of to by it an.\nWe are to be as it is or as it was.";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 3);
        assert_eq!(summarize(text, 2), sentences[..2].join("\n"));
    }

    #[test]
    fn ties_prefer_earlier_sentences() {
        let text = "Alpha bravo charlie delta echo.\nAlpha bravo charlie delta echo!\nAlpha bravo charlie delta echo?";
        let picked = select_sentences(&Tokenizer::default(), text, 1);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].index, 0);
    }

    #[test]
    fn score_damps_long_sentences() {
        let mut weights = HashMap::new();
        weights.insert("term", 1.0);
        let short = vec!["term".to_string()];
        let long = vec!["term".to_string(); 4];
        let s_short = score_sentence(&short, &weights);
        let s_long = score_sentence(&long, &weights);
        assert!((s_short - 1.0 / (1.0 + 2f64.ln())).abs() < 1e-12);
        assert!((s_long - 4.0 / (1.0 + 5f64.ln())).abs() < 1e-12);
        assert!(s_long / 4.0 < s_short);
    }
}
