//! Sentence segmentation.
//!
//! Splits on terminal punctuation (ASCII or full-width) followed by
//! whitespace, or on runs of newlines. Candidates shorter than
//! [`MIN_SENTENCE_CHARS`] are folded into the sentence before them so list
//! bullets, abbreviations and stray headings do not stand alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fragments shorter than this (in characters) merge into their predecessor.
pub const MIN_SENTENCE_CHARS: usize = 20;

static BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?。！？])\s+|\n+").expect("boundary pattern compiles"));

/// Raw candidates before merging. Terminal punctuation stays with its sentence.
fn candidates(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    for caps in BOUNDARY_RE.captures_iter(text) {
        let (Some(whole), punct) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = punct.map(|p| p.end()).unwrap_or(whole.start());
        out.push(&text[start..end]);
        start = whole.end();
    }
    out.push(&text[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();

    for candidate in candidates(text) {
        if candidate.chars().count() < MIN_SENTENCE_CHARS && !buf.is_empty() {
            buf.push(' ');
            buf.push_str(candidate);
        } else {
            if !buf.is_empty() {
                sentences.push(std::mem::take(&mut buf));
            }
            buf.push_str(candidate);
        }
    }
    if !buf.is_empty() {
        sentences.push(buf);
    }

    sentences
}
