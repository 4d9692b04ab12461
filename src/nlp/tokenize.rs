//! Language-aware tokenization.
//!
//! Latin-style text is split with a word regex, lower-cased and filtered
//! against an English stop list. CJK-style text goes through a Japanese
//! morphological segmenter (IPADIC) and is filtered against a Japanese
//! function-word list. The
//! branch is picked once per call by [`classify`](super::script::classify).
//!
//! The segmenter is built lazily on first CJK call and then shared read-only
//! for the rest of the process.

use std::collections::HashSet;

use std::borrow::Cow;

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use once_cell::sync::Lazy;
use regex::Regex;

use super::script::{classify, Script, DEFAULT_CJK_RATIO};

/// A normalized term produced by [`Tokenizer::tokenize`].
pub type Token = String;

const LATIN_MIN_CHARS: usize = 3;
const CJK_MIN_CHARS: usize = 2;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9\-']{1,}").expect("word pattern compiles"));

static SEGMENTER: Lazy<Option<Segmenter>> = Lazy::new(|| {
    tracing::debug!("loading CJK segmenter dictionary");
    match load_dictionary("embedded://ipadic") {
        Ok(dictionary) => Some(Segmenter::new(Mode::Normal, dictionary, None)),
        Err(e) => {
            tracing::warn!(error = %e, "CJK segmenter unavailable");
            None
        }
    }
});

static LATIN_STOP: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "to", "of", "in", "for", "on", "with", "as", "by", "at",
        "from", "is", "are", "was", "were", "be", "been", "being", "this", "that", "these",
        "those", "it", "we", "you", "they", "i", "he", "she", "them", "his", "her", "their",
        "our", "your",
    ]
    .into_iter()
    .collect()
});

static CJK_STOP: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "これ", "それ", "あれ", "こと", "ため", "よう", "もの", "ところ", "そして", "しかし",
        "また", "です", "ます", "する", "いる", "ある", "なる", "できる", "られる", "など",
        "にて", "による",
    ]
    .into_iter()
    .collect()
});

impl Script {
    /// Produce filtered tokens for `text` using this script's strategy.
    pub fn tokens(self, text: &str) -> Vec<Token> {
        match self {
            Script::Latin => latin_tokens(text),
            Script::Cjk => cjk_tokens(text),
        }
    }
}

fn latin_tokens(text: &str) -> Vec<Token> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| !LATIN_STOP.contains(t.as_str()) && t.chars().count() >= LATIN_MIN_CHARS)
        .collect()
}

fn cjk_tokens(text: &str) -> Vec<Token> {
    let Some(segmenter) = SEGMENTER.as_ref() else {
        return Vec::new();
    };
    let morphemes = match segmenter.segment(Cow::Borrowed(text)) {
        Ok(morphemes) => morphemes,
        Err(e) => {
            tracing::warn!(error = %e, "CJK segmentation failed");
            return Vec::new();
        }
    };
    morphemes
        .iter()
        .map(|m| m.surface.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| !CJK_STOP.contains(*t) && t.chars().count() >= CJK_MIN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Stateless tokenizer parameterized by the CJK classification threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tokenizer {
    cjk_ratio: f64,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            cjk_ratio: DEFAULT_CJK_RATIO,
        }
    }
}

impl Tokenizer {
    pub fn new(cjk_ratio: f64) -> Self {
        Self { cjk_ratio }
    }

    pub fn cjk_ratio(&self) -> f64 {
        self.cjk_ratio
    }

    pub fn script(&self, text: &str) -> Script {
        classify(text, self.cjk_ratio)
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.script(text).tokens(text)
    }
}

/// Tokenize with the default CJK threshold.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::default().tokenize(text)
}
