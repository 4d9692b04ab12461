//! Script-ratio classification.
//!
//! Decides, once per call, whether a text is written mostly in a CJK-style
//! script (segmented morphologically) or a Latin-style one (split on word
//! boundaries). The decision is the share of characters that fall inside the
//! kana and CJK ideograph blocks.

use serde::Serialize;

/// Share of CJK characters at or above which a text counts as CJK-style.
pub const DEFAULT_CJK_RATIO: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Cjk,
}

/// Hiragana, katakana, CJK extension A and the unified ideographs.
pub fn is_cjk_char(c: char) -> bool {
    matches!(
        c,
        '\u{3040}'..='\u{30FF}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}'
    )
}

/// Fraction of `text`'s characters that are CJK. Empty text scores 0.
pub fn cjk_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut cjk = 0usize;
    for c in text.chars() {
        total += 1;
        if is_cjk_char(c) {
            cjk += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    cjk as f64 / total as f64
}

pub fn classify(text: &str, threshold: f64) -> Script {
    if text.is_empty() {
        return Script::Latin;
    }
    if cjk_ratio(text) >= threshold {
        Script::Cjk
    } else {
        Script::Latin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_latin() {
        assert_eq!(classify("", DEFAULT_CJK_RATIO), Script::Latin);
        assert_eq!(cjk_ratio(""), 0.0);
    }

    #[test]
    fn english_is_latin() {
        assert_eq!(
            classify("Communication is selection.", DEFAULT_CJK_RATIO),
            Script::Latin
        );
    }

    #[test]
    fn japanese_is_cjk() {
        assert_eq!(
            classify("社会システムの理論について", DEFAULT_CJK_RATIO),
            Script::Cjk
        );
    }

    #[test]
    fn ratio_counts_characters_not_bytes() {
        // 1 of 4 characters is an ideograph.
        let ratio = cjk_ratio("ab語c");
        assert!((ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        // 1 of 10 characters => 0.1.
        let text = "語abcdefghi";
        assert_eq!(classify(text, 0.1), Script::Cjk);
        assert_eq!(classify(text, 0.11), Script::Latin);
    }

    #[test]
    fn mostly_english_with_a_few_ideographs_stays_latin() {
        let text = "This paper discusses the concept of 縁 in social theory at some length.";
        assert_eq!(classify(text, DEFAULT_CJK_RATIO), Script::Latin);
    }
}
