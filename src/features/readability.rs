// Readability measures as document features.
//
// Each document becomes a row of classic readability indices plus the raw
// text statistics they are built from. Unlike the count vectorizer there is
// nothing to learn: `fit` is a no-op and every row depends only on its own
// document, so rows are always the same width.

use std::sync::OnceLock;

use ndarray::Array2;
use regex_lite::Regex;

use super::traits::FeatureExtractor;
use crate::error::{DetectorError, Result};

/// Sentence terminators. Line breaks end a sentence too, since forum posts
/// often skip the final period.
const SENTENCE_BREAK: &str = r"[.!?]+|\n+";

/// Words at least this long count as "long" (LIX, RIX).
const LONG_WORD_CHARS: usize = 7;

/// Words with at least this many syllables count as "complex" (Fog, SMOG).
const COMPLEX_WORD_SYLLABLES: usize = 3;

/// Width of every readability row.
pub const FEATURE_COUNT: usize = 13;

/// Raw counts a readability formula is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStats {
    pub characters: usize,
    pub syllables: usize,
    pub words: usize,
    pub sentences: usize,
    pub long_words: usize,
    pub complex_words: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Result<Self> {
        let mut stats = TextStats::default();

        for word in text.split_whitespace().filter_map(clean_word) {
            let chars = word.chars().count();
            let syllables = count_syllables(&word);
            stats.words += 1;
            stats.characters += chars;
            stats.syllables += syllables;
            if chars >= LONG_WORD_CHARS {
                stats.long_words += 1;
            }
            if syllables >= COMPLEX_WORD_SYLLABLES {
                stats.complex_words += 1;
            }
        }

        if stats.words > 0 {
            stats.sentences = sentence_pattern()?
                .split(text)
                .filter(|s| s.chars().any(char::is_alphanumeric))
                .count()
                .max(1);
        }

        Ok(stats)
    }
}

/// Readability extractor: one row of [`ReadabilityMeasures::FEATURE_NAMES`]
/// per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityMeasures;

impl ReadabilityMeasures {
    pub const FEATURE_NAMES: [&'static str; FEATURE_COUNT] = [
        "kincaid",
        "ari",
        "coleman_liau",
        "flesch_reading_ease",
        "gunning_fog",
        "lix",
        "smog",
        "rix",
        "characters_per_word",
        "syllables_per_word",
        "words_per_sentence",
        "words",
        "sentences",
    ];

    pub fn new() -> Self {
        Self
    }

    /// Feature row for one document, in `FEATURE_NAMES` order.
    pub fn measure(text: &str) -> Result<[f64; FEATURE_COUNT]> {
        let stats = TextStats::from_text(text)?;
        if stats.words == 0 {
            return Ok([0.0; FEATURE_COUNT]);
        }

        let words = stats.words as f64;
        let sentences = stats.sentences as f64;
        let chars_per_word = stats.characters as f64 / words;
        let syll_per_word = stats.syllables as f64 / words;
        let words_per_sent = words / sentences;
        let long = stats.long_words as f64;
        let complex = stats.complex_words as f64;

        Ok([
            11.8 * syll_per_word + 0.39 * words_per_sent - 15.59,
            4.71 * chars_per_word + 0.5 * words_per_sent - 21.43,
            5.879851 * chars_per_word - 29.587280 * (sentences / words) - 15.800804,
            206.835 - 84.6 * syll_per_word - 1.015 * words_per_sent,
            0.4 * (words_per_sent + 100.0 * complex / words),
            words_per_sent + 100.0 * long / words,
            (complex * 30.0 / sentences).sqrt() + 3.0,
            long / sentences,
            chars_per_word,
            syll_per_word,
            words_per_sent,
            words,
            sentences,
        ])
    }
}

impl FeatureExtractor for ReadabilityMeasures {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn fit(&mut self, _documents: &[String]) -> Result<()> {
        Ok(())
    }

    fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        let width = Self::FEATURE_NAMES.len();
        let mut rows = Array2::<f64>::zeros((documents.len(), width));
        for (i, doc) in documents.iter().enumerate() {
            let measures = Self::measure(doc)?;
            for (j, value) in measures.into_iter().enumerate() {
                rows[[i, j]] = value;
            }
        }
        Ok(rows)
    }
}

fn sentence_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(SENTENCE_BREAK).map_err(|e| DetectorError::Extractor(e.to_string()))?;
    Ok(PATTERN.get_or_init(|| re))
}

/// Strip surrounding punctuation; `None` if nothing word-like is left.
fn clean_word(raw: &str) -> Option<String> {
    let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}

/// Vowel-group syllable estimate. A trailing silent "e" doesn't count
/// ("make" is one syllable, "table" is two). Every word has at least one.
pub fn count_syllables(word: &str) -> usize {
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let lower = word.to_lowercase();

    let mut groups = 0;
    let mut prev_vowel = false;
    for c in lower.chars() {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }

    if groups > 1 && lower.ends_with('e') && !lower.ends_with("le") && !lower.ends_with("ee") {
        groups -= 1;
    }

    groups.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("readability"), 5);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("42"), 1);
    }

    #[test]
    fn test_text_stats() {
        let stats = TextStats::from_text("The cat sat. It was extraordinary!").unwrap();
        assert_eq!(stats.words, 6);
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.long_words, 1);
        assert_eq!(stats.complex_words, 1);
    }

    #[test]
    fn test_newline_ends_sentence() {
        let stats = TextStats::from_text("first line\nsecond line").unwrap();
        assert_eq!(stats.sentences, 2);
    }

    #[test]
    fn test_empty_document_is_zero_row() {
        let row = ReadabilityMeasures::measure("  ... ").unwrap();
        assert!(row.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rows_have_fixed_width() {
        let mut rm = ReadabilityMeasures::new();
        let docs = vec!["Short one.".to_string(), String::new()];
        let x = rm.fit_transform(&docs).unwrap();
        assert_eq!(x.shape(), &[2, ReadabilityMeasures::FEATURE_NAMES.len()]);
    }

    #[test]
    fn test_flesch_reading_ease() {
        // 4 words, 1 sentence, 4 syllables
        let row = ReadabilityMeasures::measure("The dog ran home.").unwrap();
        let expected = 206.835 - 84.6 * 1.0 - 1.015 * 4.0;
        assert!((row[3] - expected).abs() < 1e-9, "got {}", row[3]);
    }
}
