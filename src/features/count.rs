// Bag-of-words token counting.
//
// Each column of the output is one vocabulary term and each cell is the raw
// number of times that term occurs in the document. The vocabulary is the
// sorted set of tokens seen at fit time, so column order is deterministic.

use std::collections::{BTreeSet, HashMap, HashSet};

use ndarray::Array2;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::FeatureExtractor;
use crate::error::{DetectorError, Result};

/// Token-count extractor: the detector's default.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    /// Drop English stop words before counting
    stop_words: Option<HashSet<String>>,
    /// Term -> column index, set by `fit`
    vocabulary: Option<HashMap<String, usize>>,
    /// Terms in column order
    feature_names: Vec<String>,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as `new`, but English stop words never enter the vocabulary.
    pub fn with_stop_words() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: Some(words.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn removes_stop_words(&self) -> bool {
        self.stop_words.is_some()
    }

    /// Vocabulary terms in column order. Empty before the first fit.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Column index of `term`, if it was seen at fit time.
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.as_ref()?.get(term).copied()
    }

    /// Split a document into lowercase tokens: maximal runs of alphanumeric
    /// characters or `_`, at least two characters long.
    pub fn tokenize<'a>(&'a self, document: &'a str) -> impl Iterator<Item = String> + 'a {
        document
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|tok| tok.chars().count() >= 2)
            .map(str::to_lowercase)
            .filter(move |tok| {
                self.stop_words
                    .as_ref()
                    .map_or(true, |stop| !stop.contains(tok))
            })
    }
}

impl FeatureExtractor for CountVectorizer {
    fn name(&self) -> &'static str {
        "count"
    }

    fn fit(&mut self, documents: &[String]) -> Result<()> {
        let terms: BTreeSet<String> = documents
            .iter()
            .flat_map(|doc| self.tokenize(doc))
            .collect();

        self.feature_names = terms.into_iter().collect();
        self.vocabulary = Some(
            self.feature_names
                .iter()
                .enumerate()
                .map(|(col, term)| (term.clone(), col))
                .collect(),
        );

        debug!(
            documents = documents.len(),
            vocabulary = self.feature_names.len(),
            "Fitted count vocabulary"
        );
        Ok(())
    }

    fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        let vocabulary = self.vocabulary.as_ref().ok_or_else(|| {
            DetectorError::Extractor("CountVectorizer must be fit before transform".to_string())
        })?;

        let mut counts = Array2::<f64>::zeros((documents.len(), vocabulary.len()));
        for (row, doc) in documents.iter().enumerate() {
            // Unseen tokens are dropped
            for token in self.tokenize(doc) {
                if let Some(&col) = vocabulary.get(&token) {
                    counts[[row, col]] += 1.0;
                }
            }
        }
        Ok(counts)
    }
}
