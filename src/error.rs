// Error taxonomy for the scoring core.
//
// Application layers (config, corpus loading, the CLI) use anyhow. The
// detector, metrics and extractors return this enum so callers can match on
// the failure kind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("Empty corpus: at least one document is required")]
    EmptyCorpus,

    #[error("{method} needs at least {required} documents, got {actual}")]
    InsufficientCorpus {
        method: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Extractor produced inconsistent output: expected {expected}, got {actual}")]
    ExtractorMismatch { expected: usize, actual: usize },

    #[error("Extractor error: {0}")]
    Extractor(String),
}

/// Fail with `EmptyCorpus` or `InsufficientCorpus` when fewer than
/// `required` documents were given.
pub(crate) fn require_documents(
    method: &'static str,
    actual: usize,
    required: usize,
) -> Result<()> {
    if actual == 0 {
        return Err(DetectorError::EmptyCorpus);
    }
    if actual < required {
        return Err(DetectorError::InsufficientCorpus {
            method,
            required,
            actual,
        });
    }
    Ok(())
}
