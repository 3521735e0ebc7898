// Feature extractor trait: the swap-ready abstraction.
//
// The detector only ever talks to this trait. The default implementation
// counts tokens, but the readability extractor (or anything else that turns
// documents into fixed-width numeric rows) can be dropped in without touching
// the scoring code.

use ndarray::Array2;

use crate::error::Result;

/// Turns documents into a feature matrix with one row per document.
///
/// `fit` learns whatever state the extractor needs (a vocabulary, say) and
/// replaces any state from an earlier fit. `transform` must return rows of
/// the same width for every call made against one fit, and must not fail on
/// tokens it never saw during `fit`.
pub trait FeatureExtractor {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Learn extractor state from `documents` only.
    fn fit(&mut self, documents: &[String]) -> Result<()>;

    /// Map `documents` to feature rows using the state from the last fit.
    fn transform(&self, documents: &[String]) -> Result<Array2<f64>>;

    /// Fit on `documents`, then transform those same documents.
    fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }
}
