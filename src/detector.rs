// Out-of-topic detector: the three leave-one-out scoring formulas.
//
// Every method turns a corpus into one score per document, in corpus order.
// Higher means further from the rest of the corpus.
//
//   clust_dist:    mean distance from a document to every document (itself
//                  included), i.e. the row mean of the N x N distance matrix
//   mean_comp:     distance from a document to the mean of all *other* rows
//   txt_comp_dist: distance between a document's own features and the
//                  features of every other document joined into one text,
//                  all under a single corpus-wide fit
//
// The metric name is resolved before any extractor work, so an unknown name
// fails the call without touching the extractor's fitted state.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{require_documents, DetectorError, Result};
use crate::features::count::CountVectorizer;
use crate::features::traits::FeatureExtractor;
use crate::metric::{pairwise_distances, Metric};

/// Text placed between documents when building the complement pseudo-document
/// for `txt_comp_dist`.
pub const DEFAULT_SEPARATOR: &str = " ";

/// Which scoring formula to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMethod {
    #[default]
    ClustDist,
    MeanComp,
    TxtCompDist,
}

impl ScoringMethod {
    pub const ALL: [ScoringMethod; 3] = [
        ScoringMethod::ClustDist,
        ScoringMethod::MeanComp,
        ScoringMethod::TxtCompDist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::ClustDist => "clust-dist",
            ScoringMethod::MeanComp => "mean-comp",
            ScoringMethod::TxtCompDist => "txt-comp-dist",
        }
    }
}

impl FromStr for ScoringMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "clust-dist" => Ok(ScoringMethod::ClustDist),
            "mean-comp" => Ok(ScoringMethod::MeanComp),
            "txt-comp-dist" => Ok(ScoringMethod::TxtCompDist),
            other => anyhow::bail!(
                "Unknown scoring method '{other}' (expected clust-dist, mean-comp or txt-comp-dist)"
            ),
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores documents by how far they sit from the rest of their corpus.
///
/// The detector owns its extractor outright. Every `fit` (including the one
/// inside `design_matrix`) replaces the extractor's state, which is why the
/// scoring methods take `&mut self`.
pub struct OotDetector {
    extractor: Box<dyn FeatureExtractor>,
    separator: String,
}

impl Default for OotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OotDetector {
    /// Detector backed by a plain token-count extractor.
    pub fn new() -> Self {
        Self::with_extractor(Box::new(CountVectorizer::new()))
    }

    pub fn with_extractor(extractor: Box<dyn FeatureExtractor>) -> Self {
        Self {
            extractor,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Use `separator` when joining the other documents in `txt_comp_dist`.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn extractor(&self) -> &dyn FeatureExtractor {
        self.extractor.as_ref()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Feature matrix for `documents`: exactly the extractor's `fit_transform`.
    pub fn design_matrix(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        require_documents("design_matrix", documents.len(), 1)?;

        let x = self.extractor.fit_transform(documents)?;
        if x.nrows() != documents.len() {
            return Err(DetectorError::ExtractorMismatch {
                expected: documents.len(),
                actual: x.nrows(),
            });
        }

        debug!(
            extractor = self.extractor.name(),
            rows = x.nrows(),
            features = x.ncols(),
            "Built design matrix"
        );
        Ok(x)
    }

    /// Mean distance from each document to every document in the corpus.
    ///
    /// The sum over a row of the pairwise distance matrix is divided by N,
    /// not N - 1: the zero self-distance is part of the average. A single
    /// document scores 0.
    pub fn clust_dist(&mut self, documents: &[String], metric: &str) -> Result<Vec<f64>> {
        let metric: Metric = metric.parse()?;
        require_documents("clust_dist", documents.len(), 1)?;

        let x = self.design_matrix(documents)?;
        let d = pairwise_distances(x.view(), x.view(), metric)?;
        let n = x.nrows() as f64;
        let scores: Vec<f64> = d.sum_axis(Axis(1)).iter().map(|s| s / n).collect();

        info!(
            method = "clust_dist",
            %metric,
            documents = scores.len(),
            "Scored corpus"
        );
        Ok(scores)
    }

    /// Distance from each document to the mean of all other documents.
    ///
    /// The leave-one-out centroid is `(sum(X) - X[i]) / (N - 1)`.
    pub fn mean_comp(&mut self, documents: &[String], metric: &str) -> Result<Vec<f64>> {
        let metric: Metric = metric.parse()?;
        require_documents("mean_comp", documents.len(), 2)?;

        let x = self.design_matrix(documents)?;
        let total = x.sum_axis(Axis(0));
        let others = (x.nrows() - 1) as f64;

        let scores = x
            .outer_iter()
            .map(|row| {
                let centroid = (&total - &row) / others;
                metric.distance(row, centroid.view())
            })
            .collect::<Result<Vec<f64>>>()?;

        info!(
            method = "mean_comp",
            %metric,
            documents = scores.len(),
            "Scored corpus"
        );
        Ok(scores)
    }

    /// Distance between each document and the rest of the corpus taken as
    /// one text.
    ///
    /// The extractor is fit once on the whole corpus and then queried 2N
    /// times: for each document, first the document alone and then the other
    /// documents joined with the detector's separator. There is no refit
    /// inside the loop; the shared vocabulary is what makes the two rows
    /// comparable.
    pub fn txt_comp_dist(&mut self, documents: &[String], metric: &str) -> Result<Vec<f64>> {
        let metric: Metric = metric.parse()?;
        require_documents("txt_comp_dist", documents.len(), 2)?;

        self.extractor.fit(documents)?;

        let mut width: Option<usize> = None;
        let mut scores = Vec::with_capacity(documents.len());

        for i in 0..documents.len() {
            let own = self.transform_single(&documents[i..=i], &mut width)?;

            let rest = documents
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, doc)| doc.as_str())
                .collect::<Vec<_>>()
                .join(self.separator.as_str());
            let complement = self.transform_single(&[rest], &mut width)?;

            scores.push(metric.distance(own.row(0), complement.row(0))?);
        }

        info!(
            method = "txt_comp_dist",
            %metric,
            documents = scores.len(),
            "Scored corpus"
        );
        Ok(scores)
    }

    /// Run the formula selected by `method`.
    pub fn score(
        &mut self,
        method: ScoringMethod,
        documents: &[String],
        metric: &str,
    ) -> Result<Vec<f64>> {
        match method {
            ScoringMethod::ClustDist => self.clust_dist(documents, metric),
            ScoringMethod::MeanComp => self.mean_comp(documents, metric),
            ScoringMethod::TxtCompDist => self.txt_comp_dist(documents, metric),
        }
    }

    /// Transform a one-document slice and check it yields one row whose width
    /// matches every earlier row under the same fit.
    fn transform_single(
        &self,
        document: &[String],
        width: &mut Option<usize>,
    ) -> Result<Array2<f64>> {
        let row = self.extractor.transform(document)?;
        if row.nrows() != 1 {
            return Err(DetectorError::ExtractorMismatch {
                expected: 1,
                actual: row.nrows(),
            });
        }
        match *width {
            Some(expected) if expected != row.ncols() => {
                return Err(DetectorError::ExtractorMismatch {
                    expected,
                    actual: row.ncols(),
                });
            }
            Some(_) => {}
            None => *width = Some(row.ncols()),
        }
        Ok(row)
    }
}

/// Document indices ordered from most to least out-of-topic.
///
/// Ties keep corpus order; NaN scores sort last.
pub fn rank_documents(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (scores[a], scores[b]);
        match (sa.is_nan(), sb.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
    order
}
