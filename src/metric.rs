// Named distance metrics over feature rows.
//
// Scoring calls select a metric by name ("euclidean", "cityblock", ...).
// Names are resolved against this closed catalog at call time; an unknown
// name is an error, never a silent fallback to Euclidean.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};

/// Name of the metric used when the caller doesn't pick one.
pub const DEFAULT_METRIC: &str = "euclidean";

/// A symmetric pairwise distance function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Straight-line (L2) distance
    #[default]
    Euclidean,
    /// Squared L2 distance
    SqEuclidean,
    /// Manhattan (L1) distance
    Cityblock,
    /// Largest per-feature difference (L-infinity)
    Chebyshev,
    /// One minus the cosine of the angle between the rows
    Cosine,
    /// Summed absolute difference over summed absolute sum
    BrayCurtis,
    /// Per-feature absolute difference weighted by magnitude
    Canberra,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Euclidean,
        Metric::SqEuclidean,
        Metric::Cityblock,
        Metric::Chebyshev,
        Metric::Cosine,
        Metric::BrayCurtis,
        Metric::Canberra,
    ];

    /// Canonical catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Cityblock => "cityblock",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::BrayCurtis => "braycurtis",
            Metric::Canberra => "canberra",
        }
    }

    /// Distance between two feature rows.
    ///
    /// Both rows must have the same width; a mismatch means the extractor
    /// produced inconsistent output and is reported as `ExtractorMismatch`.
    pub fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        if a.len() != b.len() {
            return Err(DetectorError::ExtractorMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }

        let pairs = a.iter().zip(b.iter()).map(|(&x, &y)| (x, y));

        let d: f64 = match self {
            Metric::Euclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt(),
            Metric::SqEuclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum(),
            Metric::Cityblock => pairs.map(|(x, y)| (x - y).abs()).sum(),
            Metric::Chebyshev => pairs.map(|(x, y)| (x - y).abs()).fold(0.0, f64::max),
            Metric::Cosine => cosine_distance(a, b),
            Metric::BrayCurtis => {
                let (diff, total) = pairs.fold((0.0, 0.0), |(d, t), (x, y)| {
                    (d + (x - y).abs(), t + (x + y).abs())
                });
                if total == 0.0 {
                    0.0
                } else {
                    diff / total
                }
            }
            Metric::Canberra => pairs
                .map(|(x, y)| {
                    let denom = x.abs() + y.abs();
                    if denom == 0.0 {
                        0.0
                    } else {
                        (x - y).abs() / denom
                    }
                })
                .sum(),
        };

        Ok(d)
    }
}

/// Cosine distance with the zero-vector cases pinned down: two zero rows are
/// identical (0.0), a zero row against a non-zero row is maximally apart (1.0).
fn cosine_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        // Rounding can push the cosine a hair past 1.0
        _ => (1.0 - dot / (norm_a * norm_b)).max(0.0),
    }
}

impl FromStr for Metric {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "sqeuclidean" => Ok(Metric::SqEuclidean),
            "cityblock" | "manhattan" | "l1" => Ok(Metric::Cityblock),
            "chebyshev" => Ok(Metric::Chebyshev),
            "cosine" => Ok(Metric::Cosine),
            "braycurtis" => Ok(Metric::BrayCurtis),
            "canberra" => Ok(Metric::Canberra),
            _ => Err(DetectorError::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full distance matrix between the rows of `x` and the rows of `y`.
///
/// Entry `[i, j]` is `metric.distance(x[i], y[j])`.
pub fn pairwise_distances(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    metric: Metric,
) -> Result<Array2<f64>> {
    if x.ncols() != y.ncols() {
        return Err(DetectorError::ExtractorMismatch {
            expected: x.ncols(),
            actual: y.ncols(),
        });
    }

    let mut out = Array2::<f64>::zeros((x.nrows(), y.nrows()));
    for (i, row_x) in x.outer_iter().enumerate() {
        for (j, row_y) in y.outer_iter().enumerate() {
            out[[i, j]] = metric.distance(row_x, row_y)?;
        }
    }
    Ok(out)
}
