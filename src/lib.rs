// otdet: out-of-topic document detection.
//
// This is the library root. The scoring core is `detector` plus the
// `features` and `metric` modules it is built on; the remaining modules load
// corpora, configure runs and present results.

pub mod config;
pub mod corpus;
pub mod detector;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod metric;
pub mod output;

pub use detector::{OotDetector, ScoringMethod};
pub use error::{DetectorError, Result};
pub use features::traits::FeatureExtractor;
pub use metric::Metric;
