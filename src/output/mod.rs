// Output formatting: score reports for the terminal and for JSON.

pub mod terminal;

use serde::Serialize;

use crate::corpus::Corpus;
use crate::detector::{rank_documents, ScoringMethod};
use crate::metric::Metric;

/// One row of a score report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    /// 1-based rank, most out of topic first
    pub rank: usize,
    /// Position in the corpus
    pub index: usize,
    pub name: String,
    pub score: f64,
}

/// A scored corpus, ranked from most to least out of topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub method: ScoringMethod,
    pub metric: Metric,
    pub extractor: String,
    pub documents: Vec<ScoredDocument>,
}

impl ScoreReport {
    /// Pair `scores` (in corpus order) with document names and rank them.
    pub fn new(
        corpus: &Corpus,
        scores: &[f64],
        method: ScoringMethod,
        metric: Metric,
        extractor: &str,
    ) -> Self {
        let documents = rank_documents(scores)
            .into_iter()
            .enumerate()
            .map(|(rank, index)| ScoredDocument {
                rank: rank + 1,
                index,
                name: corpus
                    .documents
                    .get(index)
                    .map(|d| d.name.clone())
                    .unwrap_or_default(),
                score: scores[index],
            })
            .collect();

        Self {
            method,
            metric,
            extractor: extractor.to_string(),
            documents,
        }
    }
}

/// One-line preview of a document: whitespace collapsed, at most `max_chars`
/// characters, "..." appended if anything was cut.
///
/// Truncation counts characters, not bytes, so it never splits a multi-byte
/// character.
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("a\n\n  b\tc", 20), "a b c");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_report_is_ranked() {
        let corpus = Corpus {
            documents: vec![
                Document { name: "a.txt".into(), text: String::new() },
                Document { name: "b.txt".into(), text: String::new() },
            ],
        };
        let report = ScoreReport::new(
            &corpus,
            &[1.0, 3.0],
            ScoringMethod::MeanComp,
            Metric::Cityblock,
            "count",
        );
        assert_eq!(report.documents[0].name, "b.txt");
        assert_eq!(report.documents[0].rank, 1);
        assert_eq!(report.documents[1].index, 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["method"], "mean-comp");
        assert_eq!(json["metric"], "cityblock");
    }
}
