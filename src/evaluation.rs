// Top-list evaluation: checking a scoring run against known labels.
//
// A scoring run is judged the way a moderator would use it: take the k
// highest-scored documents and see how many of them really are out of topic.
// The random baseline is the number of hits a uniformly random pick of k
// documents would get on average (hypergeometric mean k * M / N).

use anyhow::Result;
use serde::Serialize;

use crate::detector::rank_documents;

/// Outcome of evaluating one scored corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopListEvaluation {
    /// Size of the top list actually used (clamped to the corpus size)
    pub top_k: usize,
    /// Number of documents in the corpus
    pub documents: usize,
    /// Number of documents labeled out of topic
    pub oot_documents: usize,
    /// Labeled OOT documents that made the top list
    pub hits: usize,
    /// hits / top_k
    pub precision: f64,
    /// hits / oot_documents (0.0 when nothing is labeled)
    pub recall: f64,
    /// Expected hits for a random top list of the same size
    pub expected_hits: f64,
    /// Indices of the top list, most out of topic first
    pub top_indices: Vec<usize>,
}

impl TopListEvaluation {
    /// Evaluate `scores` against per-document OOT labels.
    pub fn compute(scores: &[f64], is_oot: &[bool], top_k: usize) -> Result<Self> {
        if scores.is_empty() {
            anyhow::bail!("Nothing to evaluate: no scores");
        }
        if scores.len() != is_oot.len() {
            anyhow::bail!(
                "Got {} scores but {} labels; they must line up one to one",
                scores.len(),
                is_oot.len()
            );
        }
        if top_k == 0 {
            anyhow::bail!("top_k must be at least 1");
        }

        let documents = scores.len();
        let top_k = top_k.min(documents);
        let oot_documents = is_oot.iter().filter(|&&oot| oot).count();

        let top_indices: Vec<usize> = rank_documents(scores).into_iter().take(top_k).collect();
        let hits = top_indices.iter().filter(|&&i| is_oot[i]).count();

        let recall = if oot_documents == 0 {
            0.0
        } else {
            hits as f64 / oot_documents as f64
        };

        Ok(Self {
            top_k,
            documents,
            oot_documents,
            hits,
            precision: hits as f64 / top_k as f64,
            recall,
            expected_hits: top_k as f64 * oot_documents as f64 / documents as f64,
            top_indices,
        })
    }

    /// How many more hits than random this run found.
    pub fn lift(&self) -> f64 {
        self.hits as f64 - self.expected_hits
    }
}
