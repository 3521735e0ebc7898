// Colored terminal output for score tables and evaluations.
//
// main.rs delegates all terminal formatting here.

use colored::Colorize;

use super::{preview, ScoreReport};
use crate::corpus::Corpus;
use crate::evaluation::TopListEvaluation;
use crate::metric::Metric;

/// Display a ranked score table.
///
/// Scores are colored relative to the corpus: the top quarter of the range is
/// red, the next quarter yellow.
pub fn display_scores(report: &ScoreReport, corpus: &Corpus) {
    if report.documents.is_empty() {
        println!("No documents scored.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Out-of-topic scores ({} documents, {} / {} / {}) ===",
            report.documents.len(),
            report.method,
            report.metric,
            report.extractor
        )
        .bold()
    );
    println!();

    println!(
        "  {:>4}  {:<28} {:>10}  {}",
        "Rank".dimmed(),
        "Document".dimmed(),
        "Score".dimmed(),
        "Preview".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    let (min, max) = report
        .documents
        .iter()
        .map(|d| d.score)
        .filter(|s| s.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });

    for doc in &report.documents {
        let score_str = format!("{:>10.4}", doc.score);
        let colored_score = match relative_position(doc.score, min, max) {
            Some(p) if p >= 0.75 => score_str.red().bold(),
            Some(p) if p >= 0.5 => score_str.yellow(),
            _ => score_str.normal(),
        };

        let text = corpus
            .documents
            .get(doc.index)
            .map(|d| preview(&d.text, 40))
            .unwrap_or_default();

        println!(
            "  {:>4}. {:<28} {}  {}",
            doc.rank,
            doc.name,
            colored_score,
            text.dimmed()
        );
    }
    println!();
}

/// Where `score` sits in `[min, max]`, as a fraction. `None` when the range
/// is empty or the score isn't finite.
fn relative_position(score: f64, min: f64, max: f64) -> Option<f64> {
    if !score.is_finite() || max <= min {
        return None;
    }
    Some((score - min) / (max - min))
}

/// Display a top-list evaluation.
pub fn display_evaluation(eval: &TopListEvaluation, corpus: &Corpus) {
    println!(
        "\n{}",
        format!(
            "=== Top-{} evaluation ({} of {} documents labeled out of topic) ===",
            eval.top_k, eval.oot_documents, eval.documents
        )
        .bold()
    );
    println!();

    for (rank, &index) in eval.top_indices.iter().enumerate() {
        let name = corpus
            .documents
            .get(index)
            .map(|d| d.name.as_str())
            .unwrap_or("?");
        println!("  {:>4}. {}", rank + 1, name);
    }
    println!();

    println!("  Hits:      {} (random baseline {:.2})", eval.hits, eval.expected_hits);
    println!("  Precision: {:.3}", eval.precision);
    println!("  Recall:    {:.3}", eval.recall);

    let lift = eval.lift();
    let lift_str = format!("{lift:+.2}");
    let colored_lift = if lift > 0.0 {
        lift_str.green()
    } else if lift < 0.0 {
        lift_str.red()
    } else {
        lift_str.normal()
    };
    println!("  Lift:      {colored_lift}");
    println!();
}

/// List the metric catalog.
pub fn display_metrics() {
    println!("\n{}", "=== Available metrics ===".bold());
    for metric in Metric::ALL {
        let marker = if metric == Metric::default() {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", metric.name(), marker);
    }
    println!();
}
