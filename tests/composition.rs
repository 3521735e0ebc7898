// Composition tests: verifying that the pieces chain together correctly.
//
// These tests exercise the data flow between modules with the real
// extractors:
//   corpus files -> Corpus -> OotDetector -> scores -> report / evaluation
// Filesystem access is limited to temporary directories.

use std::fs;

use otdet::config::{Config, ExtractorKind};
use otdet::corpus::{load_corpus, load_corpus_dir, load_corpus_file};
use otdet::detector::{rank_documents, OotDetector, ScoringMethod};
use otdet::evaluation::TopListEvaluation;
use otdet::features::readability::ReadabilityMeasures;
use otdet::metric::Metric;
use otdet::output::ScoreReport;

/// Four gardening posts sharing a core vocabulary and one post about
/// something else entirely.
fn gardening_corpus() -> Vec<String> {
    [
        "tomato garden water soil compost seedlings",
        "tomato garden water soil mulch sunlight",
        "tomato garden water soil pruning trellis",
        "tomato garden water soil harvest basil",
        "bitcoin exchange wallet hack price crash",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

const OFF_TOPIC: usize = 4;

// ============================================================
// Count extractor: every method flags the off-topic post
// ============================================================

#[test]
fn every_method_ranks_off_topic_post_first() {
    let documents = gardening_corpus();
    for method in ScoringMethod::ALL {
        for metric in ["euclidean", "cityblock"] {
            let mut detector = OotDetector::new();
            let scores = detector.score(method, &documents, metric).unwrap();
            assert_eq!(scores.len(), documents.len());
            assert_eq!(
                rank_documents(&scores)[0],
                OFF_TOPIC,
                "{method}/{metric}: {scores:?}"
            );
        }
    }
}

#[test]
fn count_clust_dist_values() {
    // Each post is six distinct tokens. Gardening posts share four tokens,
    // so they sit sqrt(6 + 6 - 2 * 4) = 2 apart; the off-topic post shares
    // none and sits sqrt(12) from everything.
    let mut detector = OotDetector::new();
    let scores = detector.clust_dist(&gardening_corpus(), "euclidean").unwrap();
    let far = 12.0_f64.sqrt();
    let on_topic = (3.0 * 2.0 + far) / 5.0;
    for (i, score) in scores.iter().enumerate() {
        let expected = if i == OFF_TOPIC { 4.0 * far / 5.0 } else { on_topic };
        assert!((score - expected).abs() < 1e-9, "score[{i}] = {score}");
    }
}

#[test]
fn count_txt_comp_dist_values() {
    // Off-topic post vs the other four joined: the shared words appear four
    // times in the complement, eight gardening-only words once, and the
    // post's own six words not at all.
    let mut detector = OotDetector::new();
    let scores = detector.txt_comp_dist(&gardening_corpus(), "euclidean").unwrap();
    let expected = (4.0 * 16.0 + 8.0 + 6.0_f64).sqrt();
    assert!((scores[OFF_TOPIC] - expected).abs() < 1e-9, "{scores:?}");
}

#[test]
fn detector_is_reusable_across_corpora() {
    let mut detector = OotDetector::new();
    let first = detector.mean_comp(&gardening_corpus(), "euclidean").unwrap();

    let other = vec!["alpha beta".to_string(), "gamma delta epsilon".to_string()];
    detector.mean_comp(&other, "euclidean").unwrap();

    // Refit replaced the vocabulary; scoring the first corpus again gives
    // the same answer
    let again = detector.mean_comp(&gardening_corpus(), "euclidean").unwrap();
    assert_eq!(first, again);
}

// ============================================================
// Readability extractor
// ============================================================

#[test]
fn readability_flags_dense_prose() {
    let documents: Vec<String> = [
        "I like my dog. He runs fast. We play ball.",
        "My cat is big. She naps a lot. I pet her.",
        "We go to the park. The sun is out. It is fun.",
        "Comprehensive epistemological reevaluation necessitates interdisciplinary \
         institutional collaboration amongst organizational stakeholders notwithstanding.",
        "The bus was late. I had to wait. Then it came.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut detector = OotDetector::with_extractor(Box::new(ReadabilityMeasures::new()));
    for method in [ScoringMethod::ClustDist, ScoringMethod::MeanComp] {
        let scores = detector.score(method, &documents, "euclidean").unwrap();
        assert_eq!(rank_documents(&scores)[0], 3, "{method}: {scores:?}");
    }
}

// ============================================================
// Config -> detector -> report
// ============================================================

#[test]
fn config_built_detector_scores_and_reports() {
    let config = Config {
        extractor: ExtractorKind::Count,
        metric: Metric::Cityblock,
        method: ScoringMethod::MeanComp,
        ..Config::default()
    };
    let dir = tempfile::tempdir().unwrap();
    for (i, text) in gardening_corpus().iter().enumerate() {
        fs::write(dir.path().join(format!("post{i}.txt")), text).unwrap();
    }

    let corpus = load_corpus(dir.path()).unwrap();
    let mut detector = config.build_detector();
    let scores = detector
        .score(config.method, &corpus.texts(), config.metric.name())
        .unwrap();

    let report = ScoreReport::new(&corpus, &scores, config.method, config.metric, "count");
    assert_eq!(report.documents[0].name, "post4.txt");
    assert_eq!(report.documents[0].rank, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["documents"].as_array().unwrap().len(), 5);
    assert_eq!(json["documents"][0]["name"], "post4.txt");
}

#[test]
fn evaluation_of_scored_corpus() {
    let mut detector = OotDetector::new();
    let scores = detector.mean_comp(&gardening_corpus(), "euclidean").unwrap();
    let mut labels = vec![false; 5];
    labels[OFF_TOPIC] = true;

    let eval = TopListEvaluation::compute(&scores, &labels, 1).unwrap();
    assert_eq!(eval.hits, 1);
    assert_eq!(eval.top_indices, vec![OFF_TOPIC]);
    assert!((eval.precision - 1.0).abs() < 1e-12);
    assert!((eval.expected_hits - 0.2).abs() < 1e-12);
}

// ============================================================
// Corpus loading
// ============================================================

#[test]
fn corpus_dir_is_sorted_and_skips_hidden_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "second post").unwrap();
    fs::write(dir.path().join("a.txt"), "first post").unwrap();
    fs::write(dir.path().join(".DS_Store"), "junk").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let corpus = load_corpus_dir(dir.path()).unwrap();
    assert_eq!(corpus.names(), vec!["a.txt", "b.txt"]);
    assert_eq!(corpus.texts(), vec!["first post", "second post"]);
    assert_eq!(corpus.position("b.txt"), Some(1));
}

#[test]
fn corpus_dir_empty_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_corpus_dir(dir.path()).is_err());
}

#[test]
fn corpus_file_splits_on_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thread.txt");
    fs::write(&path, "first reply\nwith two lines\n\nsecond reply\n\n\nthird\n").unwrap();

    let corpus = load_corpus_file(&path).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.names(), vec!["#1", "#2", "#3"]);
    assert_eq!(corpus.documents[0].text, "first reply\nwith two lines");

    let via_dispatch = load_corpus(&path).unwrap();
    assert_eq!(via_dispatch, corpus);
}

#[test]
fn missing_corpus_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_corpus(&dir.path().join("nope.txt")).is_err());
}
