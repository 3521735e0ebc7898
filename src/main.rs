use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use otdet::config::{Config, ExtractorKind};
use otdet::corpus::load_corpus;
use otdet::detector::ScoringMethod;
use otdet::evaluation::TopListEvaluation;
use otdet::metric::Metric;
use otdet::output::{terminal, ScoreReport};

/// otdet: find the out-of-topic documents in a small corpus.
///
/// Every document gets a score; the further a document sits from the rest of
/// the corpus, the higher its score.
#[derive(Parser)]
#[command(name = "otdet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every document in a corpus and rank them
    Score {
        /// Directory (one document per file) or file (blank-line separated)
        path: PathBuf,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Score a corpus and check the top list against known OOT documents
    Evaluate {
        /// Directory (one document per file) or file (blank-line separated)
        path: PathBuf,

        /// Name of a document known to be out of topic (repeatable)
        #[arg(long = "oot", required = true)]
        oot: Vec<String>,

        /// Size of the top list (default: 3)
        #[arg(long, default_value = "3")]
        top_k: usize,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// List the available distance metrics
    Metrics,
}

/// Options shared by every scoring command. Unset options fall back to the
/// OTDET_* environment variables, then to the built-in defaults.
#[derive(Args)]
struct ScoringArgs {
    /// clust-dist, mean-comp or txt-comp-dist
    #[arg(long)]
    method: Option<ScoringMethod>,

    /// Distance metric name (see `otdet metrics`)
    #[arg(long)]
    metric: Option<String>,

    /// count or readability
    #[arg(long)]
    extractor: Option<ExtractorKind>,

    /// Drop English stop words before counting tokens
    #[arg(long)]
    stop_words: bool,

    /// Keep English stop words, overriding OTDET_STOP_WORDS
    #[arg(long, conflicts_with = "stop_words")]
    no_stop_words: bool,
}

impl ScoringArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(name) = &self.metric {
            config.metric = name.parse::<Metric>()?;
        }
        if let Some(extractor) = self.extractor {
            config.extractor = extractor;
        }
        if self.stop_words {
            config.stop_words = true;
        } else if self.no_stop_words {
            config.stop_words = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("otdet=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            path,
            scoring,
            json,
        } => {
            let config = scoring.apply(Config::load()?)?;
            let corpus = load_corpus(&path)?;

            let mut detector = config.build_detector();
            let scores = detector.score(config.method, &corpus.texts(), config.metric.name())?;

            let report = ScoreReport::new(
                &corpus,
                &scores,
                config.method,
                config.metric,
                config.extractor.as_str(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_scores(&report, &corpus);
            }
        }

        Commands::Evaluate {
            path,
            oot,
            top_k,
            scoring,
        } => {
            let config = scoring.apply(Config::load()?)?;
            let corpus = load_corpus(&path)?;

            let mut is_oot = vec![false; corpus.len()];
            for name in &oot {
                match corpus.position(name) {
                    Some(i) => is_oot[i] = true,
                    None => anyhow::bail!(
                        "No document named '{name}' in {}. Known documents: {}",
                        path.display(),
                        corpus.names().join(", ")
                    ),
                }
            }

            let mut detector = config.build_detector();
            let scores = detector.score(config.method, &corpus.texts(), config.metric.name())?;

            let eval = TopListEvaluation::compute(&scores, &is_oot, top_k)?;
            info!(
                method = %config.method,
                metric = %config.metric,
                hits = eval.hits,
                top_k = eval.top_k,
                "Evaluated top list"
            );

            terminal::display_evaluation(&eval, &corpus);
            if eval.top_k < top_k {
                println!(
                    "{}",
                    format!("Note: top list clamped to the corpus size ({}).", eval.top_k)
                        .dimmed()
                );
            }
        }

        Commands::Metrics => {
            terminal::display_metrics();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoring_args(args: &[&str]) -> ScoringArgs {
        let argv = ["otdet", "score", "corpus"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Score { scoring, .. } => scoring,
            _ => unreachable!("parsed a score command"),
        }
    }

    fn stop_words_on() -> Config {
        Config {
            stop_words: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_no_stop_words_overrides_env() {
        let config = scoring_args(&["--no-stop-words"])
            .apply(stop_words_on())
            .unwrap();
        assert!(!config.stop_words);
    }

    #[test]
    fn test_stop_words_flag_turns_removal_on() {
        let config = scoring_args(&["--stop-words"]).apply(Config::default()).unwrap();
        assert!(config.stop_words);
    }

    #[test]
    fn test_stop_words_untouched_without_flags() {
        assert!(scoring_args(&[]).apply(stop_words_on()).unwrap().stop_words);
        assert!(!scoring_args(&[]).apply(Config::default()).unwrap().stop_words);
    }

    #[test]
    fn test_stop_word_flags_conflict() {
        let argv = ["otdet", "score", "corpus", "--stop-words", "--no-stop-words"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_cli_overrides_method_and_metric() {
        let config = scoring_args(&["--method", "mean-comp", "--metric", "l1"])
            .apply(Config::default())
            .unwrap();
        assert_eq!(config.method, ScoringMethod::MeanComp);
        assert_eq!(config.metric, Metric::Cityblock);
    }
}
