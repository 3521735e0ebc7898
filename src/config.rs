use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::detector::{OotDetector, ScoringMethod, DEFAULT_SEPARATOR};
use crate::features::count::CountVectorizer;
use crate::features::readability::ReadabilityMeasures;
use crate::features::traits::FeatureExtractor;
use crate::metric::Metric;

/// Which feature extractor the detector is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    /// Raw token counts (default)
    #[default]
    Count,
    /// Readability indices and text statistics
    Readability,
}

impl ExtractorKind {
    /// Build a fresh extractor of this kind.
    ///
    /// `remove_stop_words` only affects the count extractor.
    pub fn build(&self, remove_stop_words: bool) -> Box<dyn FeatureExtractor> {
        match self {
            ExtractorKind::Count if remove_stop_words => Box::new(CountVectorizer::with_stop_words()),
            ExtractorKind::Count => Box::new(CountVectorizer::new()),
            ExtractorKind::Readability => Box::new(ReadabilityMeasures::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Count => "count",
            ExtractorKind::Readability => "readability",
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "counts" | "bow" => Ok(ExtractorKind::Count),
            "readability" => Ok(ExtractorKind::Readability),
            other => anyhow::bail!("Unknown extractor '{other}' (expected count or readability)"),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every field has a
/// default, and command-line flags override what is set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// OTDET_EXTRACTOR
    pub extractor: ExtractorKind,
    /// OTDET_METRIC
    pub metric: Metric,
    /// OTDET_METHOD
    pub method: ScoringMethod,
    /// OTDET_SEPARATOR: joins the other documents in txt-comp-dist
    pub separator: String,
    /// OTDET_STOP_WORDS: drop English stop words in the count extractor
    pub stop_words: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::default(),
            metric: Metric::default(),
            method: ScoringMethod::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            stop_words: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults; set-but-invalid ones are an
    /// error rather than a silent default.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(raw) = lookup("OTDET_EXTRACTOR") {
            config.extractor = raw.parse::<ExtractorKind>().context("Invalid OTDET_EXTRACTOR")?;
        }
        if let Some(raw) = lookup("OTDET_METRIC") {
            config.metric = raw.parse::<Metric>().context("Invalid OTDET_METRIC")?;
        }
        if let Some(raw) = lookup("OTDET_METHOD") {
            config.method = raw.parse::<ScoringMethod>().context("Invalid OTDET_METHOD")?;
        }
        if let Some(raw) = lookup("OTDET_SEPARATOR") {
            config.separator = unescape(&raw);
        }
        if let Some(raw) = lookup("OTDET_STOP_WORDS") {
            config.stop_words = parse_bool(&raw)
                .with_context(|| format!("Invalid OTDET_STOP_WORDS: {raw}"))?;
        }

        Ok(config)
    }

    /// Build a detector with this configuration's extractor and separator.
    pub fn build_detector(&self) -> OotDetector {
        OotDetector::with_extractor(self.extractor.build(self.stop_words))
            .with_separator(self.separator.clone())
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => anyhow::bail!("expected true or false"),
    }
}

/// Allow `\n` and `\t` escapes so a separator like a blank line can be set
/// from a .env file.
fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}
