//! Analyzer module - product trust analysis engine

pub mod classifier;
pub mod engine;
pub mod fake_review;
pub mod image;
pub mod insights;
pub mod pricing;
pub mod scoring;
pub mod sentiment;

pub use classifier::{ClassifierError, ReviewClassifier, TfidfReviewClassifier};
pub use engine::{AggregateStats, AnalysisEngine};
pub use fake_review::{FakeReviewDetector, ModelSignal, SuspiciousPatterns};
pub use pricing::PriceTable;
pub use scoring::ScoreCalculator;
pub use sentiment::{LexiconSentiment, SentimentAnalyzer, SentimentError, SentimentModel};

/// Round half away from zero to a number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
