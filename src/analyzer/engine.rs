//! Analysis engine - runs every analyzer over a product and fuses the result

use crate::config::{Config, EffectiveConfig};
use crate::{FairnessLabel, ProductInput, ProductReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::classifier::{ReviewClassifier, TfidfReviewClassifier};
use super::fake_review::{FakeReviewDetector, SuspiciousPatterns};
use super::pricing::PriceTable;
use super::sentiment::{SentimentAnalyzer, SentimentModel};
use super::{image, insights, round_to, ScoreCalculator};

/// Train the built-in fake review classifier. Returns None (heuristics only)
/// if training fails.
pub fn default_classifier() -> Option<Arc<dyn ReviewClassifier>> {
    match TfidfReviewClassifier::train_default() {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            log::warn!("fake review classifier unavailable: {}", e);
            None
        }
    }
}

/// Main analysis engine that orchestrates all analyzers
pub struct AnalysisEngine {
    sentiment: SentimentAnalyzer,
    fake_detector: FakeReviewDetector,
    price_table: PriceTable,
}

impl AnalysisEngine {
    /// Create an engine with built-in tables and a freshly trained classifier
    pub fn new() -> Self {
        Self::with_parts(
            PriceTable::new(),
            SuspiciousPatterns::default(),
            default_classifier(),
        )
    }

    /// Create an engine from config tables, sharing an already trained classifier
    pub fn from_config(
        config: &Config,
        classifier: Option<Arc<dyn ReviewClassifier>>,
    ) -> Result<Self> {
        let patterns = config.suspicious_patterns()?;
        Ok(Self::with_parts(config.price_table(), patterns, classifier))
    }

    pub fn with_parts(
        price_table: PriceTable,
        patterns: SuspiciousPatterns,
        classifier: Option<Arc<dyn ReviewClassifier>>,
    ) -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(),
            fake_detector: FakeReviewDetector::new(patterns, classifier),
            price_table,
        }
    }

    /// Use an external sentiment model, keeping the lexicon as fallback
    pub fn with_sentiment_model(mut self, model: Box<dyn SentimentModel>) -> Self {
        self.sentiment = self.sentiment.with_model(model);
        self
    }

    /// Analyze a product file and return the result
    pub fn analyze(&self, product_path: &Path, config: Option<&Config>) -> Result<ProductReport> {
        let content = fs::read_to_string(product_path)
            .with_context(|| format!("Failed to read product file: {}", product_path.display()))?;
        let product: ProductInput = serde_json::from_str(&content)
            .with_context(|| format!("Invalid product JSON: {}", product_path.display()))?;

        let effective = config
            .map(|c| c.effective_for_file(product_path))
            .unwrap_or_default();

        log::debug!("analyzing {}", product_path.display());
        let mut report = self.analyze_product(&product, &effective);
        report.file_path = Some(product_path.to_path_buf());
        Ok(report)
    }

    /// Analyze an in-memory product (manual entry). Never fails: missing
    /// data degrades to neutral contributions.
    pub fn analyze_product(
        &self,
        product: &ProductInput,
        effective: &EffectiveConfig,
    ) -> ProductReport {
        let reviews = product.review_list();
        let category = product.category.unwrap_or(effective.default_category);

        let sentiment = self.sentiment.analyze(&reviews);
        let fake_reviews = self.fake_detector.detect(&reviews);
        let price_fairness =
            self.price_table
                .evaluate(product.price.amount(), category, &product.specs);
        let image_quality = image::assess(product.image.as_ref());

        let overall = ScoreCalculator::overall(
            sentiment.overall_score,
            fake_reviews.fake_score,
            price_fairness.label,
            image_quality.quality_score as f64,
        );

        let insights = insights::summarize(&reviews, fake_reviews.fake_score);

        ProductReport {
            file_path: None,
            product_name: product.display_name(),
            category,
            overall,
            sentiment,
            fake_reviews,
            price_fairness,
            image_quality,
            insights,
        }
    }

    /// Analyze multiple product files sequentially
    pub fn analyze_many(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<ProductReport>> {
        paths.iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Analyze multiple product files in parallel using rayon
    pub fn analyze_parallel(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<ProductReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[ProductReport]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total: f64 = results.iter().map(|r| r.overall).sum();

        AggregateStats {
            products_analyzed: results.len(),
            average_score: round_to(total / results.len() as f64, 1),
            total_reviews: results.iter().map(|r| r.sentiment.reviews_analyzed).sum(),
            overpriced: results
                .iter()
                .filter(|r| r.price_fairness.label == FairnessLabel::Overpriced)
                .count(),
            high_fake_risk: results
                .iter()
                .filter(|r| r.fake_reviews.fake_score > 50.0)
                .count(),
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from multiple product analyses
#[derive(Debug, Default)]
pub struct AggregateStats {
    pub products_analyzed: usize,
    /// Mean overall score (one decimal)
    pub average_score: f64,
    pub total_reviews: usize,
    pub overpriced: usize,
    pub high_fake_risk: usize,
}
