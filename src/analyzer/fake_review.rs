//! Fake review detection: suspicious-phrase heuristics soft-voted with a
//! learned classifier

use super::classifier::ReviewClassifier;
use super::round_to;
use crate::text::word_count;
use crate::FakeReviewResult;
use anyhow::{Context, Result};
use regex::{RegexSet, RegexSetBuilder};
use std::sync::Arc;

/// Default suspicious phrases (case-insensitive regexes)
pub const DEFAULT_SUSPICIOUS_PATTERNS: &[&str] = &[
    r"highly recommend",
    r"best product ever",
    r"received for free",
    r"exchange for a review",
    r"wow",
    r"amazing",
    r"five stars",
];

/// Reviews with fewer words than this count as short
const SHORT_REVIEW_WORDS: usize = 5;
const PATTERN_WEIGHT: f64 = 1.0;
const SHORT_REVIEW_WEIGHT: f64 = 0.5;
const HEURISTIC_SHARE: f64 = 0.6;
const MODEL_SHARE: f64 = 0.4;

/// Output of the learned half of the vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelSignal {
    /// Mean fake probability across the batch (0-1)
    Available(f64),
    /// Classifier missing or failed; contributes nothing
    Unavailable,
}

impl ModelSignal {
    pub fn percent(&self) -> f64 {
        match self {
            ModelSignal::Available(p) => p * 100.0,
            ModelSignal::Unavailable => 0.0,
        }
    }
}

/// Compiled suspicious phrase set
#[derive(Debug, Clone)]
pub struct SuspiciousPatterns {
    set: RegexSet,
}

impl SuspiciousPatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()
            .context("Invalid suspicious review pattern")?;
        Ok(Self { set })
    }

    pub fn matches(&self, review: &str) -> bool {
        self.set.is_match(review)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for SuspiciousPatterns {
    fn default() -> Self {
        // The built-in patterns are plain literals
        Self::new(DEFAULT_SUSPICIOUS_PATTERNS).expect("default patterns compile")
    }
}

/// Rule-based half of the vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicScore {
    /// Sum of per-review increments
    pub count: f64,
    /// Reviews matching a suspicious pattern
    pub flagged: usize,
    /// count / total * 100 (may exceed 100)
    pub score: f64,
}

/// Detector combining phrase heuristics with an optional shared classifier
#[derive(Clone)]
pub struct FakeReviewDetector {
    patterns: SuspiciousPatterns,
    classifier: Option<Arc<dyn ReviewClassifier>>,
}

impl FakeReviewDetector {
    pub fn new(patterns: SuspiciousPatterns, classifier: Option<Arc<dyn ReviewClassifier>>) -> Self {
        Self {
            patterns,
            classifier,
        }
    }

    /// Detector without a learned model (heuristics only)
    pub fn heuristic_only(patterns: SuspiciousPatterns) -> Self {
        Self::new(patterns, None)
    }

    pub fn heuristic(&self, reviews: &[String]) -> HeuristicScore {
        let mut count = 0.0;
        let mut flagged = 0;
        for review in reviews {
            if self.patterns.matches(review) {
                count += PATTERN_WEIGHT;
                flagged += 1;
            }
            if word_count(review) < SHORT_REVIEW_WORDS {
                count += SHORT_REVIEW_WEIGHT;
            }
        }
        let score = if reviews.is_empty() {
            0.0
        } else {
            count / reviews.len() as f64 * 100.0
        };
        HeuristicScore {
            count,
            flagged,
            score,
        }
    }

    pub fn model_signal(&self, reviews: &[String]) -> ModelSignal {
        let Some(ref classifier) = self.classifier else {
            return ModelSignal::Unavailable;
        };
        if reviews.is_empty() {
            return ModelSignal::Unavailable;
        }
        match classifier.predict_fake_probabilities(reviews) {
            Ok(probs) if probs.len() == reviews.len() && probs.iter().all(|p| p.is_finite()) => {
                let mean = probs.iter().sum::<f64>() / probs.len() as f64;
                ModelSignal::Available(mean.clamp(0.0, 1.0))
            }
            Ok(probs) if probs.len() == reviews.len() => {
                log::warn!(
                    "{} returned non-finite probabilities; ignoring model",
                    classifier.name()
                );
                ModelSignal::Unavailable
            }
            Ok(probs) => {
                log::warn!(
                    "{} returned {} probabilities for {} reviews; ignoring model",
                    classifier.name(),
                    probs.len(),
                    reviews.len()
                );
                ModelSignal::Unavailable
            }
            Err(e) => {
                log::warn!("{} failed, scoring heuristics only: {}", classifier.name(), e);
                ModelSignal::Unavailable
            }
        }
    }

    /// Score a review batch (0-100, two decimals)
    pub fn detect(&self, reviews: &[String]) -> FakeReviewResult {
        if reviews.is_empty() {
            return FakeReviewResult {
                fake_score: 0.0,
                flagged_count: 0,
                total_reviews: 0,
                model_available: false,
            };
        }

        let heuristic = self.heuristic(reviews);
        let model = self.model_signal(reviews);
        let blended = heuristic.score * HEURISTIC_SHARE + model.percent() * MODEL_SHARE;

        FakeReviewResult {
            fake_score: round_to(blended.clamp(0.0, 100.0), 2),
            flagged_count: heuristic.flagged,
            total_reviews: reviews.len(),
            model_available: matches!(model, ModelSignal::Available(_)),
        }
    }
}

impl std::fmt::Debug for FakeReviewDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeReviewDetector")
            .field("patterns", &self.patterns.len())
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}
