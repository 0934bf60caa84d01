//! Overall trust score calculation

use super::round_to;
use crate::{DurabilityRisk, FairnessLabel, ProductReport};

/// Weight of the 0-10 sentiment score (max 5 points)
const SENTIMENT_WEIGHT: f64 = 0.5;
/// Points removed at a 100% fake score
const MAX_FAKE_PENALTY: f64 = 2.0;
const FAIR_BONUS: f64 = 2.0;
const UNDERVALUED_BONUS: f64 = 2.5;
const OVERPRICED_BONUS: f64 = 1.0;
/// Points added at image quality 10
const MAX_IMAGE_BONUS: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

/// Calculator for the overall trust score
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Fuse the four component signals into a 0-10 score (one decimal).
    ///
    /// Contributions accumulate unclamped and only the final sum is clamped,
    /// so out-of-range inputs (e.g. a sentiment of 14) still move the result
    /// before the clamp.
    pub fn overall(
        sentiment_score: f64,
        fake_score: f64,
        price_label: FairnessLabel,
        image_quality: f64,
    ) -> f64 {
        let mut score = sentiment_score * SENTIMENT_WEIGHT;
        score -= fake_score / 100.0 * MAX_FAKE_PENALTY;
        score += Self::price_bonus(price_label);
        score += image_quality / 10.0 * MAX_IMAGE_BONUS;

        // NaN inputs would survive clamp; treat them as the floor
        let score = if score.is_nan() { 0.0 } else { score };
        round_to(score.clamp(0.0, MAX_SCORE), 1)
    }

    pub fn price_bonus(label: FairnessLabel) -> f64 {
        match label {
            FairnessLabel::Fair => FAIR_BONUS,
            FairnessLabel::Undervalued => UNDERVALUED_BONUS,
            FairnessLabel::Overpriced => OVERPRICED_BONUS,
        }
    }

    /// Get a description of a score band
    pub fn verdict(overall: f64) -> &'static str {
        if overall >= 8.0 {
            "Trustworthy - strong reviews at a reasonable price"
        } else if overall >= 6.0 {
            "Solid - worth buying with minor reservations"
        } else if overall >= 4.0 {
            "Mixed - compare alternatives before buying"
        } else {
            "Risky - weak or suspicious signals"
        }
    }

    /// Notes on the weakest signals of a report
    pub fn notes(report: &ProductReport) -> Vec<String> {
        let mut notes = Vec::new();

        if report.sentiment.reviews_analyzed == 0 {
            notes.push("No reviews supplied - sentiment and authenticity are unscored".to_string());
        } else if report.sentiment.overall_score < 5.0 {
            notes.push("Fewer than half of the reviews are positive".to_string());
        }

        if report.fake_reviews.fake_score > 50.0 {
            notes.push(format!(
                "High fake review probability ({:.2}%) - read reviews critically",
                report.fake_reviews.fake_score
            ));
        }

        if report.price_fairness.label == FairnessLabel::Overpriced {
            notes.push(format!(
                "Priced {:.1}% above the expected {:.2} for {}",
                report.price_fairness.score, report.price_fairness.baseline, report.category
            ));
        }

        if !report.image_quality.has_image {
            notes.push("No product image analyzed".to_string());
        } else if report.image_quality.quality_score < 5 {
            notes.push("Product image is low quality (blurry, small or poorly lit)".to_string());
        }

        if report.insights.durability_risk == DurabilityRisk::High {
            notes.push("Many reviews mention the product breaking or wearing out".to_string());
        }

        if notes.is_empty() {
            notes.push("All signals look healthy.".to_string());
        }

        notes
    }
}
