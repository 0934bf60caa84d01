//! TruthLens: product trust scoring
//!
//! This library fuses review sentiment, fake-review suspicion, price fairness
//! and image quality into a single 0-10 trust score for a product.

pub mod analyzer;
pub mod config;
pub mod reporter;
pub mod text;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The main result of analyzing a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    /// Path to the analyzed product file (None for manual entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Product display name
    pub product_name: String,
    /// Category the price was judged against
    pub category: Category,
    /// Overall trust score (0-10, one decimal)
    pub overall: f64,
    pub sentiment: SentimentResult,
    pub fake_reviews: FakeReviewResult,
    pub price_fairness: PriceFairnessResult,
    pub image_quality: ImageQualityResult,
    /// Informational review statistics (not part of the overall score)
    pub insights: ReviewInsights,
}

/// Product category used for baseline price lookup
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "String")]
pub enum Category {
    Electronics,
    Laptop,
    Smartphone,
    Headphones,
    Home,
    Clothing,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Laptop,
        Category::Smartphone,
        Category::Headphones,
        Category::Home,
        Category::Clothing,
        Category::Other,
    ];

    /// Parse a category name. Unrecognized names fall back to `Other`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Category::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Laptop => "Laptop",
            Category::Smartphone => "Smartphone",
            Category::Headphones => "Headphones",
            Category::Home => "Home",
            Category::Clothing => "Clothing",
            Category::Other => "Other",
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::parse(&name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-review sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Map a raw model label (e.g. "POSITIVE", "LABEL_1", "neg") onto a label
    pub fn from_model_label(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        if upper.contains("POSITIVE") || upper.contains("LABEL_1") {
            SentimentLabel::Positive
        } else if upper.contains("NEGATIVE") || upper.contains("LABEL_0") {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
            SentimentLabel::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Aggregated sentiment for one review batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// Share of positive reviews scaled to 0-10
    pub overall_score: f64,
    /// Count per label; all three labels are always present
    pub sentiment_counts: BTreeMap<SentimentLabel, usize>,
    pub reviews_analyzed: usize,
    /// Wall-clock labeling time in seconds
    pub inference_time: f64,
    /// Device reported by the labeler ("CPU", "GPU", ...)
    pub device: String,
    /// Name of the labeler that produced the labels
    pub source: String,
}

impl SentimentResult {
    pub fn count(&self, label: SentimentLabel) -> usize {
        self.sentiment_counts.get(&label).copied().unwrap_or(0)
    }
}

/// Fake review detection outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeReviewResult {
    /// Probability-like suspicion score (0-100, two decimals)
    pub fake_score: f64,
    /// Reviews matching at least one suspicious pattern
    pub flagged_count: usize,
    pub total_reviews: usize,
    /// Whether the learned classifier contributed to the score
    pub model_available: bool,
}

/// Price fairness verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FairnessLabel {
    Undervalued,
    Fair,
    Overpriced,
}

impl FairnessLabel {
    /// Classify a signed percent deviation from the baseline
    pub fn from_deviation(deviation_pct: f64) -> Self {
        if deviation_pct < -20.0 {
            FairnessLabel::Undervalued
        } else if deviation_pct <= 20.0 {
            FairnessLabel::Fair
        } else {
            FairnessLabel::Overpriced
        }
    }
}

impl std::fmt::Display for FairnessLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FairnessLabel::Undervalued => write!(f, "Undervalued"),
            FairnessLabel::Fair => write!(f, "Fair"),
            FairnessLabel::Overpriced => write!(f, "Overpriced"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFairnessResult {
    pub label: FairnessLabel,
    /// Signed percent deviation from the adjusted baseline
    pub score: f64,
    /// Baseline after specs adjustment
    pub baseline: f64,
}

/// Raw image metrics computed by an external image library
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
    /// Variance of the Laplacian of the grayscale image (blur measure)
    pub laplacian_variance: f64,
    /// Mean grayscale intensity (0-255)
    pub brightness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQualityResult {
    pub has_image: bool,
    /// Quality score (0-10)
    pub quality_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ImageMetrics>,
}

impl ImageQualityResult {
    pub fn absent() -> Self {
        Self {
            has_image: false,
            quality_score: 0,
            metrics: None,
        }
    }
}

/// Durability risk derived from complaint keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurabilityRisk {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for DurabilityRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurabilityRisk::Low => write!(f, "Low"),
            DurabilityRisk::Medium => write!(f, "Medium"),
            DurabilityRisk::High => write!(f, "High"),
        }
    }
}

/// Review statistics shown next to the score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInsights {
    pub durability_risk: DurabilityRisk,
    /// "High Risk" when the fake score exceeds 50, else "Low Risk"
    pub fake_risk: String,
    pub average_words: f64,
    pub shortest_words: usize,
    pub longest_words: usize,
    /// Most frequent non-stop-word terms
    pub top_terms: Vec<String>,
}

/// Product price as found in a product file: a number or a currency string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Amount(f64),
    Text(String),
}

impl PriceValue {
    /// Numeric price; unparseable text and negative amounts become 0.0
    pub fn amount(&self) -> f64 {
        let value = match self {
            PriceValue::Amount(v) => *v,
            PriceValue::Text(s) => text::parse_price(s),
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

impl Default for PriceValue {
    fn default() -> Self {
        PriceValue::Amount(0.0)
    }
}

/// Image information attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageInput {
    /// Score already computed upstream; clamped into 0-10 when assessed
    #[serde(rename_all = "camelCase")]
    Score { quality_score: i64 },
    /// Raw metrics to be scored
    Metrics(ImageMetrics),
}

/// One product to analyze, as read from a `*.product.json` file or built
/// from manual entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub price: PriceValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub reviews: Vec<String>,
    /// Newline-separated reviews (manual entry)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
}

impl ProductInput {
    /// All non-empty reviews, structured ones first, then pasted lines
    pub fn review_list(&self) -> Vec<String> {
        let mut reviews: Vec<String> = self
            .reviews
            .iter()
            .map(|r| text::clean_text(r))
            .filter(|r| !r.is_empty())
            .collect();
        if let Some(ref pasted) = self.reviews_text {
            reviews.extend(text::split_reviews(pasted));
        }
        reviews
    }

    /// Display name, falling back to the URL or a placeholder
    pub fn display_name(&self) -> String {
        let name = text::clean_text(&self.name);
        if !name.is_empty() {
            name
        } else if let Some(ref url) = self.url {
            url.clone()
        } else {
            "Unknown Product".to_string()
        }
    }
}
