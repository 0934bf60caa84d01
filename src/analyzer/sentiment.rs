//! Review sentiment: pluggable model with a lexicon fallback, scalarized as
//! the share of positive reviews

use crate::{SentimentLabel, SentimentResult};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;

/// Reviews are cut to this many characters before reaching a model
pub const MAX_MODEL_CHARS: usize = 2000;

/// Compound valence at or beyond which a review is polar
const COMPOUND_THRESHOLD: f64 = 0.05;
/// Normalization constant for the compound score
const COMPOUND_ALPHA: f64 = 15.0;
/// Valence multiplier applied after a negation word
const NEGATION_SCALAR: f64 = -0.74;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment model failed: {0}")]
    Inference(String),
    #[error("sentiment model returned {got} labels for {expected} reviews")]
    LabelCount { expected: usize, got: usize },
}

/// External sentiment model (e.g. a transformer pipeline)
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;

    /// Device the model runs on, reported for telemetry only
    fn device(&self) -> &str;

    /// Raw label per review, e.g. "POSITIVE" or "LABEL_0"
    fn classify(&self, reviews: &[String]) -> Result<Vec<String>, SentimentError>;
}

/// Valence lexicon labeler used when no model is available
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    lexicon: BTreeMap<&'static str, f64>,
}

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("broke", -1.8),
    ("broken", -2.1),
    ("cheap", -0.9),
    ("comfortable", 1.6),
    ("dead", -3.3),
    ("decent", 1.4),
    ("defective", -2.2),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("easy", 1.9),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fast", 1.0),
    ("fine", 0.8),
    ("flimsy", -1.6),
    ("garbage", -2.4),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("incredible", 2.6),
    ("junk", -2.1),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("poor", -2.1),
    ("recommend", 1.5),
    ("recommended", 1.6),
    ("refund", -1.0),
    ("reliable", 1.8),
    ("scam", -2.6),
    ("slow", -1.1),
    ("solid", 1.3),
    ("sturdy", 1.4),
    ("terrible", -2.1),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wonderful", 2.7),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wow", 2.8),
];

const NEGATIONS: &[&str] = &[
    "aint", "cannot", "cant", "didnt", "doesnt", "dont", "isnt", "never", "no", "not", "wasnt",
    "wont",
];

impl LexiconSentiment {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Normalized compound valence in [-1, 1]
    pub fn compound(&self, review: &str) -> f64 {
        let words: Vec<String> = review
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let mut sum = 0.0;
        for (i, word) in words.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(word.replace('\'', "").as_str()) else {
                continue;
            };
            // Negation within the three preceding words
            let negated = words[i.saturating_sub(3)..i].iter().any(|w| {
                w.ends_with("n't") || NEGATIONS.contains(&w.replace('\'', "").as_str())
            });
            sum += if negated {
                valence * NEGATION_SCALAR
            } else {
                valence
            };
        }

        if sum == 0.0 {
            0.0
        } else {
            (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
        }
    }

    pub fn label(&self, review: &str) -> SentimentLabel {
        let compound = self.compound(review);
        if compound >= COMPOUND_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= -COMPOUND_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

/// Labels a batch with the model when possible, otherwise with the lexicon
pub struct SentimentAnalyzer {
    model: Option<Box<dyn SentimentModel>>,
    fallback: LexiconSentiment,
}

impl SentimentAnalyzer {
    /// Lexicon-only analyzer
    pub fn new() -> Self {
        Self {
            model: None,
            fallback: LexiconSentiment::new(),
        }
    }

    pub fn with_model(mut self, model: Box<dyn SentimentModel>) -> Self {
        self.model = Some(model);
        self
    }

    fn model_labels(&self, reviews: &[String]) -> Option<(Vec<SentimentLabel>, String, String)> {
        let model = self.model.as_ref()?;
        let truncated: Vec<String> = reviews
            .iter()
            .map(|r| r.chars().take(MAX_MODEL_CHARS).collect())
            .collect();

        let outcome = model.classify(&truncated).and_then(|raw| {
            if raw.len() == reviews.len() {
                Ok(raw)
            } else {
                Err(SentimentError::LabelCount {
                    expected: reviews.len(),
                    got: raw.len(),
                })
            }
        });

        match outcome {
            Ok(raw) => Some((
                raw.iter().map(|l| SentimentLabel::from_model_label(l)).collect(),
                model.name().to_string(),
                model.device().to_string(),
            )),
            Err(e) => {
                log::warn!("{}; falling back to lexicon", e);
                None
            }
        }
    }

    pub fn analyze(&self, reviews: &[String]) -> SentimentResult {
        let start = Instant::now();

        let (labels, source, device) = if reviews.is_empty() {
            (Vec::new(), "none".to_string(), "CPU".to_string())
        } else {
            self.model_labels(reviews).unwrap_or_else(|| {
                (
                    reviews.iter().map(|r| self.fallback.label(r)).collect(),
                    "lexicon".to_string(),
                    "CPU".to_string(),
                )
            })
        };

        let mut result = aggregate(&labels);
        result.inference_time = start.elapsed().as_secs_f64();
        result.device = device;
        result.source = source;
        result
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalarize labels as positive share * 10. Counts always hold all labels.
pub fn aggregate(labels: &[SentimentLabel]) -> SentimentResult {
    let mut counts: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::ALL.iter().map(|l| (*l, 0)).collect();
    for label in labels {
        *counts.entry(*label).or_insert(0) += 1;
    }

    let positive = counts[&SentimentLabel::Positive];
    let overall_score = if labels.is_empty() {
        0.0
    } else {
        positive as f64 / labels.len() as f64 * 10.0
    };

    SentimentResult {
        overall_score,
        sentiment_counts: counts,
        reviews_analyzed: labels.len(),
        inference_time: 0.0,
        device: "CPU".to_string(),
        source: "none".to_string(),
    }
}
