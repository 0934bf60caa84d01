//! Learned fake-review classifier.
//!
//! A TF-IDF vectorizer feeding an L2-regularized logistic regression, trained
//! once from a small labeled corpus and read-only afterwards. The classifier
//! is shared between analyses through `Arc<dyn ReviewClassifier>`.

use crate::text::{is_stop_word, tokenize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by a review classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("training corpus needs both fake and genuine examples")]
    SingleClass,
    #[error("no usable terms in training corpus")]
    EmptyVocabulary,
    #[error("classifier produced a non-finite probability for review {index}")]
    NonFinite { index: usize },
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// A binary text classifier returning the probability that each review is fake
pub trait ReviewClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// One probability in [0, 1] per review, in input order
    fn predict_fake_probabilities(&self, reviews: &[String]) -> Result<Vec<f64>, ClassifierError>;
}

/// Built-in labeled corpus: (review, is_fake)
pub const TRAINING_REVIEWS: &[(&str, bool)] = &[
    ("This product is amazing! Best thing ever bought.", true),
    ("Terrible quality, broke after one use.", false),
    ("I received this product for free in exchange for a review.", true),
    ("Decent product for the price, works as expected.", false),
    ("Five stars! Highly recommended!", true),
    ("Total scam, do not buy.", false),
    ("Great value, fast shipping.", true),
    ("The material feels initially good but wears out quickly.", false),
    ("Wow! Incredible! Life changing!", true),
    ("Okay, serves its purpose.", false),
];

const REGULARIZATION_C: f64 = 1.0;
const LEARNING_RATE: f64 = 0.25;
const MAX_ITERATIONS: usize = 3000;
const TOLERANCE: f64 = 1e-9;

/// Term-frequency / inverse-document-frequency vectorizer with smoothed idf
/// and L2-normalized rows
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit(documents: &[&str]) -> Result<Self, ClassifierError> {
        if documents.is_empty() {
            return Err(ClassifierError::EmptyCorpus);
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut seen: Vec<String> = terms(doc);
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Dense TF-IDF row for one document. Unknown terms are ignored, so a
    /// document sharing no vocabulary maps to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for term in terms(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                row[index] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        row
    }
}

fn terms(document: &str) -> Vec<String> {
    tokenize(document)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// Logistic regression over TF-IDF features
#[derive(Debug, Clone)]
pub struct TfidfReviewClassifier {
    vectorizer: TfidfVectorizer,
    weights: Vec<f64>,
    intercept: f64,
}

impl TfidfReviewClassifier {
    /// Train on the built-in corpus
    pub fn train_default() -> Result<Self, ClassifierError> {
        Self::train(TRAINING_REVIEWS)
    }

    /// Train on a labeled corpus with full-batch gradient descent
    pub fn train(corpus: &[(&str, bool)]) -> Result<Self, ClassifierError> {
        if corpus.is_empty() {
            return Err(ClassifierError::EmptyCorpus);
        }
        if corpus.iter().all(|(_, fake)| *fake) || corpus.iter().all(|(_, fake)| !*fake) {
            return Err(ClassifierError::SingleClass);
        }

        let texts: Vec<&str> = corpus.iter().map(|(text, _)| *text).collect();
        let vectorizer = TfidfVectorizer::fit(&texts)?;
        let rows: Vec<Vec<f64>> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let labels: Vec<f64> = corpus
            .iter()
            .map(|(_, fake)| if *fake { 1.0 } else { 0.0 })
            .collect();

        let dims = vectorizer.vocabulary_len();
        let mut weights = vec![0.0; dims];
        let mut intercept = 0.0;

        // Minimizes 0.5 * |w|^2 + C * sum(log loss); the intercept is not penalized
        for _ in 0..MAX_ITERATIONS {
            let mut grad_w: Vec<f64> = weights.clone();
            let mut grad_b = 0.0;
            for (row, label) in rows.iter().zip(&labels) {
                let p = sigmoid(dot(&weights, row) + intercept);
                let err = REGULARIZATION_C * (p - label);
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += err * x;
                }
                grad_b += err;
            }

            let mut step = grad_b * grad_b;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= LEARNING_RATE * g;
                step += g * g;
            }
            intercept -= LEARNING_RATE * grad_b;

            if step < TOLERANCE {
                break;
            }
        }

        Ok(Self {
            vectorizer,
            weights,
            intercept,
        })
    }

    /// Probability that a single review is fake
    pub fn probability(&self, review: &str) -> f64 {
        let row = self.vectorizer.transform(review);
        sigmoid(dot(&self.weights, &row) + self.intercept)
    }
}

impl ReviewClassifier for TfidfReviewClassifier {
    fn name(&self) -> &'static str {
        "tfidf-logistic"
    }

    fn predict_fake_probabilities(&self, reviews: &[String]) -> Result<Vec<f64>, ClassifierError> {
        reviews
            .iter()
            .enumerate()
            .map(|(index, review)| {
                let p = self.probability(review);
                if p.is_finite() {
                    Ok(p)
                } else {
                    Err(ClassifierError::NonFinite { index })
                }
            })
            .collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
