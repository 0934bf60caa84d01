//! Informational review statistics shown alongside the score

use crate::text::{is_stop_word, tokenize, word_count};
use crate::{DurabilityRisk, ReviewInsights};
use std::collections::HashMap;

/// Phrases that point at a product failing early
pub const DURABILITY_KEYWORDS: &[&str] = &[
    "broke",
    "stopped working",
    "fell apart",
    "dead",
    "cheap",
    "poor quality",
];

const HIGH_DURABILITY_SHARE: f64 = 0.2;
const HIGH_FAKE_SCORE: f64 = 50.0;
const TOP_TERMS: usize = 5;

pub fn durability_risk(reviews: &[String]) -> DurabilityRisk {
    if reviews.is_empty() {
        return DurabilityRisk::Low;
    }
    let complaints = reviews
        .iter()
        .filter(|r| {
            let lower = r.to_lowercase();
            DURABILITY_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .count();
    let share = complaints as f64 / reviews.len() as f64;
    if complaints == 0 {
        DurabilityRisk::Low
    } else if share <= HIGH_DURABILITY_SHARE {
        DurabilityRisk::Medium
    } else {
        DurabilityRisk::High
    }
}

pub fn fake_risk(fake_score: f64) -> &'static str {
    if fake_score > HIGH_FAKE_SCORE {
        "High Risk"
    } else {
        "Low Risk"
    }
}

/// Most frequent terms, ties broken alphabetically
pub fn top_terms(reviews: &[String], limit: usize) -> Vec<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for review in reviews {
        for token in tokenize(review) {
            if !is_stop_word(&token) && !token.chars().all(|c| c.is_ascii_digit()) {
                *freq.entry(token).or_insert(0) += 1;
            }
        }
    }
    let mut terms: Vec<(String, usize)> = freq.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.into_iter().take(limit).map(|(t, _)| t).collect()
}

pub fn summarize(reviews: &[String], fake_score: f64) -> ReviewInsights {
    let lengths: Vec<usize> = reviews.iter().map(|r| word_count(r)).collect();
    let average_words = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    ReviewInsights {
        durability_risk: durability_risk(reviews),
        fake_risk: fake_risk(fake_score).to_string(),
        average_words,
        shortest_words: lengths.iter().copied().min().unwrap_or(0),
        longest_words: lengths.iter().copied().max().unwrap_or(0),
        top_terms: top_terms(reviews, TOP_TERMS),
    }
}
