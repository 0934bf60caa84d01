//! Price fairness against per-category baselines

use crate::{Category, FairnessLabel, PriceFairnessResult};
use std::collections::HashMap;

/// Specs keywords that scale the baseline, matched as lower-case substrings
#[derive(Debug, Clone)]
pub struct SpecsAdjustment {
    pub keywords: Vec<String>,
    pub multiplier: f64,
}

impl SpecsAdjustment {
    fn applies_to(&self, specs_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && specs_lower.contains(k.as_str()))
    }
}

/// Immutable baseline table used by the fairness evaluator
#[derive(Debug, Clone)]
pub struct PriceTable {
    baselines: HashMap<Category, f64>,
    premium: SpecsAdjustment,
    budget: SpecsAdjustment,
}

impl PriceTable {
    pub fn new() -> Self {
        let baselines = HashMap::from([
            (Category::Electronics, 500.0),
            (Category::Laptop, 800.0),
            (Category::Smartphone, 600.0),
            (Category::Headphones, 150.0),
            (Category::Home, 50.0),
            (Category::Clothing, 30.0),
            (Category::Other, 100.0),
        ]);
        Self {
            baselines,
            premium: SpecsAdjustment {
                keywords: vec!["pro".into(), "premium".into(), "high-end".into()],
                multiplier: 1.5,
            },
            budget: SpecsAdjustment {
                keywords: vec!["budget".into(), "basic".into()],
                multiplier: 0.7,
            },
        }
    }

    /// Override one category baseline. Non-positive or non-finite values are
    /// rejected so the table can never divide by zero.
    pub fn with_baseline(mut self, category: Category, baseline: f64) -> Self {
        if baseline.is_finite() && baseline > 0.0 {
            self.baselines.insert(category, baseline);
        } else {
            log::warn!(
                "ignoring baseline {} for {}: must be a positive number",
                baseline,
                category
            );
        }
        self
    }

    pub fn with_premium(mut self, keywords: Vec<String>, multiplier: f64) -> Self {
        if let Some(m) = valid_multiplier(multiplier, "premium") {
            self.premium = SpecsAdjustment {
                keywords: lowercase_all(keywords),
                multiplier: m,
            };
        }
        self
    }

    pub fn with_budget(mut self, keywords: Vec<String>, multiplier: f64) -> Self {
        if let Some(m) = valid_multiplier(multiplier, "budget") {
            self.budget = SpecsAdjustment {
                keywords: lowercase_all(keywords),
                multiplier: m,
            };
        }
        self
    }

    pub fn premium_keywords(&self) -> &[String] {
        &self.premium.keywords
    }

    pub fn premium_multiplier(&self) -> f64 {
        self.premium.multiplier
    }

    pub fn budget_keywords(&self) -> &[String] {
        &self.budget.keywords
    }

    pub fn budget_multiplier(&self) -> f64 {
        self.budget.multiplier
    }

    /// Baseline for a category before specs adjustment
    pub fn baseline(&self, category: Category) -> f64 {
        self.baselines
            .get(&category)
            .or_else(|| self.baselines.get(&Category::Other))
            .copied()
            .unwrap_or(100.0)
    }

    /// Baseline after applying the premium and budget keyword multipliers
    pub fn adjusted_baseline(&self, category: Category, specs: &str) -> f64 {
        let specs_lower = specs.to_lowercase();
        let mut baseline = self.baseline(category);
        if self.premium.applies_to(&specs_lower) {
            baseline *= self.premium.multiplier;
        }
        if self.budget.applies_to(&specs_lower) {
            baseline *= self.budget.multiplier;
        }
        baseline
    }

    /// Judge a price against the adjusted category baseline
    pub fn evaluate(&self, price: f64, category: Category, specs: &str) -> PriceFairnessResult {
        let baseline = self.adjusted_baseline(category, specs);
        let deviation = (price - baseline) / baseline * 100.0;
        PriceFairnessResult {
            label: FairnessLabel::from_deviation(deviation),
            score: deviation,
            baseline,
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_multiplier(multiplier: f64, which: &str) -> Option<f64> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Some(multiplier)
    } else {
        log::warn!("ignoring {} multiplier {}: must be positive", which, multiplier);
        None
    }
}

fn lowercase_all(keywords: Vec<String>) -> Vec<String> {
    keywords.into_iter().map(|k| k.to_lowercase()).collect()
}
