//! Config schema and deserialization

use crate::analyzer::fake_review::{SuspiciousPatterns, DEFAULT_SUSPICIOUS_PATTERNS};
use crate::analyzer::pricing::PriceTable;
use crate::Category;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Category assumed for matched products that do not name one
    #[serde(default)]
    pub default_category: Option<Category>,
}

/// Root config structure for .truthlensrc.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum overall score (0-10); exit 1 if below
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Category assumed when a product does not name one (default: Other)
    #[serde(default)]
    pub default_category: Option<Category>,

    /// Baseline price overrides keyed by category name
    #[serde(default)]
    pub category_baselines: HashMap<String, f64>,

    /// Specs keywords that raise the baseline
    #[serde(default)]
    pub premium_keywords: Option<Vec<String>>,

    #[serde(default)]
    pub premium_multiplier: Option<f64>,

    /// Specs keywords that lower the baseline
    #[serde(default)]
    pub budget_keywords: Option<Vec<String>>,

    #[serde(default)]
    pub budget_multiplier: Option<f64>,

    /// Suspicious review phrases (regex, case-insensitive). Replaces the
    /// built-in list when non-empty.
    #[serde(default)]
    pub suspicious_patterns: Vec<String>,

    /// Glob patterns for files/directories to exclude from analysis
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Product file suffixes (default: .product.json)
    #[serde(default)]
    pub product_patterns: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extends: None,
            threshold: None,
            default_category: None,
            category_baselines: HashMap::new(),
            premium_keywords: None,
            premium_multiplier: None,
            budget_keywords: None,
            budget_multiplier: None,
            suspicious_patterns: Vec::new(),
            ignore: Vec::new(),
            product_patterns: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            default_category: self.default_category.unwrap_or_default(),
        };

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(category) = override_cfg.default_category {
                    effective.default_category = category;
                }
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        for pattern in patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.default_category.is_none() {
            self.default_category = base.default_category;
        }

        for (category, baseline) in base.category_baselines {
            self.category_baselines.entry(category).or_insert(baseline);
        }

        if self.premium_keywords.is_none() {
            self.premium_keywords = base.premium_keywords;
        }
        if self.premium_multiplier.is_none() {
            self.premium_multiplier = base.premium_multiplier;
        }
        if self.budget_keywords.is_none() {
            self.budget_keywords = base.budget_keywords;
        }
        if self.budget_multiplier.is_none() {
            self.budget_multiplier = base.budget_multiplier;
        }
        if self.suspicious_patterns.is_empty() {
            self.suspicious_patterns = base.suspicious_patterns;
        }

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.product_patterns.is_empty() {
            self.product_patterns = base.product_patterns;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Get product file patterns
    pub fn get_product_patterns(&self) -> Vec<&str> {
        if self.product_patterns.is_empty() {
            vec![".product.json"]
        } else {
            self.product_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Baseline table with this config's overrides applied
    pub fn price_table(&self) -> PriceTable {
        let mut table = PriceTable::new();
        let mut baselines: Vec<(&String, &f64)> = self.category_baselines.iter().collect();
        baselines.sort_by(|a, b| a.0.cmp(b.0));
        for (name, baseline) in baselines {
            let category = Category::parse(name);
            if category == Category::Other && !name.trim().eq_ignore_ascii_case("other") {
                log::warn!("unknown category '{}' in categoryBaselines; ignoring", name);
                continue;
            }
            table = table.with_baseline(category, *baseline);
        }

        if self.premium_keywords.is_some() || self.premium_multiplier.is_some() {
            let defaults = PriceTable::new();
            let keywords = self
                .premium_keywords
                .clone()
                .unwrap_or_else(|| defaults.premium_keywords().to_vec());
            table = table.with_premium(
                keywords,
                self.premium_multiplier.unwrap_or(defaults.premium_multiplier()),
            );
        }
        if self.budget_keywords.is_some() || self.budget_multiplier.is_some() {
            let defaults = PriceTable::new();
            let keywords = self
                .budget_keywords
                .clone()
                .unwrap_or_else(|| defaults.budget_keywords().to_vec());
            table = table.with_budget(
                keywords,
                self.budget_multiplier.unwrap_or(defaults.budget_multiplier()),
            );
        }
        table
    }

    /// Compiled suspicious review patterns
    pub fn suspicious_patterns(&self) -> Result<SuspiciousPatterns> {
        if self.suspicious_patterns.is_empty() {
            SuspiciousPatterns::new(DEFAULT_SUSPICIOUS_PATTERNS)
        } else {
            SuspiciousPatterns::new(&self.suspicious_patterns)
        }
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub threshold: Option<f64>,
    pub default_category: Category,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            default_category: Category::Other,
        }
    }
}
