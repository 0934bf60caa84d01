//! Configuration loading for TruthLens

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".truthlensrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative or absolute path) to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .truthlensrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert!(config.threshold.is_none());
        assert_eq!(config.get_product_patterns(), vec![".product.json"]);
    }

    #[test]
    fn test_custom_config_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_is_ignored_drafts() {
        let set = build_ignore_set(&["**/drafts/**".to_string()]).unwrap();
        assert!(is_ignored(Path::new("catalog/drafts/lamp.product.json"), &set));
        assert!(!is_ignored(Path::new("catalog/lamp.product.json"), &set));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(build_ignore_set(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CONFIG_FILENAME, r#"{ "threshold": 6.5 }"#);
        let nested = dir.path().join("catalog").join("home");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.threshold, Some(6.5));
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "base.json",
            r#"{
                "threshold": 5,
                "categoryBaselines": { "Laptop": 900, "Home": 60 },
                "ignore": ["**/drafts/**"]
            }"#,
        );
        write(
            dir.path(),
            CONFIG_FILENAME,
            r#"{
                "extends": "./base",
                "threshold": 7,
                "categoryBaselines": { "Home": 75 }
            }"#,
        );

        let config = load_config(dir.path(), None).unwrap();
        // Child threshold overrides base
        assert_eq!(config.threshold, Some(7.0));
        // Child baseline wins, base baseline inherited
        assert_eq!(config.category_baselines.get("Home"), Some(&75.0));
        assert_eq!(config.category_baselines.get("Laptop"), Some(&900.0));
        assert!(config.ignore.contains(&"**/drafts/**".to_string()));

        let table = config.price_table();
        assert_eq!(table.baseline(Category::Home), 75.0);
        assert_eq!(table.baseline(Category::Laptop), 900.0);
    }

    #[test]
    fn test_circular_extends() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{ "extends": "./b.json" }"#);
        write(dir.path(), "b.json", r#"{ "extends": "./a.json" }"#);
        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CONFIG_FILENAME, "{ threshold: ");
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = serde_json::from_str(
            r#"{
                "threshold": 6,
                "overrides": [
                    {
                        "files": ["**/clearance/**"],
                        "threshold": 3.5
                    },
                    {
                        "files": ["**/phones/**"],
                        "defaultCategory": "Smartphone"
                    }
                ]
            }"#,
        )
        .unwrap();

        let effective = config.effective_for_file(Path::new("catalog/lamp.product.json"));
        assert_eq!(effective.threshold, Some(6.0));
        assert_eq!(effective.default_category, Category::Other);

        let effective = config.effective_for_file(Path::new("catalog/clearance/lamp.product.json"));
        assert_eq!(effective.threshold, Some(3.5));

        let effective = config.effective_for_file(Path::new("catalog/phones/x.product.json"));
        assert_eq!(effective.default_category, Category::Smartphone);
    }

    #[test]
    fn test_keyword_overrides_build_table() {
        let config: Config = serde_json::from_str(
            r#"{ "premiumKeywords": ["flagship"], "budgetMultiplier": 0.5 }"#,
        )
        .unwrap();
        let table = config.price_table();
        assert_eq!(table.adjusted_baseline(Category::Smartphone, "Flagship camera"), 900.0);
        assert_eq!(table.adjusted_baseline(Category::Smartphone, "pro camera"), 600.0);
        assert_eq!(table.adjusted_baseline(Category::Smartphone, "budget"), 300.0);
    }

    #[test]
    fn test_custom_suspicious_patterns() {
        let config: Config =
            serde_json::from_str(r#"{ "suspiciousPatterns": ["game changer"] }"#).unwrap();
        let patterns = config.suspicious_patterns().unwrap();
        assert_eq!(patterns.len(), 1);
        assert!(patterns.matches("A total GAME CHANGER"));

        let bad: Config = serde_json::from_str(r#"{ "suspiciousPatterns": ["(oops"] }"#).unwrap();
        assert!(bad.suspicious_patterns().is_err());
    }
}
