//! Edge cases: sparse, malformed or extreme product files.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use truthlens::analyzer::{AnalysisEngine, PriceTable, SuspiciousPatterns};
use truthlens::{Category, FairnessLabel, ProductReport};

fn write_product(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn analyze_json(content: &str) -> ProductReport {
    let dir = TempDir::new().unwrap();
    let path = write_product(&dir, "item.product.json", content);
    AnalysisEngine::new()
        .analyze(&path, None)
        .unwrap_or_else(|e| panic!("analysis failed: {}", e))
}

#[test]
fn empty_object_gets_neutral_defaults() {
    let r = analyze_json("{}");
    assert_eq!(r.product_name, "Unknown Product");
    assert_eq!(r.category, Category::Other);
    assert_eq!(r.sentiment.reviews_analyzed, 0);
    assert_eq!(r.fake_reviews.fake_score, 0.0);
    assert!(!r.fake_reviews.model_available);
    assert!(!r.image_quality.has_image);
    assert_eq!(r.price_fairness.label, FairnessLabel::Undervalued);
    assert_eq!(r.overall, 2.5);
}

#[test]
fn url_used_when_name_missing() {
    let r = analyze_json(r#"{ "url": "https://shop.example.com/p/42", "price": 100 }"#);
    assert_eq!(r.product_name, "https://shop.example.com/p/42");
    assert_eq!(r.price_fairness.label, FairnessLabel::Fair);
}

#[test]
fn unknown_category_falls_back_to_other() {
    let r = analyze_json(r#"{ "price": 130, "category": "Garden Gnomes" }"#);
    assert_eq!(r.category, Category::Other);
    assert_eq!(r.price_fairness.baseline, 100.0);
    assert_eq!(r.price_fairness.label, FairnessLabel::Overpriced);
}

#[test]
fn unparseable_price_counts_as_zero() {
    let r = analyze_json(r#"{ "price": "call for price", "category": "Laptop" }"#);
    assert!((r.price_fairness.score + 100.0).abs() < 1e-9);
    assert_eq!(r.price_fairness.label, FairnessLabel::Undervalued);
}

#[test]
fn currency_string_with_separators() {
    let r = analyze_json(r#"{ "price": "₹1,499.00", "category": "Electronics" }"#);
    // 1499 vs 500
    assert_eq!(r.price_fairness.label, FairnessLabel::Overpriced);
}

#[test]
fn blank_reviews_are_dropped() {
    let r = analyze_json(r#"{ "reviews": ["", "   ", "Nice and solid lamp for the price"] }"#);
    assert_eq!(r.sentiment.reviews_analyzed, 1);
    assert_eq!(r.fake_reviews.total_reviews, 1);
}

#[test]
fn very_long_review_is_handled() {
    let review = "great ".repeat(5000);
    let content = serde_json::json!({ "reviews": [review] }).to_string();
    let r = analyze_json(&content);
    assert_eq!(r.sentiment.overall_score, 10.0);
    assert!(r.fake_reviews.fake_score <= 100.0);
    assert!(r.overall <= 10.0);
}

#[test]
fn direct_image_score_is_capped() {
    let r = analyze_json(r#"{ "image": { "qualityScore": 200 } }"#);
    assert!(r.image_quality.has_image);
    assert_eq!(r.image_quality.quality_score, 10);
}

#[test]
fn direct_image_score_beyond_byte_range_is_clamped() {
    let high = analyze_json(r#"{ "image": { "qualityScore": 5000 } }"#);
    assert!(high.image_quality.has_image);
    assert_eq!(high.image_quality.quality_score, 10);

    let negative = analyze_json(r#"{ "image": { "qualityScore": -4 } }"#);
    assert!(negative.image_quality.has_image);
    assert_eq!(negative.image_quality.quality_score, 0);
}

#[test]
fn dark_blurry_image_scores_resolution_only() {
    let r = analyze_json(
        r#"{ "image": { "width": 2000, "height": 1000, "laplacianVariance": 12.0, "brightness": 20.0 } }"#,
    );
    assert_eq!(r.image_quality.quality_score, 3);
}

#[test]
fn every_suspicious_review_stays_bounded() {
    let reviews: Vec<String> = (0..50).map(|_| "wow".to_string()).collect();
    let content = serde_json::json!({ "reviews": reviews }).to_string();
    let r = analyze_json(&content);
    assert!(r.fake_reviews.fake_score >= 90.0);
    assert!(r.fake_reviews.fake_score <= 100.0);
    assert!(r.overall >= 0.0);
}

#[test]
fn wrong_field_type_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_product(&dir, "bad.product.json", r#"{ "reviews": "not a list" }"#);
    let engine =
        AnalysisEngine::with_parts(PriceTable::new(), SuspiciousPatterns::default(), None);
    let err = engine.analyze(&path, None).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid product JSON"));
}
