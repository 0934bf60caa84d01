//! CLI behavior tests: exit codes, output formats, init, manual scoring.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const MUG: &str = "tests/fixtures/catalog/home/mug.product.json";
const CATALOG: &str = "tests/fixtures/catalog";
const BROKEN: &str = "tests/fixtures/broken";

fn truthlens_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_truthlens"))
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = truthlens_cmd();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("A product file or directory is required"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn below_threshold_exit_1() {
    let mut cmd = truthlens_cmd();
    cmd.arg(MUG).arg("--threshold").arg("9");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below threshold"));
}

#[test]
fn above_threshold_exit_0() {
    let mut cmd = truthlens_cmd();
    cmd.arg(MUG).arg("--threshold").arg("5");
    cmd.assert().success();
}

#[test]
fn threshold_out_of_range_is_usage_error() {
    let mut cmd = truthlens_cmd();
    cmd.arg(MUG).arg("--threshold").arg("11");
    cmd.assert().failure().code(2);
}

#[test]
fn json_output_valid() {
    let mut cmd = truthlens_cmd();
    cmd.arg(MUG).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");
    assert_eq!(parsed["productName"], "Stoneware Coffee Mug");
    assert_eq!(parsed["priceFairness"]["label"], "Fair");
    assert_eq!(parsed["imageQuality"]["qualityScore"], 10);
    let overall = parsed["overall"].as_f64().unwrap();
    assert!((0.0..=10.0).contains(&overall));
}

#[test]
fn console_output_shows_breakdown() {
    let mut cmd = truthlens_cmd();
    cmd.arg(MUG);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Stoneware Coffee Mug"))
        .stdout(predicate::str::contains("Score Breakdown"))
        .stdout(predicate::str::contains("Fair"));
}

#[test]
fn directory_skips_ignored_drafts() {
    // drafts/ holds an invalid file; the catalog config ignores it
    let mut cmd = truthlens_cmd();
    cmd.arg(CATALOG).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["summary"]["productsAnalyzed"], 3);
    assert_eq!(parsed["summary"]["overpriced"], 1);
    assert_eq!(parsed["summary"]["highFakeRisk"], 1);
}

#[test]
fn parallel_matches_sequential_count() {
    let mut cmd = truthlens_cmd();
    cmd.arg(CATALOG).arg("--parallel").arg("--jobs").arg("2").arg("--quiet");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("mug.product.json"));
}

#[test]
fn broken_file_reported_and_exit_2() {
    let mut cmd = truthlens_cmd();
    cmd.arg(BROKEN);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to analyze"))
        .stdout(predicate::str::contains("Desk Lamp"));
}

#[test]
fn path_not_found_exit_2() {
    let mut cmd = truthlens_cmd();
    cmd.arg("nonexistent.product.json");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn empty_directory_exit_2() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = truthlens_cmd();
    cmd.arg(dir.path());
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No product files found"));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".truthlensrc.json");
    let mut cmd = truthlens_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path()).arg("--threshold").arg("7");
    cmd.assert().success();
    assert!(config_path.exists(), ".truthlensrc.json should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["threshold"], 7.0);
    assert_eq!(parsed["categoryBaselines"]["Laptop"], 800);
}

#[test]
fn init_does_not_overwrite() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".truthlensrc.json");
    fs::write(&config_path, "{ \"threshold\": 3 }").unwrap();
    let mut cmd = truthlens_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&config_path).unwrap(), "{ \"threshold\": 3 }");
}

#[test]
fn score_manual_entry_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = truthlens_cmd();
    cmd.current_dir(dir.path())
        .arg("score")
        .arg("--price")
        .arg("$120")
        .arg("--category")
        .arg("home")
        .arg("--review")
        .arg("Great lamp, bright and sturdy, love the warm light")
        .arg("--name")
        .arg("Floor Lamp")
        .arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["productName"], "Floor Lamp");
    assert_eq!(parsed["category"], "Home");
    assert_eq!(parsed["priceFairness"]["label"], "Overpriced");
    assert_eq!(parsed["priceFairness"]["baseline"], 50.0);
    assert_eq!(parsed["sentiment"]["reviewsAnalyzed"], 1);
}

#[test]
fn score_reads_reviews_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let reviews = dir.path().join("reviews.txt");
    fs::write(&reviews, "Works fine\n\nBroke after a week of light use\n").unwrap();
    let mut cmd = truthlens_cmd();
    cmd.current_dir(dir.path())
        .arg("score")
        .arg("--price")
        .arg("25")
        .arg("--reviews-file")
        .arg(&reviews)
        .arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["sentiment"]["reviewsAnalyzed"], 2);
    assert_eq!(parsed["insights"]["durabilityRisk"], "High");
}

#[test]
fn score_rejects_out_of_range_image_quality() {
    let mut cmd = truthlens_cmd();
    cmd.arg("score").arg("--price").arg("10").arg("--image-quality").arg("11");
    cmd.assert().failure().code(2);
}
