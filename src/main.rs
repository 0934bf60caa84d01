//! TruthLens: Product Trust Score CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use truthlens::analyzer::engine::default_classifier;
use truthlens::analyzer::AnalysisEngine;
use truthlens::config::{build_ignore_set, is_ignored, load_config, Config, CONFIG_FILENAME};
use truthlens::reporter::{ConsoleReporter, JsonReporter};
use truthlens::{text, Category, ImageInput, PriceValue, ProductInput, ProductReport};
use walkdir::WalkDir;

/// TruthLens: trust scores for product listings
#[derive(Parser, Debug)]
#[command(name = "truthlens")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Product file or directory to analyze (omit when using a subcommand)
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum overall score, 0-10 (exit 1 if below)
    #[arg(long, short, value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .truthlensrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run analysis in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a manually entered product
    Score {
        /// Price, as a number or currency string (e.g. "$1,299.00")
        #[arg(long)]
        price: String,

        /// Product category (Electronics, Laptop, Smartphone, Headphones, Home, Clothing, Other)
        #[arg(long)]
        category: Option<String>,

        /// Free-text specs, checked for premium/budget keywords
        #[arg(long, default_value = "")]
        specs: String,

        /// A review (repeat for several)
        #[arg(long = "review", value_name = "TEXT")]
        reviews: Vec<String>,

        /// File with one review per line
        #[arg(long)]
        reviews_file: Option<PathBuf>,

        /// Image quality score computed elsewhere (0-10)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        image_quality: Option<u8>,

        /// Product name
        #[arg(long)]
        name: Option<String>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .truthlensrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 6)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn parse_threshold(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if (0.0..=10.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 10, got {}", value))
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Score {
                price,
                category,
                specs,
                reviews,
                reviews_file,
                image_quality,
                name,
                json,
                config,
            } => {
                let product = build_manual_product(
                    price,
                    category,
                    specs,
                    reviews,
                    reviews_file.as_deref(),
                    image_quality,
                    name,
                )?;
                run_score(&product, json, config.as_deref())
            }
            Commands::Init { threshold, dir } => run_init(threshold, dir.as_deref()),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A product file or directory is required");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.threshold);

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let product_patterns = config.get_product_patterns();
    let product_files = collect_product_files(&path, ignore_set.as_ref(), &product_patterns)?;

    if product_files.is_empty() {
        eprintln!("{}: No product files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AnalysisEngine::from_config(&config, default_classifier())?;

    let use_parallel = args.parallel || product_files.len() > 10;
    log::info!(
        "analyzing {} product file(s){}",
        product_files.len(),
        if use_parallel { " in parallel" } else { "" }
    );

    let outcomes = if use_parallel {
        engine.analyze_parallel(&product_files, Some(&config))
    } else {
        engine.analyze_many(&product_files, Some(&config))
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut had_errors = false;
    for (file, outcome) in product_files.iter().zip(outcomes) {
        match outcome {
            Ok(report) => results.push(report),
            Err(e) => {
                had_errors = true;
                if !args.quiet {
                    eprintln!(
                        "{}: Failed to analyze {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
            }
        }
    }

    if results.is_empty() {
        eprintln!("{}: All files failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = AnalysisEngine::aggregate_stats(&results);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in &results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }

        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // Single file: per-path override threshold applies; many: config/CLI threshold vs average
    let (score, threshold) = if results.len() == 1 {
        let effective = match results[0].file_path {
            Some(ref p) => config.effective_for_file(p),
            None => Default::default(),
        };
        (results[0].overall, effective.threshold.or(config.threshold))
    } else {
        (stats.average_score, config.threshold)
    };

    if let Some(threshold) = threshold {
        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {:.1} is below threshold {:.1}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn build_manual_product(
    price: String,
    category: Option<String>,
    specs: String,
    mut reviews: Vec<String>,
    reviews_file: Option<&Path>,
    image_quality: Option<u8>,
    name: Option<String>,
) -> Result<ProductInput> {
    if let Some(file) = reviews_file {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read reviews file: {}", file.display()))?;
        reviews.extend(text::split_reviews(&content));
    }

    Ok(ProductInput {
        name: name.unwrap_or_default(),
        url: None,
        price: PriceValue::Text(price),
        category: category.as_deref().map(Category::parse),
        specs,
        reviews,
        reviews_text: None,
        image: image_quality.map(|q| ImageInput::Score {
            quality_score: i64::from(q),
        }),
    })
}

fn run_score(product: &ProductInput, json: bool, config_path: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, config_path)?;
    let engine = AnalysisEngine::from_config(&config, default_classifier())?;

    let effective = config.effective_for_file(Path::new(""));
    let report: ProductReport = engine.analyze_product(product, &effective);

    if json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else {
        ConsoleReporter::new().report(&report);
    }

    match config.threshold {
        Some(threshold) if report.overall < threshold => Ok(ExitCode::from(1)),
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn run_init(threshold: Option<f64>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(6.0);

    let json = format!(
        r#"{{
  "threshold": {:.1},
  "defaultCategory": "Other",
  "categoryBaselines": {{
    "Electronics": 500,
    "Laptop": 800,
    "Smartphone": 600,
    "Headphones": 150,
    "Home": 50,
    "Clothing": 30,
    "Other": 100
  }},
  "ignore": [
    "**/drafts/**"
  ],
  "overrides": []
}}
"#,
        threshold_value
    );

    // The template must stay loadable by our own parser
    serde_json::from_str::<Config>(&json).context("Generated config is not valid")?;

    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={:.1}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

fn collect_product_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    product_patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if entry.file_type().is_file() && is_product_file(file_path, product_patterns) {
            if let Some(set) = ignore_set {
                if is_ignored(file_path, set) {
                    continue;
                }
            }
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_product_file(path: &Path, product_patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    product_patterns.iter().any(|p| name.ends_with(p))
}
