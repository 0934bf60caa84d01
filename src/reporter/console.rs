//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{DurabilityRisk, FairnessLabel, ProductReport, SentimentLabel};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single product
    pub fn report(&self, report: &ProductReport) {
        self.print_header(report);
        self.print_score(report);
        self.print_breakdown(report);
        self.print_insights(report);
        self.print_notes(report);
        println!();
    }

    /// Report multiple products with summary
    pub fn report_many(&self, reports: &[ProductReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, report: &ProductReport) {
        println!(
            "{}: {:.1} ({})",
            Self::label_for(report),
            report.overall,
            self.colorize_verdict(report.overall)
        );
    }

    fn label_for(report: &ProductReport) -> String {
        report
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| report.product_name.clone())
    }

    fn print_header(&self, report: &ProductReport) {
        println!();
        println!(
            "{}",
            format!("🔎 Trust Analysis: {}", report.product_name).bold()
        );
        let mut line = format!(
            "   Category: {} | Reviews: {}",
            report.category, report.sentiment.reviews_analyzed
        );
        if let Some(ref path) = report.file_path {
            line.push_str(&format!(" | File: {}", path.display()));
        }
        println!("{}", line);
        println!();
    }

    fn print_score(&self, report: &ProductReport) {
        let bar = self.create_score_bar(report.overall);
        println!(
            "   Score: {} {}",
            bar,
            self.colorize_verdict(report.overall).bold()
        );
        println!();
    }

    fn print_breakdown(&self, report: &ProductReport) {
        println!("   {}", "Score Breakdown:".bold());

        let sentiment = &report.sentiment;
        println!(
            "   {} {:>4.1}/10 Sentiment ({} positive, {} negative, {} neutral)",
            self.create_mini_bar(sentiment.overall_score, 10.0),
            sentiment.overall_score,
            sentiment.count(SentimentLabel::Positive),
            sentiment.count(SentimentLabel::Negative),
            sentiment.count(SentimentLabel::Neutral),
        );

        let fake = &report.fake_reviews;
        let fake_str = format!("{:>5.2}%", fake.fake_score);
        let fake_colored = if fake.fake_score > 50.0 {
            fake_str.red()
        } else if fake.fake_score > 25.0 {
            fake_str.yellow()
        } else {
            fake_str.green()
        };
        println!(
            "   {} {} Fake review probability ({}/{} flagged)",
            self.create_mini_bar(100.0 - fake.fake_score, 100.0),
            fake_colored,
            fake.flagged_count,
            fake.total_reviews
        );

        let price = &report.price_fairness;
        let label = match price.label {
            FairnessLabel::Undervalued => price.label.to_string().green(),
            FairnessLabel::Fair => price.label.to_string().cyan(),
            FairnessLabel::Overpriced => price.label.to_string().red(),
        };
        println!(
            "   {} {} ({:+.1}% vs baseline {:.2})",
            "Price:".dimmed(),
            label,
            price.score,
            price.baseline
        );

        let image = &report.image_quality;
        if image.has_image {
            println!(
                "   {} {:>2}/10 Image quality",
                self.create_mini_bar(image.quality_score as f64, 10.0),
                image.quality_score
            );
        } else {
            println!("   {} Image quality", "[no image]".dimmed());
        }

        if self.verbose {
            println!(
                "   {}",
                format!(
                    "sentiment via {} on {} in {:.3}s, classifier {}",
                    sentiment.source,
                    sentiment.device,
                    sentiment.inference_time,
                    if fake.model_available {
                        "available"
                    } else {
                        "unavailable"
                    }
                )
                .dimmed()
            );
        }
        println!();
    }

    fn print_insights(&self, report: &ProductReport) {
        if report.sentiment.reviews_analyzed == 0 {
            return;
        }
        let insights = &report.insights;
        println!("   {}", "Review Insights:".bold());

        let durability = match insights.durability_risk {
            DurabilityRisk::Low => insights.durability_risk.to_string().green(),
            DurabilityRisk::Medium => insights.durability_risk.to_string().yellow(),
            DurabilityRisk::High => insights.durability_risk.to_string().red(),
        };
        println!("   Durability risk: {}", durability);
        println!("   Fake risk:       {}", insights.fake_risk);
        println!(
            "   Review length:   avg {:.1} words (min {}, max {})",
            insights.average_words, insights.shortest_words, insights.longest_words
        );
        if !insights.top_terms.is_empty() {
            println!("   Top terms:       {}", insights.top_terms.join(", "));
        }
        println!();
    }

    fn print_notes(&self, report: &ProductReport) {
        println!("   {}", "Notes:".bold());
        for note in ScoreCalculator::notes(report) {
            println!("   {} {}", "→".cyan(), note);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Products analyzed: {}",
            stats.products_analyzed.to_string().bold()
        );
        println!(
            "   Average score:     {} ({})",
            format!("{:.1}", stats.average_score).bold(),
            self.colorize_verdict(stats.average_score)
        );
        println!("   Total reviews:     {}", stats.total_reviews);
        println!("   Overpriced:        {}", stats.overpriced);
        println!("   High fake risk:    {}", stats.high_fake_risk);
        println!();
    }

    fn colorize_verdict(&self, overall: f64) -> colored::ColoredString {
        let verdict = ScoreCalculator::verdict(overall);
        if overall >= 8.0 {
            verdict.green().bold()
        } else if overall >= 6.0 {
            verdict.green()
        } else if overall >= 4.0 {
            verdict.yellow()
        } else {
            verdict.red()
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let filled = filled_cells(score, 10.0, 20);
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>4.1}/10",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if self.use_colors {
            if score >= 8.0 {
                bar.green().to_string()
            } else if score >= 6.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: f64, max: f64) -> String {
        let filled = filled_cells(score, max, 10);
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of filled cells out of `width`, clamped so the bar never overflows
fn filled_cells(score: f64, max: f64, width: usize) -> usize {
    if !score.is_finite() || max <= 0.0 {
        return 0;
    }
    let ratio = (score / max).clamp(0.0, 1.0);
    ((ratio * width as f64).floor() as usize).min(width)
}
