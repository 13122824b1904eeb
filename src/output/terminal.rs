// Colored terminal output for verdicts and category scores.
//
// main.rs delegates all user-facing formatting here.

use colored::{ColoredString, Colorize};

use crate::cache::CacheEntry;
use crate::image::ContentKey;
use crate::moderation::gate::{Evaluation, Source};
use crate::moderation::policy::{score_for, ThresholdPolicy};
use crate::moderation::verdict::{ContentCategory, Verdict};
use crate::vision::traits::{CategoryScores, RiskLevel};

/// One line per checked file: verdict, where it came from, and the key.
pub fn display_evaluation(label: &str, key: &ContentKey, evaluation: &Evaluation) {
    let source = match evaluation.source {
        Source::Cache => "cached",
        Source::Classifier => "classified",
        Source::Failed => "failed",
    };
    println!(
        "  {:<40} {:<18} {:<10} {}",
        super::truncate_chars(label, 40),
        colorize_verdict(evaluation.verdict),
        source.dimmed(),
        short_key(key).dimmed(),
    );

    if let Some(err) = &evaluation.failure {
        println!("      {} {}", "error:".red(), err);
    }
}

/// Detailed per-category breakdown against the active thresholds.
pub fn display_scores(scores: &CategoryScores, policy: &ThresholdPolicy) {
    for category in ContentCategory::PRIORITY {
        let level = score_for(scores, category);
        let threshold = policy
            .threshold(category)
            .map(|t| format!(">= {t}"))
            .unwrap_or_else(|| "off".to_string());
        println!(
            "      {:<9} {:<14} {}",
            category.name(),
            colorize_level(level),
            threshold.dimmed()
        );
    }
}

/// Output for `safegate lookup`.
pub fn display_cache_entry(key: &ContentKey, entry: Option<&CacheEntry>) {
    match entry {
        Some(entry) => {
            println!("{}", format!("=== Cached verdict for {} ===", short_key(key)).bold());
            println!("  Verdict: {}", colorize_verdict(entry.verdict));
            println!("  Judged at: {}", entry.judged_at);
            if entry.verdict.is_transient() {
                println!(
                    "  {}",
                    "Stored value is not a usable verdict; the next check will re-classify."
                        .yellow()
                );
            }
        }
        None => println!("No cached verdict for {}", key),
    }
}

/// Totals line after a batch check.
pub fn display_summary(approved: usize, rejected: usize, failed: usize) {
    println!();
    println!(
        "  {} approved, {} rejected, {} could not be classified",
        approved.to_string().green(),
        rejected.to_string().red(),
        failed.to_string().yellow(),
    );
}

pub fn colorize_verdict(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Approved => "APPROVED".green().bold(),
        Verdict::Rejected(ContentCategory::Unknown) => "UNKNOWN".yellow(),
        Verdict::Rejected(category) => format!("REJECTED ({category})").red().bold(),
    }
}

fn colorize_level(level: RiskLevel) -> ColoredString {
    let s = level.as_str();
    match level {
        RiskLevel::VeryLikely => s.red().bold(),
        RiskLevel::Likely => s.bright_red(),
        RiskLevel::Possible => s.yellow(),
        RiskLevel::Unlikely | RiskLevel::VeryUnlikely => s.green(),
        RiskLevel::Unknown => s.dimmed(),
    }
}

fn short_key(key: &ContentKey) -> String {
    let s = key.as_str();
    if s.chars().count() > 12 {
        let head: String = s.chars().take(12).collect();
        format!("{head}…")
    } else {
        s.to_string()
    }
}
