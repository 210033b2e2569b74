//! Plain-text rendering of a report for the "Download Report" action.

use std::fmt::Write;

use crate::analysis::recommender::Priority;
use crate::analysis::AnalysisReport;

pub const REPORT_FILENAME: &str = "skillscore-report.txt";

pub fn render_text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "SkillScore Analysis Report");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall match score: {}%", report.overall_score);
    let _ = writeln!(out);

    let _ = writeln!(out, "Section breakdown");
    for (section, score) in &report.section_scores {
        let _ = writeln!(out, "  {:<12} {:>3}%", capitalize(section), score);
    }
    let _ = writeln!(out);

    let tally = &report.keyword_matches;
    let _ = writeln!(
        out,
        "Keywords: {} found, {} missing, {} total",
        tally.found, tally.missing, tally.total
    );
    let _ = writeln!(out, "  Found:   {}", list_or_none(&report.found_keywords));
    let _ = writeln!(out, "  Missing: {}", list_or_none(&report.missing_keywords));
    let _ = writeln!(out);

    let _ = writeln!(out, "Improvement suggestions");
    if report.suggestions.is_empty() {
        let _ = writeln!(out, "  None. Your resume covers this job description well.");
    }
    for (i, suggestion) in report.suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{} priority] {:?}: {} (+{} points)",
            i + 1,
            priority_label(suggestion.priority),
            suggestion.category,
            suggestion.rationale,
            suggestion.impact
        );
    }

    out
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
