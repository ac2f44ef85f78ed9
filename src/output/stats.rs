//! Plain-text crawl summaries
//!
//! Formats a [`ScrapeReport`] for terminal output.

use super::report::ScrapeReport;
use std::fmt::Write;

/// Longest content excerpt shown per page
const EXCERPT_CHARS: usize = 120;

/// Formats the crawl summary and the page list
///
/// # Arguments
///
/// * `report` - The report to display
///
/// # Returns
///
/// The formatted text, ending in a newline
pub fn format_summary(report: &ScrapeReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Summary ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Seed URL: {}", report.seed_url);
    let _ = writeln!(out, "  Candidates scheduled: {}", report.discovered);
    let _ = writeln!(out, "  Pages kept: {}", report.pages.len());
    let _ = writeln!(out, "  Content size: {} chars", report.total_content_chars());
    let _ = writeln!(out, "  Duration: {:.1}s", report.duration_seconds());
    let _ = writeln!(out);

    let filtered = &report.filtered;
    let _ = writeln!(out, "Filtered ({}):", filtered.total());
    let _ = writeln!(out, "  HTTP status: {}", filtered.status);
    let _ = writeln!(out, "  URL (robots/pattern/origin): {}", filtered.url);
    let _ = writeln!(out, "  Content (login/error): {}", filtered.content);
    let _ = writeln!(out);

    if !report.pages.is_empty() {
        let _ = writeln!(out, "Pages ({}):", report.pages.len());
        for page in &report.pages {
            let _ = writeln!(out, "  - {} ({})", page.title, page.url);
            let _ = writeln!(out, "    {}", excerpt(&page.content));
        }
        let _ = writeln!(out);
    }

    let yield_rate = if report.discovered > 0 {
        (report.pages.len() as f64 / report.discovered as f64) * 100.0
    } else {
        0.0
    };
    let _ = writeln!(
        out,
        "Yield: {:.1}% ({} / {} candidates kept)",
        yield_rate,
        report.pages.len(),
        report.discovered
    );

    out
}

fn excerpt(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}
