//! Markdown export
//!
//! Renders kept pages as one markdown document, one section per page, ready
//! to be chunked by an embedding pipeline.

use super::report::ScrapeReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown rendering of the report to a file
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_report(report: &ScrapeReport, output_path: &Path) -> crate::Result<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &ScrapeReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Harvest of {}\n\n", report.seed_url));

    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Pages**: {}\n", report.pages.len()));
    md.push_str(&format!(
        "- **Filtered**: {} status, {} url, {} content\n\n",
        report.filtered.status, report.filtered.url, report.filtered.content
    ));

    for page in &report.pages {
        md.push_str(&format!("## {}\n\n", escape_heading(&page.title)));
        md.push_str(&format!("Source: <{}>\n\n", page.url));
        md.push_str(&page.content);
        md.push_str("\n\n");
    }

    md
}

/// Keeps a title on one line and stops it from opening a deeper heading
fn escape_heading(title: &str) -> String {
    title.replace(['\n', '\r'], " ").trim_start_matches('#').trim().to_string()
}
