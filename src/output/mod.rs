//! Output module for crawl results
//!
//! This module handles:
//! - The report types returned by a crawl
//! - Plain-text summaries for the terminal
//! - Markdown export of kept pages

mod markdown;
mod report;
mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{FilterCounts, ScrapeReport, ScrapedPage};
pub use stats::format_summary;
