//! Crawl result types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One kept page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapedPage {
    /// Final page URL (same origin as the seed)
    pub url: String,

    /// Page title
    pub title: String,

    /// Cleaned main-content text
    pub content: String,
}

/// Counters of pages dropped by each filter stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    /// Dropped for an HTTP error status
    pub status: usize,

    /// Dropped before fetching: robots.txt, URL pattern or cross-origin
    pub url: usize,

    /// Dropped after fetching: page content looked like a login or error page
    pub content: usize,
}

impl FilterCounts {
    /// Total pages dropped by any filter
    pub fn total(&self) -> usize {
        self.status + self.url + self.content
    }
}

/// The result of one crawl
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// Seed URL as given by the caller (normalized)
    pub seed_url: String,

    /// Kept pages, at most `max_pages`
    pub pages: Vec<ScrapedPage>,

    /// Filter counters
    pub filtered: FilterCounts,

    /// Number of candidate URLs scheduled for fetching
    pub discovered: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Total characters of kept content
    pub fn total_content_chars(&self) -> usize {
        self.pages.iter().map(|page| page.content.chars().count()).sum()
    }
}
