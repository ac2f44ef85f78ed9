//! Crawler module for single-origin harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and error classification
//! - Sitemap reading and link extraction
//! - Candidate discovery and per-page processing
//! - Batch scheduling and overall session coordination

mod content;
mod coordinator;
mod discovery;
mod fetcher;
mod page;
mod parser;
mod scheduler;
mod session;
mod sitemap;

pub use content::{analyze, collapse_whitespace, ContentRules, ContentVerdict, ExtractedContent};
pub use coordinator::{scrape, Scraper};
pub use discovery::{LinkCrawler, UrlDiscovery};
pub use fetcher::{build_http_client, fetch_html, fetch_text, FetchError, HttpRenderer};
pub use page::PageFetcher;
pub use parser::{extract_links, extract_page_links};
pub use scheduler::BatchScheduler;
pub use session::{CrawlSession, FilterKind};
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapReader};
