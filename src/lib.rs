//! Page-Harvest: a bounded, single-origin website content harvester
//!
//! This crate discovers a bounded set of same-origin pages starting from a seed URL,
//! respecting robots.txt, filtering out login, error and boilerplate pages, and
//! extracting clean text ready to be handed to an embedding pipeline. Pages can
//! optionally be rendered through a headless browser (`browser` feature).

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Page-Harvest operations
///
/// Only session-fatal conditions surface as a `HarvestError`. Per-page failures
/// are reported through [`crawler::FetchError`] and never abort a crawl.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("No Chrome/Chromium binary could be resolved (searched: {searched})")]
    BrowserNotFound { searched: String },

    #[error("JavaScript rendering requested but this build has no browser support")]
    RenderingUnavailable,

    #[error("Render engine error: {0}")]
    Render(String),

    #[error("Crawl session aborted: {0}")]
    SessionAborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Page-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{ScrapeOptions, ScraperConfig};
pub use crawler::{scrape, Scraper};
pub use output::{FilterCounts, ScrapeReport, ScrapedPage};
