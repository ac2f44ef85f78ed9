use serde::Deserialize;
use std::time::Duration;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "PageHarvest/0.1 (+https://github.com/page-harvest/page-harvest)";

/// Per-crawl scraper configuration
///
/// A configuration is immutable for the lifetime of a crawl. TOML keys use
/// kebab-case (`max-pages`, `filter-login-pages`, ...).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScraperConfig {
    /// Maximum number of pages returned by a crawl
    pub max_pages: usize,

    /// Number of pages fetched concurrently per batch (forced to 1 when rendering)
    pub concurrency: usize,

    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// User agent sent with HTTP requests and matched against robots.txt
    pub user_agent: String,

    /// Skip login, registration and password-reset pages
    pub filter_login_pages: bool,

    /// Skip 404/500/unauthorized style error pages
    pub filter_error_pages: bool,

    /// Additional regular expressions; matching URLs are never fetched
    pub custom_filter_patterns: Vec<String>,

    /// Render pages through a headless browser before extraction
    pub render_javascript: bool,

    /// Delay between batches (milliseconds)
    pub batch_delay_ms: u64,

    /// Pages with less extracted text than this (characters) are dropped
    pub min_content_length: usize,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// V8 heap ceiling handed to the headless browser (megabytes)
    pub browser_memory_limit_mb: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            concurrency: 5,
            timeout_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            filter_login_pages: true,
            filter_error_pages: true,
            custom_filter_patterns: Vec::new(),
            render_javascript: false,
            batch_delay_ms: 1_000,
            min_content_length: 50,
            max_redirects: 5,
            browser_memory_limit_mb: 512,
        }
    }
}

impl ScraperConfig {
    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay inserted between batches as a [`Duration`]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Returns a copy of this configuration with per-call options applied
    pub fn with_options(mut self, options: &ScrapeOptions) -> Self {
        if let Some(render) = options.render_javascript {
            self.render_javascript = render;
        }
        self
    }
}

/// Per-call overrides accepted by [`crate::scrape`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Overrides [`ScraperConfig::render_javascript`] when set
    pub render_javascript: Option<bool>,
}

impl ScrapeOptions {
    /// Options requesting headless-browser rendering
    pub fn rendered() -> Self {
        Self {
            render_javascript: Some(true),
        }
    }
}
