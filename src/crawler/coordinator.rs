//! Crawl coordinator - session orchestration
//!
//! This module runs one crawl session end to end:
//! - Launching the render engine (when JavaScript rendering is enabled)
//! - Loading robots.txt for the seed origin
//! - Discovering candidate URLs
//! - Fetching candidates in batches
//! - Closing the render engine and assembling the report

use super::discovery::UrlDiscovery;
use super::fetcher::{build_http_client, HttpRenderer};
use super::page::PageFetcher;
use super::scheduler::BatchScheduler;
use super::session::CrawlSession;
use crate::config::{validate, ScrapeOptions, ScraperConfig};
use crate::output::{FilterCounts, ScrapeReport, ScrapedPage};
use crate::render::{ChromiumLauncher, RenderLauncher, Renderer};
use crate::robots::RobotsGate;
use crate::url::{normalize_url, origin_url};
use crate::HarvestError;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// A configured website harvester
///
/// # Example
///
/// ```no_run
/// use page_harvest::{ScraperConfig, Scraper};
///
/// # async fn run() -> page_harvest::Result<()> {
/// let scraper = Scraper::new(ScraperConfig::default())?;
/// let report = scraper.scrape("https://example.com/").await?;
/// println!("{} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub struct Scraper {
    config: ScraperConfig,
    launcher: Arc<dyn RenderLauncher>,
}

/// What a session produced before the render engine was closed
struct CrawlOutcome {
    pages: Vec<ScrapedPage>,
    filtered: FilterCounts,
    discovered: usize,
}

impl Scraper {
    /// Creates a harvester that renders through headless Chromium when asked to
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - The configuration is valid
    /// * `Err(HarvestError::Config)` - The configuration failed validation
    pub fn new(config: ScraperConfig) -> Result<Self, HarvestError> {
        Self::with_launcher(config, Arc::new(ChromiumLauncher::new()))
    }

    /// Creates a harvester with a custom render engine launcher
    pub fn with_launcher(config: ScraperConfig, launcher: Arc<dyn RenderLauncher>) -> Result<Self, HarvestError> {
        validate(&config)?;
        Ok(Self { config, launcher })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Crawls the origin of `seed_url` with the configured options
    pub async fn scrape(&self, seed_url: &str) -> Result<ScrapeReport, HarvestError> {
        self.scrape_with(seed_url, ScrapeOptions::default()).await
    }

    /// Crawls the origin of `seed_url`, applying per-call options
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - The crawl ran; individual page failures are only
    ///   reflected in the filter counters
    /// * `Err(HarvestError)` - The seed is invalid, the HTTP client could not be
    ///   built, the render engine could not be launched, or the session aborted
    pub async fn scrape_with(&self, seed_url: &str, options: ScrapeOptions) -> Result<ScrapeReport, HarvestError> {
        let config = self.config.clone().with_options(&options);
        let seed = normalize_url(seed_url)?;
        let started_at = Utc::now();

        let client = build_http_client(&config)?;
        let renderer: Arc<dyn Renderer> = if config.render_javascript {
            self.launcher.launch(&config).await?
        } else {
            Arc::new(HttpRenderer::new(client.clone()))
        };

        tracing::info!(
            "Starting crawl of {} (max {} pages, renderer: {})",
            seed,
            config.max_pages,
            renderer.name()
        );

        // close runs even when the session task panics
        let session = tokio::spawn(run_session(seed.clone(), config, client, renderer.clone()));
        let joined = session.await;
        renderer.close().await;

        let outcome = joined.map_err(|e| {
            tracing::error!("Crawl session for {} aborted: {}", seed, e);
            HarvestError::SessionAborted(e.to_string())
        })?;

        let finished_at = Utc::now();
        tracing::info!(
            "Crawl of {} finished: {} pages kept, {} filtered (status {}, url {}, content {})",
            seed,
            outcome.pages.len(),
            outcome.filtered.total(),
            outcome.filtered.status,
            outcome.filtered.url,
            outcome.filtered.content
        );

        Ok(ScrapeReport {
            seed_url: seed.to_string(),
            pages: outcome.pages,
            filtered: outcome.filtered,
            discovered: outcome.discovered,
            started_at,
            finished_at,
        })
    }
}

/// Robots, discovery and batch fetching for one session
async fn run_session(
    seed: Url,
    config: ScraperConfig,
    client: Client,
    renderer: Arc<dyn Renderer>,
) -> CrawlOutcome {
    let robots = RobotsGate::load(&client, &seed, &config.user_agent).await;
    if robots.has_rules() {
        tracing::info!("Applying robots.txt rules for {}", origin_url(&seed));
    } else {
        tracing::info!("No robots.txt rules for {}, crawling unrestricted", origin_url(&seed));
    }
    if let Some(delay) = robots.crawl_delay() {
        tracing::info!("robots.txt requests a crawl delay of {:?}", delay);
    }
    let scheduler = BatchScheduler::for_session(&config, robots.crawl_delay());

    let session = Arc::new(CrawlSession::new(&seed, config, robots, renderer));
    tracing::debug!(
        "URL filter ready with {} custom patterns",
        session.filter().custom_pattern_count()
    );
    let candidates = UrlDiscovery::new(&session, &client).collect(&seed).await;
    let discovered = candidates.len();

    let fetcher = PageFetcher::new(session.clone());
    let pages = scheduler
        .run(candidates, move |url| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch(url).await }
        })
        .await;

    CrawlOutcome {
        pages,
        filtered: session.filter_counts(),
        discovered,
    }
}

/// Crawls a website with default settings
///
/// # Arguments
///
/// * `seed_url` - Where to start; the crawl never leaves its origin
/// * `max_pages` - Upper bound on returned pages
/// * `options` - Per-call overrides (JavaScript rendering)
///
/// # Example
///
/// ```no_run
/// use page_harvest::{scrape, ScrapeOptions};
///
/// # async fn run() -> page_harvest::Result<()> {
/// let report = scrape("https://example.com/", 20, ScrapeOptions::default()).await?;
/// for page in &report.pages {
///     println!("{}: {}", page.url, page.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scrape(seed_url: &str, max_pages: usize, options: ScrapeOptions) -> Result<ScrapeReport, HarvestError> {
    let config = ScraperConfig {
        max_pages,
        ..ScraperConfig::default()
    };
    Scraper::new(config)?.scrape_with(seed_url, options).await
}
