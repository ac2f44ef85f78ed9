//! Per-crawl session state
//!
//! A session owns everything one crawl shares between its concurrent page
//! fetches: the origin, the robots gate, the URL filter, the render engine, the
//! visited set, the filter counters and fetch outcomes already known from
//! discovery.

use super::content::ContentRules;
use super::fetcher::FetchError;
use crate::config::ScraperConfig;
use crate::output::FilterCounts;
use crate::render::Renderer;
use crate::robots::RobotsGate;
use crate::url::{origin_url, UrlFilter};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// Which filter counter a dropped page increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Status,
    Url,
    Content,
}

#[derive(Debug, Default)]
struct SessionState {
    visited: HashSet<String>,
    counts: FilterCounts,
    stash: HashMap<String, Result<String, FetchError>>,
}

/// Shared state of one crawl
pub struct CrawlSession {
    base_origin: Url,
    config: ScraperConfig,
    robots: RobotsGate,
    filter: UrlFilter,
    renderer: Arc<dyn Renderer>,
    state: Mutex<SessionState>,
}

impl CrawlSession {
    /// Creates a session for the origin of `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL; its origin bounds the crawl
    /// * `config` - Configuration for this crawl
    /// * `robots` - Loaded robots.txt gate for the origin
    /// * `renderer` - Engine used for every page fetch
    pub fn new(seed: &Url, config: ScraperConfig, robots: RobotsGate, renderer: Arc<dyn Renderer>) -> Self {
        let filter = UrlFilter::from_config(&config);

        Self {
            base_origin: origin_url(seed),
            config,
            robots,
            filter,
            renderer,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn base_origin(&self) -> &Url {
        &self.base_origin
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    pub fn filter(&self) -> &UrlFilter {
        &self.filter
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    /// Content filters enabled for this session
    pub fn content_rules(&self) -> ContentRules {
        ContentRules {
            filter_login_pages: self.config.filter_login_pages,
            filter_error_pages: self.config.filter_error_pages,
        }
    }

    // Poisoning is ignored: the state is only sets and counters
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if the URL was already claimed by a fetch
    pub fn is_visited(&self, url: &Url) -> bool {
        self.state().visited.contains(url.as_str())
    }

    /// Claims a URL for fetching
    ///
    /// Returns false if it was already claimed.
    pub fn mark_visited(&self, url: &Url) -> bool {
        self.state().visited.insert(url.as_str().to_string())
    }

    /// Increments one filter counter
    pub fn record_filtered(&self, kind: FilterKind) {
        let mut state = self.state();
        match kind {
            FilterKind::Status => state.counts.status += 1,
            FilterKind::Url => state.counts.url += 1,
            FilterKind::Content => state.counts.content += 1,
        }
    }

    /// Snapshot of the filter counters
    pub fn filter_counts(&self) -> FilterCounts {
        self.state().counts
    }

    /// Keeps the outcome of a fetch made during discovery for the page fetcher
    ///
    /// Failures are kept too, so a URL that already failed is not requested again.
    pub fn stash_outcome(&self, url: &Url, outcome: Result<String, FetchError>) {
        self.state().stash.insert(url.as_str().to_string(), outcome);
    }

    /// Removes and returns a stashed fetch outcome
    pub fn take_stashed(&self, url: &Url) -> Option<Result<String, FetchError>> {
        self.state().stash.remove(url.as_str())
    }
}
