//! Candidate URL discovery
//!
//! Candidates come from three sources, in order: the seed itself, the origin's
//! XML sitemap, and the links on the seed page. Seed links are only read when
//! the sitemap came up short of `max_pages`.

use super::parser::extract_page_links;
use super::session::CrawlSession;
use super::sitemap::SitemapReader;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Reads same-origin links from the seed page
pub struct LinkCrawler<'a> {
    session: &'a CrawlSession,
}

impl<'a> LinkCrawler<'a> {
    pub fn new(session: &'a CrawlSession) -> Self {
        Self { session }
    }

    /// Fetches the seed through the session renderer and returns its page links
    ///
    /// The fetch outcome, success or failure, is stashed in the session so the
    /// page fetcher does not request the seed a second time. Failures yield no
    /// links.
    pub async fn crawl(&self, seed: &Url) -> Vec<Url> {
        let session = self.session;

        if !session.robots().is_allowed(seed) {
            tracing::debug!("Seed {} is disallowed by robots.txt, not reading its links", seed);
            return Vec::new();
        }

        let outcome = session
            .renderer()
            .render(seed, session.config().timeout())
            .await;
        let links = match &outcome {
            Ok(html) => extract_page_links(html, seed),
            Err(e) => {
                tracing::warn!("Failed to fetch seed {} for link discovery: {}", seed, e);
                Vec::new()
            }
        };

        session.stash_outcome(seed, outcome);
        links
    }
}

/// Builds the deduplicated, bounded candidate list for a session
pub struct UrlDiscovery<'a> {
    session: &'a CrawlSession,
    client: &'a Client,
}

impl<'a> UrlDiscovery<'a> {
    /// Creates a discovery pass
    ///
    /// # Arguments
    ///
    /// * `session` - The crawl session (origin, robots, filters, renderer)
    /// * `client` - HTTP client for sitemap requests
    pub fn new(session: &'a CrawlSession, client: &'a Client) -> Self {
        Self { session, client }
    }

    /// Collects at most `max_pages` candidate URLs
    pub async fn collect(&self, seed: &Url) -> Vec<Url> {
        let session = self.session;
        let max_pages = session.config().max_pages;
        let mut candidates = Candidates::default();

        if session.filter().check(seed).is_none() {
            candidates.push(seed.clone());
        } else {
            tracing::debug!("Seed {} matches a URL filter, not scheduling it", seed);
        }

        let sitemap_urls = SitemapReader::new(
            self.client,
            session.base_origin(),
            session.robots(),
            session.filter(),
        )
        .discover()
        .await;
        let sitemap_count = sitemap_urls.len();
        for url in sitemap_urls {
            candidates.push(url);
        }

        let mut link_count = 0;
        if sitemap_count < max_pages {
            for url in LinkCrawler::new(session).crawl(seed).await {
                if candidates.len() >= max_pages {
                    break;
                }
                if !session.robots().is_allowed(&url) || session.filter().check(&url).is_some() {
                    continue;
                }
                if candidates.push(url) {
                    link_count += 1;
                }
            }
        }

        let mut urls = candidates.into_urls();
        urls.truncate(max_pages);

        tracing::info!(
            "Discovered {} candidate URLs ({} from sitemap, {} from seed links)",
            urls.len(),
            sitemap_count,
            link_count
        );

        urls
    }
}

/// Insertion-ordered set of URLs
#[derive(Default)]
struct Candidates {
    seen: HashSet<String>,
    urls: Vec<Url>,
}

impl Candidates {
    fn push(&mut self, url: Url) -> bool {
        if self.seen.insert(url.as_str().to_string()) {
            self.urls.push(url);
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.urls.len()
    }

    fn into_urls(self) -> Vec<Url> {
        self.urls
    }
}
