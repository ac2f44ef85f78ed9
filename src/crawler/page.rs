//! Single-page fetch and extraction

use super::content::{analyze, ContentVerdict};
use super::fetcher::FetchError;
use super::session::{CrawlSession, FilterKind};
use crate::output::ScrapedPage;
use crate::url::same_origin;
use std::sync::Arc;
use url::Url;

/// Fetches one candidate URL and turns it into a [`ScrapedPage`]
///
/// Cheap to clone; every clone shares the same session.
#[derive(Clone)]
pub struct PageFetcher {
    session: Arc<CrawlSession>,
}

impl PageFetcher {
    pub fn new(session: Arc<CrawlSession>) -> Self {
        Self { session }
    }

    /// Processes one URL
    ///
    /// # Processing Steps
    ///
    /// 1. Already visited: skipped silently
    /// 2. Cross-origin, disallowed by robots.txt or matching a URL filter:
    ///    skipped, URL counter incremented
    /// 3. Marked visited, then fetched through the session renderer (or the
    ///    outcome already stashed by discovery is used)
    /// 4. Login or error content: dropped, content counter incremented
    /// 5. Less than `min_content_length` characters of text: dropped silently
    ///
    /// # Returns
    ///
    /// * `Some(ScrapedPage)` - The page is worth keeping
    /// * `None` - The page was skipped, filtered or failed
    pub async fn fetch(&self, url: Url) -> Option<ScrapedPage> {
        let session = &self.session;

        if session.is_visited(&url) {
            return None;
        }

        if let Some(reason) = self.url_rejection(&url) {
            tracing::debug!("Skipping {}: {}", url, reason);
            session.record_filtered(FilterKind::Url);
            return None;
        }

        if !session.mark_visited(&url) {
            return None;
        }

        let renderer = session.renderer();
        let outcome = match session.take_stashed(&url) {
            Some(outcome) => outcome,
            None => renderer.render(&url, session.config().timeout()).await,
        };

        let html = match outcome {
            Ok(html) => html,
            Err(e) => {
                if renderer.reports_status() && e.is_status_filtered() {
                    tracing::debug!("Filtered {} by status: {}", url, e);
                    session.record_filtered(FilterKind::Status);
                } else if matches!(e, FetchError::NotHtml { .. }) {
                    tracing::debug!("Skipping {}: {}", url, e);
                } else {
                    tracing::warn!("Failed to fetch {} via {}: {}", url, renderer.name(), e);
                }
                return None;
            }
        };

        match analyze(&html, &url, session.content_rules()) {
            ContentVerdict::LoginPage => {
                tracing::debug!("Filtered {}: login page content", url);
                session.record_filtered(FilterKind::Content);
                None
            }
            ContentVerdict::ErrorPage => {
                tracing::debug!("Filtered {}: error page content", url);
                session.record_filtered(FilterKind::Content);
                None
            }
            ContentVerdict::Keep(content) => {
                let length = content.text.chars().count();
                if length < session.config().min_content_length {
                    tracing::debug!("Dropping {}: only {} chars of content", url, length);
                    return None;
                }

                tracing::debug!("Kept {} ({} chars)", url, length);
                Some(ScrapedPage {
                    url: url.to_string(),
                    title: content.title,
                    content: content.text,
                })
            }
        }
    }

    fn url_rejection(&self, url: &Url) -> Option<String> {
        let session = &self.session;

        if !same_origin(url, session.base_origin()) {
            return Some("cross-origin".to_string());
        }
        if !session.robots().is_allowed(url) {
            return Some("disallowed by robots.txt".to_string());
        }
        session.filter().check(url).map(|reason| reason.to_string())
    }
}
