//! HTTP fetcher implementation
//!
//! This module handles all direct HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent, timeout and redirect cap
//! - GET requests for page HTML
//! - Error classification (status errors vs. transport errors)
//!
//! [`HttpRenderer`] exposes the direct path through the same [`Renderer`]
//! interface as the headless browser, so the page pipeline never branches on
//! rendering mode.

use crate::config::ScraperConfig;
use crate::render::Renderer;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connect timeout ceiling; the overall request timeout still applies
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-page fetch failure
///
/// None of these abort a crawl; the page is dropped and the failure is either
/// counted as status-filtered or only logged (see [`FetchError::is_status_filtered`]).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP {code}")]
    Status { code: u16 },

    /// Connection, TLS, redirect or body errors
    #[error("transport error: {message}")]
    Transport {
        message: String,
        /// Status code carried by the error, if any
        status: Option<u16>,
    },

    /// The request or render exceeded its timeout
    #[error("timed out")]
    Timeout,

    /// The response is not an HTML document
    #[error("not an HTML document ({content_type})")]
    NotHtml { content_type: String },

    /// The headless browser failed to render the page
    #[error("render failed: {0}")]
    Render(String),
}

impl FetchError {
    /// Returns true if this failure increments the status-filtered counter
    ///
    /// Every non-2xx response counts. A transport error counts only when it
    /// carries one of the classified statuses (404, 401, 403 or 5xx); all other
    /// failures are dropped without touching the counter.
    pub fn is_status_filtered(&self) -> bool {
        match self {
            Self::Status { .. } => true,
            Self::Transport {
                status: Some(code), ..
            } => is_classified_status(*code),
            _ => false,
        }
    }
}

/// Returns true for 404, 401, 403 and any 5xx status
fn is_classified_status(code: u16) -> bool {
    matches!(code, 401 | 403 | 404) || (500..600).contains(&code)
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to `max_redirects` hops.
///
/// # Example
///
/// ```no_run
/// use page_harvest::config::ScraperConfig;
/// use page_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(CONNECT_TIMEOUT.min(config.timeout()))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its HTML body
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Timeout for this request
pub async fn fetch_html(client: &Client, url: &Url, timeout: Duration) -> Result<String, FetchError> {
    let response = client
        .get(url.as_str())
        .timeout(timeout)
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            code: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_textual_content_type(&content_type) {
        return Err(FetchError::NotHtml { content_type });
    }

    response.text().await.map_err(classify_error)
}

/// Fetches a URL's body without HTML checks (used for XML sitemaps)
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            code: status.as_u16(),
        });
    }

    response.text().await.map_err(classify_error)
}

/// Content types that may hold a page; a missing header is given the benefit of the doubt
fn is_textual_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
}

/// Classifies a reqwest error into a [`FetchError`]
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

/// Direct-HTTP implementation of [`Renderer`]
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Wraps a configured HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    fn name(&self) -> &'static str {
        "http"
    }

    fn reports_status(&self) -> bool {
        true
    }

    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        fetch_html(&self.client, url, timeout).await
    }

    async fn close(&self) {}
}
