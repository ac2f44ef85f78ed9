//! Page rendering engines
//!
//! A [`Renderer`] turns a URL into an HTML document. The crawler always talks to
//! one renderer per session: the direct HTTP path ([`crate::crawler::HttpRenderer`])
//! or, when JavaScript rendering is enabled, a headless Chromium instance
//! (`browser` cargo feature). Engines are created by a [`RenderLauncher`] so
//! callers can plug in their own.

mod locate;

#[cfg(feature = "browser")]
mod browser;

pub use locate::{BrowserLocator, BROWSER_ENV_OVERRIDES};

#[cfg(feature = "browser")]
pub use browser::ChromiumRenderer;

use crate::config::ScraperConfig;
use crate::crawler::FetchError;
use crate::HarvestError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A page rendering engine
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Short engine name used in log lines
    fn name(&self) -> &'static str;

    /// Returns true if failures carry HTTP statuses worth counting
    ///
    /// Browser engines only see the rendered document, so their failures are
    /// logged without touching the status-filtered counter.
    fn reports_status(&self) -> bool {
        false
    }

    /// Fetches (and renders) a URL, returning the resulting HTML
    ///
    /// # Arguments
    ///
    /// * `url` - The page to load
    /// * `timeout` - Upper bound for the whole load
    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, FetchError>;

    /// Releases the engine's resources
    ///
    /// Called exactly once per session, after the last `render`.
    async fn close(&self);
}

/// Creates the rendering engine for a session that has JavaScript rendering enabled
#[async_trait]
pub trait RenderLauncher: Send + Sync {
    /// Launches an engine for one crawl session
    ///
    /// A failure here is fatal for the session.
    async fn launch(&self, config: &ScraperConfig) -> Result<Arc<dyn Renderer>, HarvestError>;
}

/// Launches headless Chromium, resolving the binary with [`BrowserLocator`]
///
/// In builds without the `browser` feature every launch fails with
/// [`HarvestError::RenderingUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    locator: BrowserLocator,
}

impl ChromiumLauncher {
    /// Creates a launcher using the standard binary search order
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RenderLauncher for ChromiumLauncher {
    async fn launch(&self, config: &ScraperConfig) -> Result<Arc<dyn Renderer>, HarvestError> {
        launch_chromium(&self.locator, config).await
    }
}

#[cfg(feature = "browser")]
async fn launch_chromium(
    locator: &BrowserLocator,
    config: &ScraperConfig,
) -> Result<Arc<dyn Renderer>, HarvestError> {
    let executable = locator.resolve()?;
    tracing::info!("Launching headless browser: {}", executable.display());

    let renderer = ChromiumRenderer::launch(&executable, config).await?;
    Ok(Arc::new(renderer))
}

#[cfg(not(feature = "browser"))]
async fn launch_chromium(
    _locator: &BrowserLocator,
    _config: &ScraperConfig,
) -> Result<Arc<dyn Renderer>, HarvestError> {
    Err(HarvestError::RenderingUnavailable)
}
