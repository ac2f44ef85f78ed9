//! Headless Chromium renderer
//!
//! One browser process per crawl session, a fresh tab per URL. Image, font and
//! media requests are failed at the network layer so pages settle faster.

use super::Renderer;
use crate::config::ScraperConfig;
use crate::crawler::FetchError;
use crate::HarvestError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, SetLifecycleEventsEnabledParams};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// Lifecycle event fired once the network has been quiet for 500ms
const NETWORK_IDLE: &str = "networkIdle";

/// Distinguishes profile directories of sessions launched by the same process
static PROFILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Headless Chromium implementation of [`Renderer`]
pub struct ChromiumRenderer {
    browser: Mutex<Option<Browser>>,
    handler: std::sync::Mutex<Option<JoinHandle<()>>>,
    profile_dir: PathBuf,
}

impl ChromiumRenderer {
    /// Launches a headless browser for one session
    ///
    /// # Arguments
    ///
    /// * `executable` - Resolved Chrome/Chromium binary
    /// * `config` - Supplies the timeout, user agent and V8 heap limit
    pub async fn launch(executable: &Path, config: &ScraperConfig) -> Result<Self, HarvestError> {
        let profile_dir = std::env::temp_dir().join(format!(
            "page-harvest-{}-{}",
            std::process::id(),
            PROFILE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let browser_config = BrowserConfig::builder()
            .chrome_executable(executable)
            .user_data_dir(&profile_dir)
            .request_timeout(config.timeout())
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--mute-audio")
            .arg(format!(
                "--js-flags=--max-old-space-size={}",
                config.browser_memory_limit_mb
            ))
            .arg(format!("--user-agent={}", config.user_agent))
            .build()
            .map_err(|e| HarvestError::Render(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| HarvestError::Render(format!("failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler error: {}", e);
                }
            }
            tracing::debug!("Browser handler task completed");
        });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: std::sync::Mutex::new(Some(handler_task)),
            profile_dir,
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn render(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| FetchError::Render("browser already closed".to_string()))?;

        let page = browser.new_page("about:blank").await.map_err(render_error)?;
        let interceptor = match block_heavy_resources(&page).await {
            Ok(task) => task,
            Err(e) => {
                close_page(page).await;
                return Err(e);
            }
        };

        let result = match tokio::time::timeout(timeout, load(&page, url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };

        interceptor.abort();
        close_page(page).await;
        result
    }

    async fn close(&self) {
        let handler = match self.handler.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = browser.wait().await {
                tracing::debug!("Waiting for browser exit failed: {}", e);
            }
            tracing::info!("Headless browser closed");
        }

        if let Some(task) = handler {
            task.abort();
        }

        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            tracing::debug!("Failed to remove browser profile {}: {}", self.profile_dir.display(), e);
        }
    }
}

/// Installs request interception that fails image, font and media loads
async fn block_heavy_resources(page: &Page) -> Result<JoinHandle<()>, FetchError> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(render_error)?;

    let intercept_page = page.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let outcome = if matches!(
                event.resource_type,
                ResourceType::Image | ResourceType::Font | ResourceType::Media
            ) {
                intercept_page
                    .execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
            } else {
                intercept_page
                    .execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };

            if let Err(e) = outcome {
                tracing::trace!("Intercepted request could not be resolved: {}", e);
            }
        }
    });

    let enable = EnableParams::builder()
        .pattern(RequestPattern::builder().url_pattern("*").build())
        .build();
    if let Err(e) = page.execute(enable).await {
        task.abort();
        return Err(render_error(e));
    }

    Ok(task)
}

/// Navigates and waits for the main frame's network to go idle, then returns the DOM
async fn load(page: &Page, url: &Url) -> Result<String, FetchError> {
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .map_err(render_error)?;
    let main_frame = page.mainframe().await.map_err(render_error)?;
    let mut lifecycle = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .map_err(render_error)?;

    page.goto(url.as_str()).await.map_err(render_error)?;

    // Events from the about:blank load may still be queued; only the loader
    // announced by the navigation's own "init" event counts.
    let mut current_loader = None;
    while let Some(event) = lifecycle.next().await {
        if main_frame.as_ref().is_some_and(|frame| frame != &event.frame_id) {
            continue;
        }
        if event.name == "init" {
            current_loader = Some(event.loader_id.clone());
        } else if event.name == NETWORK_IDLE && current_loader.as_ref() == Some(&event.loader_id) {
            break;
        }
    }

    page.content().await.map_err(render_error)
}

async fn close_page(page: Page) {
    if let Err(e) = page.close().await {
        tracing::debug!("Failed to close browser tab: {}", e);
    }
}

fn render_error(e: impl std::fmt::Display) -> FetchError {
    FetchError::Render(e.to_string())
}
