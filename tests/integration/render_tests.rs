//! Render engine lifecycle tests with a fake engine

use crate::common::{content_page, test_config};
use async_trait::async_trait;
use page_harvest::crawler::FetchError;
use page_harvest::render::{RenderLauncher, Renderer};
use page_harvest::{HarvestError, ScrapeOptions, Scraper, ScraperConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

/// Serves canned pages and records how it was used
#[derive(Default)]
struct FakeEngine {
    renders: AtomicUsize,
    closes: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl Renderer for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn render(&self, url: &Url, _timeout: Duration) -> Result<String, FetchError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match url.path() {
            "/" => Ok(content_page("Rendered home", &["/a", "/b", "/c"])),
            "/missing" => Err(FetchError::Status { code: 404 }),
            other => Ok(content_page(&format!("Rendered {}", other), &[])),
        }
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct FakeLauncher {
    launches: AtomicUsize,
    engine: Arc<FakeEngine>,
    fail: bool,
}

#[async_trait]
impl RenderLauncher for FakeLauncher {
    async fn launch(&self, _config: &ScraperConfig) -> Result<Arc<dyn Renderer>, HarvestError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HarvestError::BrowserNotFound {
                searched: "/nowhere/chrome".to_string(),
            });
        }
        let engine: Arc<dyn Renderer> = self.engine.clone();
        Ok(engine)
    }
}

#[tokio::test]
async fn test_render_engine_opened_and_closed_once() {
    // Serves robots.txt and sitemap requests (all 404)
    let server = MockServer::start().await;
    let launcher = Arc::new(FakeLauncher::default());

    let mut config = test_config(10);
    config.concurrency = 5;
    let scraper = Scraper::with_launcher(config, launcher.clone()).unwrap();
    let report = scraper
        .scrape_with(&server.uri(), ScrapeOptions::rendered())
        .await
        .unwrap();

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Rendered home", "Rendered /a", "Rendered /b", "Rendered /c"]);

    let engine = &launcher.engine;
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
    assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
    // Seed rendered once for links, then reused from the stash
    assert_eq!(engine.renders.load(Ordering::SeqCst), 4);
    assert_eq!(engine.max_in_flight.load(Ordering::SeqCst), 1, "rendering must be sequential");
}

#[tokio::test]
async fn test_render_engine_errors_are_not_status_counted() {
    struct MissingEngine;

    #[async_trait]
    impl Renderer for MissingEngine {
        fn name(&self) -> &'static str {
            "missing"
        }

        async fn render(&self, _url: &Url, _timeout: Duration) -> Result<String, FetchError> {
            Err(FetchError::Status { code: 404 })
        }

        async fn close(&self) {}
    }

    struct MissingLauncher;

    #[async_trait]
    impl RenderLauncher for MissingLauncher {
        async fn launch(&self, _config: &ScraperConfig) -> Result<Arc<dyn Renderer>, HarvestError> {
            Ok(Arc::new(MissingEngine))
        }
    }

    let server = MockServer::start().await;
    let scraper = Scraper::with_launcher(test_config(10), Arc::new(MissingLauncher)).unwrap();
    let report = scraper
        .scrape_with(&server.uri(), ScrapeOptions::rendered())
        .await
        .unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.filtered.status, 0);
}

#[tokio::test]
async fn test_engine_closed_when_session_panics() {
    #[derive(Default)]
    struct PanickingEngine {
        closes: AtomicUsize,
    }

    #[async_trait]
    impl Renderer for PanickingEngine {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn render(&self, _url: &Url, _timeout: Duration) -> Result<String, FetchError> {
            panic!("engine crashed");
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct PanickingLauncher {
        engine: Arc<PanickingEngine>,
    }

    #[async_trait]
    impl RenderLauncher for PanickingLauncher {
        async fn launch(&self, _config: &ScraperConfig) -> Result<Arc<dyn Renderer>, HarvestError> {
            let engine: Arc<dyn Renderer> = self.engine.clone();
            Ok(engine)
        }
    }

    let server = MockServer::start().await;
    let engine = Arc::new(PanickingEngine::default());
    let launcher = Arc::new(PanickingLauncher { engine: engine.clone() });

    let scraper = Scraper::with_launcher(test_config(10), launcher).unwrap();
    let result = scraper.scrape_with(&server.uri(), ScrapeOptions::rendered()).await;

    assert!(matches!(result, Err(HarvestError::SessionAborted(_))));
    assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_launch_failure_is_fatal() {
    let server = MockServer::start().await;
    let launcher = Arc::new(FakeLauncher {
        fail: true,
        ..FakeLauncher::default()
    });

    let scraper = Scraper::with_launcher(test_config(10), launcher.clone()).unwrap();
    let result = scraper.scrape_with(&server.uri(), ScrapeOptions::rendered()).await;

    assert!(matches!(result, Err(HarvestError::BrowserNotFound { .. })));
    assert_eq!(launcher.engine.renders.load(Ordering::SeqCst), 0);
    // Nothing was fetched, not even robots.txt
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_launcher_unused_without_rendering() {
    let server = MockServer::start().await;
    let launcher = Arc::new(FakeLauncher::default());

    let scraper = Scraper::with_launcher(test_config(10), launcher.clone()).unwrap();
    let report = scraper.scrape(&server.uri()).await.unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
}

#[cfg(not(feature = "browser"))]
#[tokio::test]
async fn test_rendering_unavailable_without_browser_feature() {
    let scraper = Scraper::new(test_config(10)).unwrap();
    let result = scraper
        .scrape_with("https://example.com/", ScrapeOptions::rendered())
        .await;
    assert!(matches!(result, Err(HarvestError::RenderingUnavailable)));
}
