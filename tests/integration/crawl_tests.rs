//! End-to-end crawl tests: discovery, bounds and robots.txt

use crate::common::{content_page, html, mount_get, requests_to, test_config, urlset, xml};
use page_harvest::config::load_config;
use page_harvest::{ScrapeOptions, Scraper};
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_crawl_single_origin() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/robots.txt", ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /")).await;

    // The seed is read once for links and reused for its own content
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(content_page(
            "Home",
            &[
                "/a",
                "/a#section",
                "/a?utm_source=nav",
                "/b",
                "https://other.example/elsewhere",
                "/logo.png",
            ],
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, "/a", html(content_page("Page A", &["/b", "/"]))).await;
    mount_get(&server, "/b", html(content_page("Page B", &[]))).await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    let origin = Url::parse(&base).unwrap().origin();
    for page in &report.pages {
        assert_eq!(Url::parse(&page.url).unwrap().origin(), origin, "{} left the origin", page.url);
    }

    let unique: HashSet<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(unique.len(), report.pages.len(), "duplicate pages returned");

    let mut titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Home", "Page A", "Page B"]);
    assert_eq!(report.discovered, 3);
    assert_eq!(requests_to(&server, "/a").await, 1);
    assert_eq!(requests_to(&server, "/logo.png").await, 0);
}

#[tokio::test]
async fn test_robots_disallowed_path_is_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /foo"),
    )
    .await;
    mount_get(&server, "/sitemap.xml", xml(urlset(&base, &["/foo/listed".to_string()]))).await;
    mount_get(&server, "/", html(content_page("Home", &["/foo", "/bar"]))).await;
    Mock::given(method("GET"))
        .and(path("/foo"))
        .respond_with(html(content_page("Forbidden fruit", &[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/foo/listed"))
        .respond_with(html(content_page("Listed but forbidden", &[])))
        .expect(0)
        .mount(&server)
        .await;
    mount_get(&server, "/bar", html(content_page("Bar", &[]))).await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert!(report.pages.iter().all(|p| !Url::parse(&p.url).unwrap().path().starts_with("/foo")));
    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_robots_txt_failure_allows_everything() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/robots.txt", ResponseTemplate::new(500)).await;
    mount_get(&server, "/", html(content_page("Home", &["/foo"]))).await;
    mount_get(&server, "/foo", html(content_page("Foo", &[]))).await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_sitemap_index_children_are_expanded() {
    let server = MockServer::start().await;
    let base = server.uri();

    let first: Vec<String> = (1..=3).map(|i| format!("/docs/{}", i)).collect();
    let second: Vec<String> = (1..=4).map(|i| format!("/blog/{}", i)).collect();
    let index = format!(
        "<sitemapindex><sitemap><loc>{0}/sitemap-docs.xml</loc></sitemap><sitemap><loc>{0}/sitemap-blog.xml</loc></sitemap></sitemapindex>",
        base
    );

    mount_get(&server, "/sitemap.xml", ResponseTemplate::new(404)).await;
    mount_get(&server, "/sitemap_index.xml", xml(index)).await;
    mount_get(&server, "/sitemap-docs.xml", xml(urlset(&base, &first))).await;
    mount_get(&server, "/sitemap-blog.xml", xml(urlset(&base, &second))).await;
    // Seed is too short to keep and has no links
    mount_get(&server, "/", html("<html><body><p>Welcome</p></body></html>")).await;
    for route in first.iter().chain(&second) {
        mount_get(&server, route, html(content_page(route, &[]))).await;
    }

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 7);
    assert_eq!(report.discovered, 8);
    assert_eq!(report.filtered.total(), 0);
}

#[tokio::test]
async fn test_max_pages_bounds_results_and_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    let routes: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    mount_get(&server, "/sitemap.xml", xml(urlset(&base, &routes))).await;
    mount_get(&server, "/", html(content_page("Home", &[]))).await;
    for route in &routes {
        mount_get(&server, route, html(content_page(route, &[]))).await;
    }

    let scraper = Scraper::new(test_config(2)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 2);

    let mut page_fetches = 0;
    for route in &routes {
        page_fetches += requests_to(&server, route).await;
    }
    assert!(page_fetches < 10, "fetched {} sitemap pages", page_fetches);
}

#[tokio::test]
async fn test_scrape_with_loaded_config_file() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", html(content_page("Home", &["/tag/rust", "/guide"]))).await;
    mount_get(&server, "/guide", html(content_page("Guide", &[]))).await;
    Mock::given(method("GET"))
        .and(path("/tag/rust"))
        .respond_with(html(content_page("Tag", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max-pages = 5
concurrency = 2
batch-delay-ms = 0
custom-filter-patterns = ["^/tag/"]
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let scraper = Scraper::new(config).unwrap();
    let report = scraper.scrape_with(&base, ScrapeOptions::default()).await.unwrap();

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Guide"]);
}

#[tokio::test]
async fn test_failing_seed_is_requested_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.discovered, 1);
    assert_eq!(report.filtered.status, 1);
    assert_eq!(requests_to(&server, "/").await, 1);
}

#[tokio::test]
async fn test_slow_seed_times_out_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/",
        html(content_page("Home", &[])).set_delay(Duration::from_millis(1_500)),
    )
    .await;

    let mut config = test_config(10);
    config.timeout_ms = 300;

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.filtered.total(), 0);
    assert_eq!(requests_to(&server, "/").await, 1);
}

#[tokio::test]
async fn test_page_timeout_fails_only_that_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", html(content_page("Home", &["/a", "/slow", "/b"]))).await;
    mount_get(&server, "/a", html(content_page("Page A", &[]))).await;
    mount_get(
        &server,
        "/slow",
        html(content_page("Slow", &[])).set_delay(Duration::from_millis(2_000)),
    )
    .await;
    mount_get(&server, "/b", html(content_page("Page B", &[]))).await;

    let mut config = test_config(10);
    config.timeout_ms = 300;

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Page A", "Page B"]);
    assert_eq!(report.discovered, 4);
    assert_eq!(report.filtered.status, 0);
    assert_eq!(report.filtered.total(), 0);
}
