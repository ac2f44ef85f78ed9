//! Shared fixtures for integration tests

use page_harvest::ScraperConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Paragraph long enough to pass the minimum content length
pub const BODY_TEXT: &str =
    "This page explains the product in enough detail to be worth indexing for search.";

/// Creates a test configuration with no inter-batch delay
pub fn test_config(max_pages: usize) -> ScraperConfig {
    ScraperConfig {
        max_pages,
        timeout_ms: 5_000,
        batch_delay_ms: 0,
        user_agent: "HarvestTestBot/1.0 (+https://example.com/bot)".to_string(),
        ..ScraperConfig::default()
    }
}

/// An HTML response
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// An XML response
pub fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "application/xml")
}

/// A content page with a title, the standard body text and optional links
pub fn content_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><nav>{}</nav><main><p>{}</p></main></body></html>",
        title, anchors, BODY_TEXT
    )
}

/// A url set listing the given paths on `base`
pub fn urlset(base: &str, paths: &[String]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base, p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// Mounts a GET mock for `route`
pub async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Number of GET requests the server received for `route`
pub async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}
