//! Filter counter tests: status, URL and content filters

use crate::common::{content_page, html, mount_get, test_config};
use page_harvest::{FilterCounts, Scraper};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_error_and_status_pages_are_counted() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/",
        html(content_page(
            "Home",
            &["/account", "/members", "/gone", "/outage", "/oops", "/guide"],
        )),
    )
    .await;
    mount_get(
        &server,
        "/account",
        html("<html><head><title>Sign In</title></head><body><main><p>Welcome back to your dashboard. Please enter your credentials below.</p></main></body></html>"),
    )
    .await;
    mount_get(
        &server,
        "/members",
        html(
            r#"<html><head><title>Members area</title></head><body><main>
                <p>Members get early access to every release of the product.</p>
                <form action="/session">
                    <label>Username</label><input name="user">
                    <input type="password" name="pass">
                    <button>Continue</button>
                </form>
            </main></body></html>"#,
        ),
    )
    .await;
    mount_get(&server, "/gone", ResponseTemplate::new(404)).await;
    mount_get(&server, "/outage", ResponseTemplate::new(503)).await;
    mount_get(
        &server,
        "/oops",
        html("<html><head><title>Acme</title></head><body><p>Page not found.</p></body></html>"),
    )
    .await;
    mount_get(&server, "/guide", html(content_page("Guide", &[]))).await;

    let scraper = Scraper::new(test_config(20)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    let titles: Vec<&str> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Guide"]);
    assert_eq!(
        report.filtered,
        FilterCounts {
            status: 2,
            url: 0,
            content: 3,
        }
    );
}

#[tokio::test]
async fn test_short_content_is_dropped_without_counting() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", html(content_page("Home", &["/stub"]))).await;
    mount_get(
        &server,
        "/stub",
        html("<html><head><title>Stub</title></head><body><main>Coming soon.</main></body></html>"),
    )
    .await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].title, "Home");
    assert_eq!(report.filtered, FilterCounts::default());
}

#[tokio::test]
async fn test_useless_urls_are_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/",
        html(content_page("Home", &["/login", "/wp-admin/", "/404.html", "/docs"])),
    )
    .await;
    for route in ["/login", "/wp-admin/", "/404.html"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(content_page("Should not be fetched", &[])))
            .expect(0)
            .mount(&server)
            .await;
    }
    mount_get(&server, "/docs", html(content_page("Docs", &[]))).await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_useless_seed_still_yields_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A seed that matches a URL filter is never scheduled, but its links are
    mount_get(&server, "/login", html(content_page("Login", &["/docs"]))).await;
    mount_get(&server, "/docs", html(content_page("Docs", &[]))).await;

    let scraper = Scraper::new(test_config(10)).unwrap();
    let report = scraper.scrape(&format!("{}/login", base)).await.unwrap();

    assert_eq!(report.discovered, 1);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].title, "Docs");
}

#[tokio::test]
async fn test_filters_can_be_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", html(content_page("Home", &["/login"]))).await;
    mount_get(
        &server,
        "/login",
        html("<html><head><title>Sign In</title></head><body><main><p>This sign in page is intentionally kept by this configuration.</p></main></body></html>"),
    )
    .await;

    let mut config = test_config(10);
    config.filter_login_pages = false;

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.scrape(&base).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.filtered.total(), 0);
}
