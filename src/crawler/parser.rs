//! HTML link extraction
//!
//! This module pulls candidate page links out of a fetched document:
//! - `<a href>` links resolved against the page URL
//! - Special schemes, fragment-only and download links skipped
//! - Only same-origin pages kept, with query and fragment stripped

use crate::url::{has_non_page_extension, same_origin, strip_query_and_fragment};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts same-origin page links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document, `rel="nofollow"` included
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - `<a href="..." download>`
/// - Links to another origin
/// - Paths ending in an image, font, stylesheet, script, archive, media or
///   data-document extension
///
/// Query and fragment are removed and duplicates dropped, keeping document order.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL, used to resolve relative links and as the origin
///
/// # Example
///
/// ```
/// use page_harvest::crawler::extract_page_links;
/// use url::Url;
///
/// let html = r#"<a href="/docs?x=1#top">Docs</a><a href="https://other.com/">Other</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_page_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/docs");
/// ```
pub fn extract_page_links(html: &str, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();

    extract_links(html, base_url)
        .into_iter()
        .filter(|url| same_origin(url, base_url))
        .map(|url| strip_query_and_fragment(&url))
        .filter(|url| !has_non_page_extension(url.path()))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

/// Extracts all followable http(s) links from an HTML document, any origin
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
}
