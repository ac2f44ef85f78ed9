//! XML sitemap discovery
//!
//! Reads `/sitemap.xml`, falling back to `/sitemap_index.xml`, and expands one
//! level of `<sitemapindex>`. Every failure is swallowed: sitemaps only add
//! candidates, they never stop a crawl.

use super::fetcher::fetch_text;
use crate::robots::RobotsGate;
use crate::url::{normalize_url, same_origin, UrlFilter};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Sitemap locations tried in order; the first one yielding URLs wins
const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: child sitemap locations
    Index(Vec<String>),
}

/// Parses a sitemap or sitemap index, collecting trimmed `<loc>` values
///
/// Namespace prefixes are ignored and CDATA sections are accepted. A document
/// whose root is neither `<urlset>` nor `<sitemapindex>` is treated as a url set.
///
/// # Example
///
/// ```
/// use page_harvest::crawler::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc> https://example.com/a </loc></url></urlset>"#;
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc, SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()]));
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut is_index = false;
    let mut in_loc = false;
    let mut current = String::new();
    let mut locations = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sitemapindex" => is_index = true,
                b"loc" => {
                    in_loc = true;
                    current.clear();
                }
                _ => {}
            },
            Event::Text(t) if in_loc => current.push_str(&t.unescape()?),
            Event::CData(c) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let loc = current.trim();
                if !loc.is_empty() {
                    locations.push(loc.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(if is_index {
        SitemapDocument::Index(locations)
    } else {
        SitemapDocument::UrlSet(locations)
    })
}

/// Discovers candidate page URLs from the origin's sitemap
pub struct SitemapReader<'a> {
    client: &'a Client,
    origin: &'a Url,
    robots: &'a RobotsGate,
    filter: &'a UrlFilter,
}

impl<'a> SitemapReader<'a> {
    /// Creates a reader for one crawl origin
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for sitemap requests
    /// * `origin` - Any URL on the crawl origin
    /// * `robots` - Gate every discovered URL must pass
    /// * `filter` - URL-pattern filter every discovered URL must pass
    pub fn new(client: &'a Client, origin: &'a Url, robots: &'a RobotsGate, filter: &'a UrlFilter) -> Self {
        Self {
            client,
            origin,
            robots,
            filter,
        }
    }

    /// Returns the filtered URLs of the first sitemap source that yields any
    pub async fn discover(&self) -> Vec<Url> {
        for sitemap_path in SITEMAP_PATHS {
            let sitemap_url = match self.origin.join(sitemap_path) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Cannot build sitemap URL {}: {}", sitemap_path, e);
                    continue;
                }
            };

            let locations = self.read_source(&sitemap_url).await;
            if locations.is_empty() {
                continue;
            }

            let urls = self.accept(locations);
            tracing::debug!("Sitemap {} yielded {} usable URLs", sitemap_url, urls.len());
            return urls;
        }

        Vec::new()
    }

    /// Reads one sitemap source, expanding an index by one level
    async fn read_source(&self, sitemap_url: &Url) -> Vec<String> {
        let document = match self.fetch_document(sitemap_url).await {
            Some(document) => document,
            None => return Vec::new(),
        };

        match document {
            SitemapDocument::UrlSet(locations) => locations,
            SitemapDocument::Index(children) => {
                tracing::debug!("{} is a sitemap index with {} children", sitemap_url, children.len());
                let mut locations = Vec::new();

                for child in children {
                    let child_url = match normalize_url(&child) {
                        Ok(url) if same_origin(&url, self.origin) => url,
                        Ok(url) => {
                            tracing::debug!("Skipping cross-origin child sitemap {}", url);
                            continue;
                        }
                        Err(e) => {
                            tracing::debug!("Skipping malformed child sitemap '{}': {}", child, e);
                            continue;
                        }
                    };

                    match self.fetch_document(&child_url).await {
                        Some(SitemapDocument::UrlSet(child_locations)) => {
                            locations.extend(child_locations)
                        }
                        Some(SitemapDocument::Index(_)) => {
                            tracing::debug!("Ignoring nested sitemap index {}", child_url);
                        }
                        None => {}
                    }
                }

                locations
            }
        }
    }

    async fn fetch_document(&self, url: &Url) -> Option<SitemapDocument> {
        let body = match fetch_text(self.client, url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Sitemap {} unavailable: {}", url, e);
                return None;
            }
        };

        match parse_sitemap(&body) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!("Failed to parse sitemap {}: {}", url, e);
                None
            }
        }
    }

    /// Keeps same-origin, robots-allowed, useful URLs, deduplicated in order
    fn accept(&self, locations: Vec<String>) -> Vec<Url> {
        let mut seen = HashSet::new();

        locations
            .into_iter()
            .filter_map(|loc| normalize_url(&loc).ok())
            .filter(|url| same_origin(url, self.origin))
            .filter(|url| self.robots.is_allowed(url))
            .filter(|url| self.filter.check(url).is_none())
            .filter(|url| seen.insert(url.as_str().to_string()))
            .collect()
    }
}
