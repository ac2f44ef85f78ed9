//! Robots.txt handling module
//!
//! This module fetches and parses the robots.txt file of the crawl origin. Loading
//! is fail-open: any network, status or decoding failure means "no known
//! restriction", never "deny all".

mod parser;

pub use parser::{agent_token, ParsedRobots};

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Robots.txt gate for a single crawl origin
///
/// Holds the parsed rules of one origin together with the product token of the
/// configured user agent, so callers only have to ask about URLs.
#[derive(Debug, Clone)]
pub struct RobotsGate {
    robots: ParsedRobots,
    agent: String,
}

impl RobotsGate {
    /// Creates a gate from already parsed rules
    pub fn new(robots: ParsedRobots, user_agent: &str) -> Self {
        Self {
            robots,
            agent: agent_token(user_agent),
        }
    }

    /// Creates a gate that allows every URL
    pub fn allow_all(user_agent: &str) -> Self {
        Self::new(ParsedRobots::allow_all(), user_agent)
    }

    /// Loads robots.txt for the origin of `origin`
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client carrying the configured user agent and timeout
    /// * `origin` - Any URL on the crawl origin
    /// * `user_agent` - The configured user agent string
    pub async fn load(client: &Client, origin: &Url, user_agent: &str) -> Self {
        let robots = fetch_robots(client, origin).await;
        Self::new(robots, user_agent)
    }

    /// Checks if a URL may be fetched
    pub fn is_allowed(&self, url: &Url) -> bool {
        self.robots.is_allowed(url.as_str(), &self.agent)
    }

    /// Crawl delay requested for our agent, if any
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.robots
            .crawl_delay(&self.agent)
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Returns true if the gate carries real rules (robots.txt was found)
    pub fn has_rules(&self) -> bool {
        !self.robots.is_allow_all()
    }
}

/// Fetches robots.txt for an origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - Any URL on the origin whose robots.txt should be fetched
///
/// # Returns
///
/// The parsed robots.txt, or an allow-all ruleset if it could not be fetched
pub async fn fetch_robots(client: &Client, origin: &Url) -> ParsedRobots {
    let robots_url = match origin.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", origin, e);
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned HTTP {}, assuming no restrictions",
            robots_url,
            response.status().as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {} ({} bytes)", robots_url, body.len());
            ParsedRobots::from_content(&body)
        }
        Err(e) => {
            tracing::debug!("Failed to read robots.txt body from {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
