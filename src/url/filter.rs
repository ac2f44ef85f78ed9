//! URL-pattern filtering
//!
//! Decides, from the URL alone, whether a candidate is worth fetching. Rules are
//! plain data tables so each one can be tested and extended on its own; custom
//! regular expressions come from configuration.

use crate::config::ScraperConfig;
use regex::Regex;
use std::fmt;
use url::Url;

/// Path segments identifying login, logout, registration and password-reset pages
const LOGIN_SEGMENTS: &[&str] = &[
    "login",
    "log-in",
    "log_in",
    "logon",
    "signin",
    "sign-in",
    "sign_in",
    "logout",
    "log-out",
    "signout",
    "sign-out",
    "auth",
    "authenticate",
    "authorize",
    "oauth",
    "sso",
    "register",
    "registration",
    "signup",
    "sign-up",
    "sign_up",
    "forgot-password",
    "forgot_password",
    "reset-password",
    "password-reset",
    "lost-password",
    "wp-admin",
    "wp-login",
];

/// Path segments identifying error pages
const ERROR_SEGMENTS: &[&str] = &[
    "401",
    "403",
    "404",
    "500",
    "502",
    "503",
    "error",
    "errors",
    "not-found",
    "notfound",
    "page-not-found",
    "unauthorized",
    "forbidden",
    "access-denied",
    "server-error",
];

/// File extensions that never lead to an HTML page
const NON_PAGE_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "webp", "avif", "svg", "ico", "bmp", "tif", "tiff",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // stylesheets and scripts
    "css", "js", "mjs", "map",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "rar", "7z",
    // media
    "mp3", "mp4", "m4a", "wav", "ogg", "webm", "avi", "mov", "mkv", "flac",
    // data documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "csv", "json", "xml", "txt",
];

/// Why a URL was rejected by [`UrlFilter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    /// Path looks like a login/registration/password page
    LoginPath,
    /// Path looks like an error page
    ErrorPath,
    /// Matched a configured custom pattern
    CustomPattern(String),
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginPath => write!(f, "login page pattern"),
            Self::ErrorPath => write!(f, "error page pattern"),
            Self::CustomPattern(pattern) => write!(f, "custom pattern '{}'", pattern),
        }
    }
}

/// Compiled URL-pattern filter for one crawl session
#[derive(Debug, Clone)]
pub struct UrlFilter {
    filter_login_pages: bool,
    filter_error_pages: bool,
    custom_patterns: Vec<Regex>,
}

impl UrlFilter {
    /// Builds a filter, compiling custom patterns
    ///
    /// Patterns that fail to compile are logged and skipped.
    pub fn new(filter_login_pages: bool, filter_error_pages: bool, patterns: &[String]) -> Self {
        let custom_patterns = patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Ignoring invalid custom filter pattern '{}': {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            filter_login_pages,
            filter_error_pages,
            custom_patterns,
        }
    }

    /// Builds the filter described by a scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            config.filter_login_pages,
            config.filter_error_pages,
            &config.custom_filter_patterns,
        )
    }

    /// Number of custom patterns that compiled successfully
    pub fn custom_pattern_count(&self) -> usize {
        self.custom_patterns.len()
    }

    /// Returns the reason the URL is rejected, or `None` if it may be fetched
    pub fn check(&self, url: &Url) -> Option<FilterReason> {
        let path = url.path().to_lowercase();

        if self.filter_login_pages && has_segment_in(&path, LOGIN_SEGMENTS) {
            return Some(FilterReason::LoginPath);
        }

        if self.filter_error_pages && has_segment_in(&path, ERROR_SEGMENTS) {
            return Some(FilterReason::ErrorPath);
        }

        self.custom_patterns
            .iter()
            .find(|regex| regex.is_match(&path) || regex.is_match(url.as_str()))
            .map(|regex| FilterReason::CustomPattern(regex.as_str().to_string()))
    }
}

/// Checks whether any path segment, ignoring a file extension, is in the table
fn has_segment_in(path: &str, table: &[&str]) -> bool {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.split('.').next().unwrap_or(segment))
        .any(|stem| table.contains(&stem))
}

/// Returns true if the path ends in an extension that cannot be an HTML page
///
/// # Examples
///
/// ```
/// use page_harvest::url::has_non_page_extension;
///
/// assert!(has_non_page_extension("/assets/logo.PNG"));
/// assert!(has_non_page_extension("/files/report.pdf"));
/// assert!(!has_non_page_extension("/docs/getting-started"));
/// assert!(!has_non_page_extension("/about.html"));
/// ```
pub fn has_non_page_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    match last_segment.rsplit_once('.') {
        Some((_, ext)) => NON_PAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}
