//! URL handling module for Page-Harvest
//!
//! This module provides URL normalization, origin comparison and the URL-pattern
//! filter that rejects useless pages before any network fetch.

mod filter;
mod normalize;

// Re-export main functions
pub use filter::{has_non_page_extension, FilterReason, UrlFilter};
pub use normalize::{normalize_url, origin_url, strip_query_and_fragment};

use url::Url;

/// Returns true if both URLs share scheme, host and port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvest::url::same_origin;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("https://example.com:443/b?q=1").unwrap();
/// let c = Url::parse("http://example.com/a").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
