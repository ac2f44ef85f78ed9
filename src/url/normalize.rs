use crate::UrlError;
use url::Url;

/// Normalizes a URL string for use as a crawl candidate
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Only HTTP and HTTPS schemes are accepted
/// 3. A host is required
/// 4. Remove fragment (everything after #)
///
/// Scheme and host are lowercased and an empty path becomes `/` by the parser
/// itself. The query string is kept; sitemap URLs may legitimately carry one.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use page_harvest::url::normalize_url;
///
/// let url = normalize_url("  HTTPS://Example.COM/Docs#intro ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Removes both the query string and the fragment from a URL
///
/// Links harvested from a page are reduced to their path so that
/// `/pricing?ref=nav` and `/pricing#plans` collapse into one candidate.
pub fn strip_query_and_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    stripped
}

/// Returns the root URL (`scheme://host[:port]/`) of a URL's origin
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvest::url::origin_url;
///
/// let url = Url::parse("http://127.0.0.1:8080/a/b?c=d").unwrap();
/// assert_eq!(origin_url(&url).as_str(), "http://127.0.0.1:8080/");
/// ```
pub fn origin_url(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    // Credentials never belong to the crawl origin
    let _ = root.set_username("");
    let _ = root.set_password(None);
    root
}
