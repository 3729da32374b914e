use crate::UrlError;
use url::Url;

/// Tracking query parameters removed during normalization (besides `utm_*`)
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid"];

/// Normalizes a URL according to the crawler's normalization rules
///
/// # Normalization Steps
///
/// 1. Parse; malformed input is an error
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Remove fragment (everything after #)
/// 4. Normalize path:
///    - Empty path or a path made only of slashes becomes /
///    - Trailing slashes are removed from any other path
/// 5. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`),
///    keeping the remaining parameters in their original order
/// 6. Remove empty query string (trailing ?)
///
/// Host case is folded by the URL parser itself. The `www.` prefix is kept
/// in the URL; domain comparisons go through [`normalized_domain`].
///
/// Normalization is idempotent: normalizing an already normalized URL
/// returns it unchanged.
///
/// [`normalized_domain`]: crate::url::normalized_domain
///
/// # Examples
///
/// ```
/// use coverage_gap::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/news/?utm_source=x&id=7#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/news?id=7");
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
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    let filtered_query = url.query().map(filter_query);
    if let Some(query) = filtered_query {
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Collapses slash-only paths to `/` and strips trailing slashes elsewhere
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Drops tracking pairs from a raw query string, preserving order and encoding
fn filter_query(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !is_tracking_param(key)
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}
