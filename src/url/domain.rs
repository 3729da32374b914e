use url::Url;

/// Computes the normalized domain key of a URL
///
/// The key is the lowercase host with a leading `www.` removed. A port that
/// differs from the scheme's default is kept as `host:port`, so two services
/// on the same host are treated as different domains.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use coverage_gap::url::normalized_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(normalized_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(normalized_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn normalized_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Parses a URL string and returns its normalized domain key
pub fn domain_of(url_str: &str) -> Option<String> {
    Url::parse(url_str.trim())
        .ok()
        .and_then(|url| normalized_domain(&url))
}

/// Returns the root of a URL: scheme and authority without path, query or fragment
///
/// # Examples
///
/// ```
/// use url::Url;
/// use coverage_gap::url::root_url;
///
/// let url = Url::parse("https://www.example.com/investors/annual?x=1#top").unwrap();
/// assert_eq!(root_url(&url), Some("https://www.example.com".to_string()));
/// ```
pub fn root_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host.is_empty() {
        return None;
    }

    match url.port() {
        Some(port) => Some(format!("{}://{}:{}", url.scheme(), host, port)),
        None => Some(format!("{}://{}", url.scheme(), host)),
    }
}
