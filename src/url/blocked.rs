use url::Url;

/// Domains that are never crawled and never reported
///
/// Object-storage hosts serve uploaded files rather than site pages. This is
/// a fixed policy, not a configuration option.
pub const BLOCKED_DOMAINS: &[&str] = &["*.s3.amazonaws.com", "*.amazonaws.com"];

/// Matches a host against a blocked-domain pattern
///
/// A plain pattern matches only itself. A `*.` pattern matches its base
/// domain and every subdomain below it, at any depth.
///
/// # Examples
///
/// ```
/// use coverage_gap::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.amazonaws.com", "amazonaws.com"));
/// assert!(matches_wildcard("*.amazonaws.com", "bucket.s3.amazonaws.com"));
/// assert!(!matches_wildcard("*.amazonaws.com", "notamazonaws.com"));
/// assert!(!matches_wildcard("cdn.acme.com", "acme.com"));
/// ```
pub fn matches_wildcard(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .map_or(false, |prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}

/// Returns true if a host belongs to a permanently blocked domain
pub fn is_blocked_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_lowercase();
    BLOCKED_DOMAINS
        .iter()
        .any(|pattern| matches_wildcard(pattern, &host))
}

/// Returns the host of a URL string if it is on a blocked domain
pub fn blocked_host(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str.trim()).ok()?;
    let host = url.host_str()?;
    if is_blocked_host(host) {
        Some(host.to_lowercase())
    } else {
        None
    }
}

/// Returns true if a URL string points at a permanently blocked domain
///
/// Unparseable strings are not considered blocked; callers drop them on
/// their own terms.
pub fn is_blocked_url(url_str: &str) -> bool {
    blocked_host(url_str).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pattern_is_exact() {
        assert!(matches_wildcard("cdn.acme.com", "cdn.acme.com"));
        assert!(!matches_wildcard("cdn.acme.com", "img.cdn.acme.com"));
    }

    #[test]
    fn test_star_pattern_needs_label_boundary() {
        assert!(matches_wildcard("*.acme.com", "a.b.c.acme.com"));
        assert!(!matches_wildcard("*.acme.com", "notacme.com"));
        assert!(!matches_wildcard("*.acme.com", "acme.com.evil.org"));
    }

    #[test]
    fn test_blocked_s3_hosts() {
        assert!(is_blocked_host("s3.amazonaws.com"));
        assert!(is_blocked_host("my-bucket.s3.amazonaws.com"));
        assert!(is_blocked_host("S3.AmazonAWS.com"));
        assert!(is_blocked_host("bucket.s3.us-east-1.amazonaws.com"));
    }

    #[test]
    fn test_not_blocked() {
        assert!(!is_blocked_host("example.com"));
        assert!(!is_blocked_host("notamazonaws.com"));
    }

    #[test]
    fn test_blocked_url() {
        assert!(is_blocked_url("https://s3.amazonaws.com/bucket/file.pdf"));
        assert!(is_blocked_url("https://files.s3.amazonaws.com:443/report"));
        assert!(!is_blocked_url("https://acme.com/investors"));
        assert!(!is_blocked_url("definitely not a url"));
    }

    #[test]
    fn test_blocked_host_reported() {
        assert_eq!(
            blocked_host("https://Bucket.S3.amazonaws.com/x"),
            Some("bucket.s3.amazonaws.com".to_string())
        );
        assert_eq!(blocked_host("https://acme.com/"), None);
    }
}
