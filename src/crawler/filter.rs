//! Link validation for discovered hrefs
//!
//! A link survives when it is http(s), lands on one of the run's allowed
//! domains, does not point at a non-HTML asset and does not hit one of the
//! excluded path shapes (CMS internals, auth and cart flows, feeds).

use crate::url::{is_blocked_url, normalize_url, normalized_domain};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Path suffixes of resources that are never HTML pages
pub const SKIP_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz",
    ".7z", ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".ico", ".webp", ".mp3", ".mp4",
    ".avi", ".mov", ".wmv", ".flv", ".wav", ".css", ".js", ".woff", ".woff2", ".ttf", ".eot",
    ".otf", ".exe", ".dmg", ".msi", ".apk",
];

/// Patterns searched in the lowercased full URL
pub const SKIP_PATH_PATTERNS: &[&str] = &[
    r"/wp-content/",
    r"/wp-includes/",
    r"/wp-admin/",
    r"/assets/",
    r"/static/",
    r"/images/",
    r"/img/",
    r"/fonts/",
    r"/css/",
    r"/js/",
    r"javascript:",
    r"mailto:",
    r"tel:",
    r"/cdn-cgi/",
    r"/feed/",
    r"/rss/",
    r"/login",
    r"/logout",
    r"/signup",
    r"/register",
    r"/cart",
    r"/checkout",
    r"/account",
    r"/page/\d+",
    r"\?replytocom=",
    r"/xmlrpc\.php",
    r"/wp-json/",
];

lazy_static! {
    static ref SKIP_PATH_RE: Vec<Regex> = SKIP_PATH_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();
}

/// Why a candidate link was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not parseable, not http(s), or without a host
    Malformed,

    /// Host is not one of the run's seeded domains
    ForeignDomain,

    /// Path ends with a non-HTML extension
    SkippedExtension,

    /// URL matches an excluded path pattern
    SkippedPath,

    /// Host is permanently blocked
    Blocked,
}

/// Validates candidate links against the allowed domain set of one run
#[derive(Debug, Clone)]
pub struct LinkFilter {
    allowed: HashSet<String>,
}

impl LinkFilter {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: domains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows_domain(&self, domain: &str) -> bool {
        self.allowed.contains(domain)
    }

    /// Normalizes a raw absolute link and validates it
    ///
    /// Returns the normalized URL when the link should be followed.
    pub fn check(&self, link: &str) -> Result<Url, Rejection> {
        let url = normalize_url(link).map_err(|_| Rejection::Malformed)?;
        self.validate(&url)?;
        Ok(url)
    }

    /// Validates an already normalized URL
    pub fn validate(&self, url: &Url) -> Result<(), Rejection> {
        let domain = normalized_domain(url).ok_or(Rejection::Malformed)?;
        if !self.allows_domain(&domain) {
            return Err(Rejection::ForeignDomain);
        }

        let path = url.path().to_ascii_lowercase();
        if SKIP_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return Err(Rejection::SkippedExtension);
        }

        let full = url.as_str().to_lowercase();
        if SKIP_PATH_RE.iter().any(|re| re.is_match(&full)) {
            return Err(Rejection::SkippedPath);
        }

        if is_blocked_url(url.as_str()) {
            return Err(Rejection::Blocked);
        }

        Ok(())
    }

    /// Convenience wrapper returning the normalized link as a string
    pub fn accept(&self, link: &str) -> Option<String> {
        match self.check(link) {
            Ok(url) => Some(url.to_string()),
            Err(reason) => {
                tracing::trace!("Rejected link {} ({:?})", link, reason);
                None
            }
        }
    }
}
