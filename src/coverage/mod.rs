//! URL coverage matching
//!
//! Decides whether a discovered URL is already represented in the reference
//! list, by exact match, by same-host path match, or by a coverage
//! directive.

mod directive;

pub use directive::Directive;

use crate::reference::ReferenceSet;
use crate::url::domain_of;
use std::collections::HashSet;
use url::Url;

/// How a URL was found to be covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageMatch {
    /// Same URL, ignoring case, trailing slashes and `www.`
    Exact,

    /// Same host and the same non-empty path as a reference URL
    Path,

    /// Matched by the directive with this source text
    Directive(String),
}

/// Pre-computed lookup over one run's reference URLs and directives
///
/// Built once per run and then queried for every discovered URL; it holds no
/// mutable state and can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct CoverageMatcher {
    exact: HashSet<String>,
    paths: HashSet<(String, String)>,
    directives: Vec<Directive>,
}

impl CoverageMatcher {
    pub fn new(references: &ReferenceSet) -> Self {
        Self::from_parts(&references.urls, &references.directives)
    }

    /// Builds a matcher from plain reference URLs and directive entries
    ///
    /// Malformed directives are skipped.
    pub fn from_parts<U: AsRef<str>, D: AsRef<str>>(urls: &[U], directives: &[D]) -> Self {
        let mut exact = HashSet::new();
        let mut paths = HashSet::new();

        for url in urls {
            let url = url.as_ref();
            exact.insert(exact_key(url));
            if let Some(key) = path_key(url) {
                paths.insert(key);
            }
        }

        let directives = directives
            .iter()
            .filter_map(|d| Directive::parse(d.as_ref()))
            .collect();

        Self {
            exact,
            paths,
            directives,
        }
    }

    /// Returns how the URL is covered, or `None` if it is missing
    ///
    /// Checks run in priority order: exact, path, directive.
    ///
    /// # Examples
    ///
    /// ```
    /// use coverage_gap::coverage::{CoverageMatch, CoverageMatcher};
    ///
    /// let matcher = CoverageMatcher::from_parts(&["https://ACME.com/news/item1/"], &["cp:/press/.*"]);
    /// assert_eq!(matcher.find("https://acme.com/news/item1"), Some(CoverageMatch::Exact));
    /// assert!(matcher.find("https://acme.com/press/2024").is_some());
    /// assert_eq!(matcher.find("https://acme.com/careers"), None);
    /// ```
    pub fn find(&self, url: &str) -> Option<CoverageMatch> {
        if self.exact.contains(&exact_key(url)) {
            return Some(CoverageMatch::Exact);
        }

        if let Some(key) = path_key(url) {
            if self.paths.contains(&key) {
                return Some(CoverageMatch::Path);
            }
        }

        let path = Url::parse(url.trim())
            .map(|u| u.path().to_string())
            .unwrap_or_default();

        self.directives
            .iter()
            .find(|d| d.matches(&path, url))
            .map(|d| CoverageMatch::Directive(d.source.clone()))
    }

    pub fn is_covered(&self, url: &str) -> bool {
        self.find(url).is_some()
    }

    /// Number of directives that compiled
    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }
}

/// Comparison key for exact matching
fn exact_key(url: &str) -> String {
    url.trim()
        .trim_end_matches('/')
        .to_lowercase()
        .replace("://www.", "://")
}

/// (domain, path) key for path matching; `None` when the path is empty
fn path_key(url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(url.trim()).ok()?;
    let path = parsed.path().trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    let domain = domain_of(parsed.as_str())?;
    Some((domain, path.to_string()))
}
