use crate::url::is_blocked_url;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Shortest extracted URL still worth keeping; anything this short is noise
const MIN_URL_LEN: usize = 10;

lazy_static! {
    static ref HTTP_RE: Regex = Regex::new(r#"https?://[^\s'"<>})]+"#).unwrap();
    static ref DIRECTIVE_RE: Regex = Regex::new(r"(?i)^(ev|cp|df|if):").unwrap();
}

/// What the extractor pulled out of a raw reference list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    /// Unique plain HTTP(S) URLs, in first-seen order
    pub urls: Vec<String>,

    /// Coverage directives (`ev:`, `cp:`, `df:`, `if:`), trimmed
    pub directives: Vec<String>,

    /// Number of embedded URLs dropped because they sit on a blocked domain
    pub blocked: usize,
}

impl ReferenceSet {
    /// Extracts plain URLs and coverage directives from raw entries
    pub fn extract<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        let mut blocked = 0;

        for entry in entries {
            for url in extract_candidates(entry.as_ref()) {
                if is_blocked_url(&url) {
                    blocked += 1;
                    continue;
                }
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
        }

        Self {
            urls,
            directives: extract_directives(entries),
            blocked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.directives.is_empty()
    }
}

/// Finds every HTTP(S) URL embedded in a single reference entry
///
/// Entries may carry prefixes or template text around the URL. Trailing
/// `,`, `;` and `|` separators and stray closing braces are removed, and
/// URLs on blocked domains are dropped.
///
/// # Examples
///
/// ```
/// use coverage_gap::reference::extract_http;
///
/// let urls = extract_http("pdf|{https://acme.com/reports},");
/// assert_eq!(urls, vec!["https://acme.com/reports"]);
/// ```
pub fn extract_http(entry: &str) -> Vec<String> {
    extract_candidates(entry)
        .into_iter()
        .filter(|url| !is_blocked_url(url))
        .collect()
}

fn extract_candidates(entry: &str) -> Vec<String> {
    HTTP_RE
        .find_iter(entry)
        .map(|m| clean_candidate(m.as_str()))
        .filter(|url| url.chars().count() > MIN_URL_LEN)
        .collect()
}

fn clean_candidate(raw: &str) -> String {
    raw.trim_end_matches(|c| c == ',' || c == ';' || c == '|')
        .trim_end_matches('}')
        .to_string()
}

/// Returns the entries that are coverage directives, trimmed
///
/// A directive starts with `ev:`, `cp:`, `df:` or `if:` (any case) once
/// surrounding whitespace is removed.
pub fn extract_directives<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.as_ref().trim())
        .filter(|entry| DIRECTIVE_RE.is_match(entry))
        .map(str::to_string)
        .collect()
}
