//! Analyst keyword exclusion
//!
//! Keywords hide missing URLs the analyst has already reviewed. Spaces,
//! hyphens and underscores inside a keyword are interchangeable, so
//! `email-alerts` also hides `email_alerts` and `emailalerts`.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

lazy_static! {
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\s\-_]+").unwrap();
}

const FLEXIBLE_SEPARATOR: &str = r"[\s\-_]*";

/// Compiled keyword filter, searched in the full URL
#[derive(Debug, Clone)]
pub struct KeywordExclusion {
    keywords: Vec<String>,
    regex: Regex,
}

impl KeywordExclusion {
    /// Compiles a keyword list
    ///
    /// Returns None when no keyword has any content, so callers can treat
    /// "no filter" uniformly.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Option<Self> {
        let mut kept = Vec::new();
        let mut alternatives = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            let pieces: Vec<String> = SEPARATOR_RE
                .split(keyword)
                .filter(|piece| !piece.is_empty())
                .map(regex::escape)
                .collect();
            if pieces.is_empty() {
                continue;
            }

            alternatives.push(format!("(?:{})", pieces.join(FLEXIBLE_SEPARATOR)));
            kept.push(keyword.to_string());
        }

        if alternatives.is_empty() {
            return None;
        }

        match RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self {
                keywords: kept,
                regex,
            }),
            Err(e) => {
                tracing::warn!("Ignoring keyword exclusion, pattern did not compile: {}", e);
                None
            }
        }
    }

    /// Parses the `a | b | c` form accepted on the command line
    pub fn parse(input: &str) -> Option<Self> {
        Self::new(&split_keywords(input))
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Splits a `|`-separated keyword string, dropping blank entries
pub fn split_keywords(input: &str) -> Vec<String> {
    input
        .split('|')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_yields_no_filter() {
        assert!(KeywordExclusion::parse("").is_none());
        assert!(KeywordExclusion::parse("  |  | ").is_none());
        assert!(KeywordExclusion::new(&["-", "_ "]).is_none());
        assert!(KeywordExclusion::new::<&str>(&[]).is_none());
    }

    #[test]
    fn test_separators_are_interchangeable() {
        let exclusion = KeywordExclusion::parse("email-alerts").unwrap();
        assert!(exclusion.is_match("https://acme.com/investors/email-alerts"));
        assert!(exclusion.is_match("https://acme.com/investors/email_alerts"));
        assert!(exclusion.is_match("https://acme.com/investors/emailalerts"));
        assert!(!exclusion.is_match("https://acme.com/investors/email/alerts"));
    }

    #[test]
    fn test_case_insensitive() {
        let exclusion = KeywordExclusion::parse("Press Release").unwrap();
        assert!(exclusion.is_match("https://acme.com/PRESS_RELEASES/2024"));
    }

    #[test]
    fn test_multiple_keywords() {
        let exclusion = KeywordExclusion::parse("careers | webcast").unwrap();
        assert_eq!(exclusion.keywords(), ["careers", "webcast"]);
        assert!(exclusion.is_match("https://acme.com/events/webcast-q3"));
        assert!(exclusion.is_match("https://acme.com/careers"));
        assert!(!exclusion.is_match("https://acme.com/about"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let exclusion = KeywordExclusion::parse("q1.2024 (draft)").unwrap();
        assert!(exclusion.is_match("https://acme.com/q1.2024-(draft)"));
        assert!(!exclusion.is_match("https://acme.com/q1x2024-draft"));
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(split_keywords(" a | b-c ||"), vec!["a", "b-c"]);
    }
}
