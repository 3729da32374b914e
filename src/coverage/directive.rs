use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIRECTIVE_SPLIT: Regex = Regex::new(r"(?i)^(ev|cp|df|if):(.*)$").unwrap();
}

/// A compiled `tag:pattern` coverage directive
///
/// The tag is kept for reporting only; every tag means "URLs shaped like
/// this pattern are covered".
#[derive(Debug, Clone)]
pub struct Directive {
    pub tag: String,
    pub source: String,
    patterns: Vec<DirectivePattern>,
}

/// A compiled directive pattern
///
/// Analyst lists use look-around and backreferences, which the `regex`
/// engine rejects; those patterns compile with `fancy_regex` instead.
#[derive(Debug, Clone)]
enum DirectivePattern {
    Linear(Regex),
    Backtracking(fancy_regex::Regex),
}

impl DirectivePattern {
    fn compile(pattern: &str) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(regex) => return Some(Self::Linear(regex)),
            Err(e) => tracing::trace!("{:?} needs the backtracking engine: {}", pattern, e),
        }

        match fancy_regex::Regex::new(pattern) {
            Ok(regex) => Some(Self::Backtracking(regex)),
            Err(e) => {
                tracing::debug!("Directive form {:?} does not compile: {}", pattern, e);
                None
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Linear(regex) => regex.is_match(text),
            Self::Backtracking(regex) => regex.is_match(text).unwrap_or_else(|e| {
                tracing::debug!("Directive match on {} abandoned: {}", text, e);
                false
            }),
        }
    }
}

impl Directive {
    /// Parses and compiles a directive entry
    ///
    /// The pattern is compiled as written and, when it is wrapped in
    /// parentheses, also with the surrounding parentheses removed. Patterns
    /// with look-around or backreferences use the backtracking engine.
    /// Returns `None` for entries that are not directives, have an empty
    /// pattern, or whose pattern compiles in neither form.
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        let caps = DIRECTIVE_SPLIT.captures(entry)?;
        let tag = caps.get(1)?.as_str().to_ascii_lowercase();
        let body = caps.get(2)?.as_str().trim();

        let unwrapped = body.trim_matches(|c| c == '(' || c == ')');
        if unwrapped.is_empty() {
            tracing::debug!("Ignoring directive with empty pattern: {}", entry);
            return None;
        }

        let mut candidates = vec![body];
        if unwrapped != body {
            candidates.push(unwrapped);
        }

        let patterns: Vec<DirectivePattern> = candidates
            .into_iter()
            .filter_map(DirectivePattern::compile)
            .collect();

        if patterns.is_empty() {
            tracing::warn!("Skipping malformed coverage directive: {}", entry);
            return None;
        }

        Some(Self {
            tag,
            source: entry.to_string(),
            patterns,
        })
    }

    /// Tests the directive against a URL path and the full URL
    pub fn matches(&self, path: &str, full_url: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.is_match(path) || re.is_match(full_url))
    }
}
