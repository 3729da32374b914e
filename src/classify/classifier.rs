use super::patterns::{
    PatternTable, BOTH_KEYWORD_TABLE, BOTH_PATH_TABLE, HTML_KEYWORD_TABLE, HTML_PATH_TABLE,
    OUT_OF_SCOPE_KEYWORD_TABLE, OUT_OF_SCOPE_PATH_TABLE, OVERRIDE_TABLE, PDF_KEYWORD_TABLE,
    PDF_PATH_TABLE,
};
use crate::url::blocked_host;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Scope bucket assigned to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "HTML")]
    Html,
    Both,
    #[serde(rename = "Out of Scope")]
    OutOfScope,
    Unclassified,
}

impl DocType {
    /// Reference modules that should have captured a URL of this type
    pub fn source_modules(self) -> Vec<SourceModule> {
        match self {
            DocType::Pdf => vec![SourceModule::Pdf],
            DocType::Html => vec![SourceModule::Html],
            DocType::Both | DocType::Unclassified => vec![SourceModule::Pdf, SourceModule::Html],
            DocType::OutOfScope => Vec::new(),
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Pdf => write!(f, "PDF"),
            DocType::Html => write!(f, "HTML"),
            DocType::Both => write!(f, "Both"),
            DocType::OutOfScope => write!(f, "Out of Scope"),
            DocType::Unclassified => write!(f, "Unclassified"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Outcome of classifying one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub doc_type: DocType,
    pub confidence: Confidence,

    /// Source of the rule that decided, empty when nothing matched
    pub matched_pattern: String,
}

impl Classification {
    fn new(doc_type: DocType, confidence: Confidence, pattern: impl Into<String>) -> Self {
        Self {
            doc_type,
            confidence,
            matched_pattern: pattern.into(),
        }
    }

    fn unclassified() -> Self {
        Self::new(DocType::Unclassified, Confidence::Low, "")
    }
}

/// One of the two reference lists an analyst maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceModule {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "HTML")]
    Html,
}

impl fmt::Display for SourceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceModule::Pdf => write!(f, "PDF"),
            SourceModule::Html => write!(f, "HTML"),
        }
    }
}

/// Which classified buckets count as missing for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScopeMode {
    Pdf,
    Html,
    #[default]
    Both,
}

impl ScopeMode {
    /// Returns true if this mode keeps URLs of the given type
    ///
    /// Out-of-scope URLs are never kept. Unclassified URLs could belong to
    /// either module, so every mode keeps them.
    pub fn accepts(self, doc_type: DocType) -> bool {
        match doc_type {
            DocType::OutOfScope => false,
            DocType::Both | DocType::Unclassified => true,
            DocType::Pdf => matches!(self, ScopeMode::Pdf | ScopeMode::Both),
            DocType::Html => matches!(self, ScopeMode::Html | ScopeMode::Both),
        }
    }

    /// Returns true if the given reference module is active in this mode
    pub fn includes(self, module: SourceModule) -> bool {
        match (self, module) {
            (ScopeMode::Both, _) => true,
            (ScopeMode::Pdf, SourceModule::Pdf) => true,
            (ScopeMode::Html, SourceModule::Html) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeMode::Pdf => write!(f, "PDF"),
            ScopeMode::Html => write!(f, "HTML"),
            ScopeMode::Both => write!(f, "Both"),
        }
    }
}

impl FromStr for ScopeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ScopeMode::Pdf),
            "html" => Ok(ScopeMode::Html),
            "both" => Ok(ScopeMode::Both),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScopeMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScopeMode> for String {
    fn from(mode: ScopeMode) -> Self {
        mode.to_string().to_lowercase()
    }
}

/// Classifies a URL into a scope bucket
///
/// Rules are evaluated in a fixed order and the first match decides:
///
/// 1. Blocked domain → Out of Scope / high
/// 2. Unless an investor-relations override matches: out-of-scope paths,
///    then out-of-scope keywords → Out of Scope / high
/// 3. Path ending in `.pdf` → PDF / high
/// 4. PDF keywords, then PDF paths → PDF / medium
/// 5. HTML keywords, then HTML paths → HTML / medium
/// 6. Both keywords, then Both paths → Both / medium
/// 7. Nothing matched → Unclassified / low
///
/// The function is pure: the same URL always yields the same result.
///
/// # Examples
///
/// ```
/// use coverage_gap::{classify, Confidence, DocType};
///
/// let result = classify("https://acme.com/investors/annual-report-2023.pdf");
/// assert_eq!(result.doc_type, DocType::Pdf);
/// assert_eq!(result.confidence, Confidence::High);
/// assert_eq!(result.matched_pattern, ".pdf");
/// ```
pub fn classify(url: &str) -> Classification {
    if url.is_empty() {
        return Classification::unclassified();
    }

    let url_lower = url.to_lowercase();
    let path = Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();

    if let Some(host) = blocked_host(url) {
        return Classification::new(
            DocType::OutOfScope,
            Confidence::High,
            format!("blocked:{}", host),
        );
    }

    if OVERRIDE_TABLE.first_match(&url_lower).is_none() {
        let out_of_scope = OUT_OF_SCOPE_PATH_TABLE
            .first_match(&path)
            .or_else(|| OUT_OF_SCOPE_KEYWORD_TABLE.first_match(&url_lower));
        if let Some(pattern) = out_of_scope {
            return Classification::new(DocType::OutOfScope, Confidence::High, pattern);
        }
    }

    if path.ends_with(".pdf") {
        return Classification::new(DocType::Pdf, Confidence::High, ".pdf");
    }

    let categories: [(DocType, &PatternTable, &PatternTable); 3] = [
        (DocType::Pdf, &*PDF_KEYWORD_TABLE, &*PDF_PATH_TABLE),
        (DocType::Html, &*HTML_KEYWORD_TABLE, &*HTML_PATH_TABLE),
        (DocType::Both, &*BOTH_KEYWORD_TABLE, &*BOTH_PATH_TABLE),
    ];

    for (doc_type, keywords, paths) in categories {
        let matched = keywords
            .first_match(&url_lower)
            .or_else(|| paths.first_match(&path));
        if let Some(pattern) = matched {
            return Classification::new(doc_type, Confidence::Medium, pattern);
        }
    }

    Classification::unclassified()
}

/// Returns true if the URL's classification is kept under `mode`
pub fn in_scope(url: &str, mode: ScopeMode) -> bool {
    mode.accepts(classify(url).doc_type)
}
