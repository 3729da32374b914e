use crate::classify::ScopeMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Coverage-Gap
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler budgets and timing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Deepest BFS level that is recorded (seeds are level 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Global budget of recorded pages across all domains
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of batches fetching concurrently
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Politeness delay before every fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Time after which a whole batch is abandoned (seconds)
    #[serde(rename = "batch-timeout-secs")]
    pub batch_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_pages: 1000,
            max_workers: 50,
            request_timeout_secs: 10,
            request_delay_ms: 100,
            batch_timeout_secs: 120,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

/// What to audit and how to filter the results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Which classified buckets count as missing
    pub mode: ScopeMode,

    /// Combined reference list, active in every mode
    #[serde(rename = "reference-path")]
    pub reference_path: Option<PathBuf>,

    /// Reference list of the PDF extraction module
    #[serde(rename = "pdf-reference-path")]
    pub pdf_reference_path: Option<PathBuf>,

    /// Reference list of the HTML page module
    #[serde(rename = "html-reference-path")]
    pub html_reference_path: Option<PathBuf>,

    /// Keywords whose matches are dropped from the missing list
    #[serde(rename = "exclude-keywords")]
    pub exclude_keywords: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Optional path for the JSON report
    #[serde(rename = "json-path")]
    pub json_path: Option<String>,

    /// Optional path for the plain list of missing URLs
    #[serde(rename = "urls-path")]
    pub urls_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: "missing-urls.md".to_string(),
            json_path: None,
            urls_path: None,
        }
    }
}
