//! Coverage-Gap: find the pages a reference URL list missed
//!
//! This crate crawls the domains named in an analyst's reference URL list,
//! decides which discovered URLs are already covered by that list, and
//! classifies the rest into document-oriented, page-oriented or shared scope
//! buckets.

pub mod audit;
pub mod classify;
pub mod config;
pub mod coverage;
pub mod crawler;
pub mod output;
pub mod reference;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Coverage-Gap operations
#[derive(Debug, Error)]
pub enum GapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference list error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The crawl produced results the orchestrator cannot reconcile with its
    /// own inputs. The run has to be discarded and restarted.
    #[error("Corrupted run state: {0}")]
    CorruptedState(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid scope mode: {0} (expected pdf, html or both)")]
    InvalidMode(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL is on a permanently blocked domain: {0}")]
    Blocked(String),
}

/// Errors raised while reading a reference URL list
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Reference list is empty")]
    Empty,

    #[error("Could not parse reference list")]
    Unparseable,
}

/// Result type alias for Coverage-Gap operations
pub type Result<T> = std::result::Result<T, GapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{run_audit, AuditCounters, AuditReport, MissingUrlRecord};
pub use classify::{classify, in_scope, Classification, Confidence, DocType, ScopeMode};
pub use config::{Config, CrawlerConfig};
pub use coverage::CoverageMatcher;
pub use crawler::Crawler;
pub use reference::{DomainMap, DomainSeed, ReferenceSet};
pub use state::CrawlRecord;
pub use crate::url::{is_blocked_url, normalize_url, normalized_domain};
