//! Crawler module for bounded breadth-first link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser user agent and bounded redirects
//! - HTML parsing and link extraction
//! - Link validation against the run's allowed domains
//! - Splitting frontier levels into concurrently fetched batches
//! - Overall crawl coordination under depth, page and time budgets

mod coordinator;
mod fetcher;
mod filter;
mod parser;
mod scheduler;

pub use coordinator::{CrawlOutcome, CrawlProgress, Crawler, LogProgress, ProgressReporter};
pub use fetcher::{build_http_client, fetch_url, FetchResult, BROWSER_USER_AGENT, MAX_REDIRECTS};
pub use filter::{LinkFilter, Rejection, SKIP_EXTENSIONS, SKIP_PATH_PATTERNS};
pub use parser::extract_links;
pub use scheduler::{plan_batches, run_batch, BatchContext, BatchOutcome};

use crate::config::CrawlerConfig;
use crate::reference::DomainMap;

/// Runs a complete crawl with the default logging progress reporter
///
/// This is the main entry point for crawling outside of an audit. It will:
/// 1. Record every domain seed at depth 0
/// 2. Fetch each level concurrently
/// 3. Extract, validate and admit links into the next level
/// 4. Stop when the frontier empties, the depth limit is hit or the page
///    budget is spent
pub async fn crawl(config: CrawlerConfig, domains: &DomainMap) -> CrawlOutcome {
    Crawler::new(config)
        .with_progress(std::sync::Arc::new(LogProgress))
        .crawl(domains)
        .await
}
