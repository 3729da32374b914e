//! Level scheduling: splitting a frontier level into batches and running one
//! batch of fetches
//!
//! A batch owns its own HTTP client and fetches its URLs one after another,
//! sleeping for the politeness delay before each request. Links it finds are
//! handed back to the coordinator, which alone decides admission.

use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::filter::LinkFilter;
use crate::crawler::parser::extract_links;
use crate::state::VisitLedger;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Shared, read-mostly inputs of every batch in a run
#[derive(Debug)]
pub struct BatchContext {
    /// Link validation for this run's allowed domains
    pub filter: LinkFilter,

    /// Visited set, consulted to avoid returning known links
    pub ledger: Arc<VisitLedger>,

    /// Timeout for each request
    pub request_timeout: Duration,

    /// Delay before every fetch
    pub request_delay: Duration,
}

/// What a single batch produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Normalized, validated links not yet visited, without duplicates
    pub links: Vec<String>,

    /// Pages that returned usable HTML
    pub fetched: usize,

    /// Pages that failed or were not HTML
    pub failed: usize,

    /// The batch was abandoned after exceeding the batch timeout
    pub timed_out: bool,
}

impl BatchOutcome {
    /// Outcome of a batch abandoned on timeout: no links are kept
    pub fn abandoned() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }
}

/// Splits a frontier level into batches
///
/// The batch size is `max(1, len / max_workers)`, so a level never produces
/// fewer batches than it can keep busy, and small levels get one URL per
/// batch. Order is preserved.
///
/// # Examples
///
/// ```
/// use coverage_gap::crawler::plan_batches;
///
/// let level: Vec<String> = (0..5).map(|i| format!("https://a.com/{}", i)).collect();
/// let batches = plan_batches(level, 2);
/// assert_eq!(batches.len(), 3);
/// assert_eq!(batches[0].len(), 2);
/// assert_eq!(batches[2].len(), 1);
/// ```
pub fn plan_batches(level: Vec<String>, max_workers: usize) -> Vec<Vec<String>> {
    if level.is_empty() {
        return Vec::new();
    }

    let batch_size = (level.len() / max_workers.max(1)).max(1);
    level
        .chunks(batch_size)
        .map(<[String]>::to_vec)
        .collect()
}

/// Fetches every URL of a batch and collects the new links they point to
///
/// Fetch failures are absorbed: the page simply contributes no links.
pub async fn run_batch(urls: Vec<String>, ctx: Arc<BatchContext>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    let client = match build_http_client(ctx.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build HTTP client for batch: {}", e);
            outcome.failed = urls.len();
            return outcome;
        }
    };

    let mut seen = HashSet::new();

    for url in &urls {
        if !ctx.request_delay.is_zero() {
            tokio::time::sleep(ctx.request_delay).await;
        }

        let body = match fetch_url(&client, url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                tracing::debug!("HTTP {} for {}", status_code, url);
                outcome.failed += 1;
                continue;
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {} (content type {:?})", url, content_type);
                outcome.failed += 1;
                continue;
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Fetch failed for {}: {}", url, error);
                outcome.failed += 1;
                continue;
            }
        };
        outcome.fetched += 1;

        let base_url = match Url::parse(url) {
            Ok(base_url) => base_url,
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", url, e);
                continue;
            }
        };

        let mut found = 0;
        for link in extract_links(&body, &base_url) {
            let Some(normalized) = ctx.filter.accept(&link) else {
                continue;
            };
            if ctx.ledger.is_visited(&normalized) {
                continue;
            }
            if seen.insert(normalized.clone()) {
                outcome.links.push(normalized);
                found += 1;
            }
        }
        tracing::debug!("{}: {} new links", url, found);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn level(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://acme.com/{}", i)).collect()
    }

    #[test]
    fn test_plan_empty_level() {
        assert!(plan_batches(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_plan_small_level_one_url_per_batch() {
        let batches = plan_batches(level(3), 50);
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 1));
    }

    #[test]
    fn test_plan_large_level() {
        let batches = plan_batches(level(120), 50);
        assert_eq!(batches.len(), 60);
        assert!(batches.iter().all(|b| b.len() == 2));

        let flattened: Vec<String> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, level(120));
    }

    #[test]
    fn test_plan_zero_workers_treated_as_one() {
        let batches = plan_batches(level(4), 0);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 4);
    }

    fn context(server: &MockServer, ledger: Arc<VisitLedger>) -> Arc<BatchContext> {
        let domain = server.uri().trim_start_matches("http://").to_string();
        Arc::new(BatchContext {
            filter: LinkFilter::new([domain]),
            ledger,
            request_timeout: Duration::from_secs(5),
            request_delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn test_run_batch_collects_new_links() {
        let server = MockServer::start().await;
        let html = r#"<html><body>
            <a href="/about">About</a>
            <a href="/about/">About again</a>
            <a href="/seen">Seen</a>
            <a href="/brochure.pdf">PDF</a>
            <a href="https://elsewhere.com/x">Elsewhere</a>
        </body></html>"#;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
            .mount(&server)
            .await;

        let ledger = Arc::new(VisitLedger::new(100));
        let seen = format!("{}/seen", server.uri());
        ledger.admit(&seen);

        let outcome = run_batch(vec![format!("{}/", server.uri())], context(&server, ledger)).await;

        assert_eq!(outcome.fetched, 1);
        assert_eq!(outcome.failed, 0);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.links, vec![format!("{}/about", server.uri())]);
    }

    #[tokio::test]
    async fn test_run_batch_absorbs_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/image"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("GIF89a", "image/gif"))
            .mount(&server)
            .await;

        let ledger = Arc::new(VisitLedger::new(100));
        let urls = vec![
            format!("{}/broken", server.uri()),
            format!("{}/image", server.uri()),
        ];
        let outcome = run_batch(urls, context(&server, ledger)).await;

        assert_eq!(outcome.fetched, 0);
        assert_eq!(outcome.failed, 2);
        assert!(outcome.links.is_empty());
    }
}
