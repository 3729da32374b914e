//! Audit orchestration
//!
//! Runs the whole pipeline for one audit:
//! reference modules → extracted URLs and directives → domain seeds →
//! crawl → coverage matching → classification → missing-URL records.

mod evaluate;
mod exclusion;

pub use evaluate::{
    evaluate, AuditCounters, Evaluation, MissingUrlRecord, MATCHED_PATTERN_MAX_CHARS,
};
pub use exclusion::{split_keywords, KeywordExclusion};

use crate::classify::ScopeMode;
use crate::config::{Config, CrawlerConfig};
use crate::coverage::CoverageMatcher;
use crate::crawler::{Crawler, ProgressReporter};
use crate::reference::{DomainMap, DomainSummary, ReferenceModules, ReferenceSet};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Inputs of one audit run
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    /// Raw reference list entries, per module
    pub references: ReferenceModules,

    /// Which classified buckets count as missing
    pub mode: ScopeMode,

    /// Keywords hiding matching missing URLs
    pub exclude_keywords: Vec<String>,

    pub crawler: CrawlerConfig,
}

impl AuditRequest {
    /// Builds a request from loaded configuration and reference entries
    pub fn from_config(config: &Config, references: ReferenceModules) -> Self {
        Self {
            references,
            mode: config.audit.mode,
            exclude_keywords: config.audit.exclude_keywords.clone(),
            crawler: config.crawler.clone(),
        }
    }

    /// Extracts references and resolves seeds without crawling anything
    pub fn plan(&self) -> AuditPlan {
        let references = ReferenceSet::extract(&self.references.active_entries(self.mode));
        let domains = DomainMap::resolve(&references.urls);
        let summaries = self.references.domain_summaries(self.mode, &domains);

        AuditPlan {
            references,
            domains,
            summaries,
        }
    }
}

/// What an audit will crawl and match against
#[derive(Debug, Clone, Default)]
pub struct AuditPlan {
    pub references: ReferenceSet,
    pub domains: DomainMap,
    pub summaries: Vec<DomainSummary>,
}

/// Crawl figures carried into the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub levels_completed: u32,
    pub budget_exhausted: bool,
    pub batches_timed_out: usize,
}

/// Complete result of an audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub mode: ScopeMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counters: AuditCounters,
    pub crawl: CrawlSummary,

    /// Plain reference URLs and directives used for matching
    pub reference_urls: usize,
    pub directives: usize,

    /// Reference URLs dropped for sitting on a blocked domain
    pub blocked_references: usize,

    pub domains: Vec<DomainSummary>,

    /// Active exclusion keywords
    pub exclude_keywords: Vec<String>,

    /// Missing URLs, sorted by URL
    pub records: Vec<MissingUrlRecord>,

    /// Missing URLs hidden by keyword exclusion
    pub excluded: Vec<MissingUrlRecord>,
}

impl AuditReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs a complete audit
///
/// Page-level crawl failures are absorbed. The only errors are inconsistent
/// crawl results ([`crate::GapError::CorruptedState`]).
///
/// # Example
///
/// ```no_run
/// use coverage_gap::audit::{run_audit, AuditRequest};
/// use coverage_gap::reference::ReferenceModules;
///
/// # async fn example() -> coverage_gap::Result<()> {
/// let request = AuditRequest {
///     references: ReferenceModules::shared(vec!["https://acme.com/investors".into()]),
///     ..AuditRequest::default()
/// };
/// let report = run_audit(&request, None).await?;
/// println!("{} missing", report.counters.missing);
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(
    request: &AuditRequest,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<AuditReport> {
    run_planned_audit(request, request.plan(), progress).await
}

/// Runs an audit from a plan the caller already built with
/// [`AuditRequest::plan`]
pub async fn run_planned_audit(
    request: &AuditRequest,
    plan: AuditPlan,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<AuditReport> {
    let started_at = Utc::now();

    tracing::info!(
        "Audit in {} mode: {} reference URLs, {} directives, {} domains",
        request.mode,
        plan.references.urls.len(),
        plan.references.directives.len(),
        plan.domains.len()
    );
    if plan.references.blocked > 0 {
        tracing::warn!(
            "{} reference URLs are on blocked domains and were dropped",
            plan.references.blocked
        );
    }
    if plan.domains.is_empty() {
        tracing::warn!("No crawlable HTTP URLs in the reference list");
    }

    let mut crawler = Crawler::new(request.crawler.clone());
    if let Some(reporter) = progress {
        crawler = crawler.with_progress(reporter);
    }
    let outcome = crawler.crawl(&plan.domains).await;

    let matcher = CoverageMatcher::new(&plan.references);
    let exclusion = KeywordExclusion::new(&request.exclude_keywords);
    let evaluation = evaluate(
        &outcome,
        &plan.domains,
        &matcher,
        request.mode,
        exclusion.as_ref(),
    )?;

    tracing::info!(
        "Audit complete: {} discovered, {} covered, {} missing",
        evaluation.counters.total_discovered,
        evaluation.counters.covered,
        evaluation.counters.missing
    );

    Ok(AuditReport {
        mode: request.mode,
        started_at,
        finished_at: Utc::now(),
        counters: evaluation.counters,
        crawl: CrawlSummary {
            pages_fetched: outcome.pages_fetched,
            pages_failed: outcome.pages_failed,
            levels_completed: outcome.levels_completed,
            budget_exhausted: outcome.budget_exhausted,
            batches_timed_out: outcome.batches_timed_out,
        },
        reference_urls: plan.references.urls.len(),
        directives: plan.references.directives.len(),
        blocked_references: plan.references.blocked,
        domains: plan.summaries,
        exclude_keywords: exclusion
            .map(|e| e.keywords().to_vec())
            .unwrap_or_default(),
        records: evaluation.records,
        excluded: evaluation.excluded,
    })
}
