//! Crawler coordinator - leveled breadth-first crawl orchestration
//!
//! The coordinator owns the frontier. For each depth level it:
//! - Splits the level into batches
//! - Runs the batches concurrently, bounded by a semaphore of worker permits
//! - Abandons batches that exceed the batch timeout
//! - Admits the returned links through the shared visit ledger, in the order
//!   batches complete, building the next level
//!
//! Only when a whole level has completed does the next one start.

use crate::config::CrawlerConfig;
use crate::crawler::filter::LinkFilter;
use crate::crawler::scheduler::{plan_batches, run_batch, BatchContext, BatchOutcome};
use crate::reference::DomainMap;
use crate::state::{Admission, CrawlPhase, CrawlRecord, VisitLedger};
use crate::url::{domain_of, normalize_url};
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Progress snapshot reported after each completed level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlProgress {
    /// Fetch attempts so far, successful or not
    pub pages_crawled: usize,

    /// Size of the next frontier level
    pub frontier_size: usize,

    /// URLs recorded so far
    pub discovered: usize,

    /// Level that just completed
    pub depth: u32,
}

/// Receives crawl progress; failures are logged and otherwise ignored
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: &CrawlProgress) -> Result<(), Box<dyn Error + Send + Sync>>;
}

impl<F> ProgressReporter for F
where
    F: Fn(&CrawlProgress) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync,
{
    fn report(&self, progress: &CrawlProgress) -> Result<(), Box<dyn Error + Send + Sync>> {
        self(progress)
    }
}

/// Reports progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, progress: &CrawlProgress) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::info!(
            "Level {} done: {} pages crawled, {} discovered, {} queued for next level",
            progress.depth,
            progress.pages_crawled,
            progress.discovered,
            progress.frontier_size
        );
        Ok(())
    }
}

/// Everything a crawl run produced
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// One record per admitted URL, seeds first
    pub records: Vec<CrawlRecord>,

    /// Pages that returned usable HTML
    pub pages_fetched: usize,

    /// Pages that failed or were not HTML
    pub pages_failed: usize,

    /// Levels whose batches all finished (or were abandoned)
    pub levels_completed: u32,

    /// The page budget was spent
    pub budget_exhausted: bool,

    /// Batches abandoned on timeout
    pub batches_timed_out: usize,
}

impl CrawlOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deepest level that received at least one record
    pub fn max_depth_reached(&self) -> Option<u32> {
        self.records.iter().map(|r| r.depth).max()
    }
}

/// Budgeted, domain-restricted breadth-first crawler
pub struct Crawler {
    config: CrawlerConfig,
    progress: Option<Arc<dyn ProgressReporter>>,
    phase: Mutex<CrawlPhase>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            config,
            progress: None,
            phase: Mutex::new(CrawlPhase::Idle),
        }
    }

    /// Installs a reporter invoked after each level
    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Current lifecycle phase of the most recent run
    pub fn phase(&self) -> CrawlPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: CrawlPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Crawls every seeded domain and returns the discovered URLs
    ///
    /// Seeds are recorded at depth 0. Levels `0..max_depth` are fetched;
    /// links found on level `d` are recorded at depth `d + 1`, so no record is
    /// deeper than `max_depth`. The run stops early when a level comes back
    /// empty or the page budget is spent. Failures of individual pages or
    /// batches never abort the run.
    pub async fn crawl(&self, domains: &DomainMap) -> CrawlOutcome {
        let mut outcome = CrawlOutcome::default();
        let ledger = Arc::new(VisitLedger::new(self.config.max_pages));

        let mut level = Vec::new();
        for seed in domains.iter() {
            let url = match normalize_url(&seed.root) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed.root, e);
                    continue;
                }
            };

            match ledger.admit(&url) {
                Admission::Admitted => {
                    outcome.records.push(CrawlRecord::new(
                        url.clone(),
                        seed.root.clone(),
                        seed.domain.clone(),
                        0,
                    ));
                    level.push(url);
                }
                Admission::AlreadyVisited => {}
                Admission::BudgetExhausted => break,
            }
        }

        tracing::info!(
            "Crawling {} domains (max depth {}, max pages {}, {} workers)",
            level.len(),
            self.config.max_depth,
            self.config.max_pages,
            self.config.max_workers
        );

        let ctx = Arc::new(BatchContext {
            filter: LinkFilter::new(domains.domains().map(str::to_string)),
            ledger: Arc::clone(&ledger),
            request_timeout: self.config.request_timeout(),
            request_delay: self.config.request_delay(),
        });
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));

        for depth in 0..self.config.max_depth {
            if level.is_empty() || ledger.is_exhausted() {
                break;
            }
            self.set_phase(CrawlPhase::Leveled { depth });

            let batches = plan_batches(std::mem::take(&mut level), self.config.max_workers);
            tracing::debug!("Level {}: {} batches", depth, batches.len());

            let mut tasks = JoinSet::new();
            for batch in batches {
                let ctx = Arc::clone(&ctx);
                let semaphore = Arc::clone(&semaphore);
                let batch_timeout = self.config.batch_timeout();

                tasks.spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return BatchOutcome::default(),
                    };

                    let size = batch.len();
                    match tokio::time::timeout(batch_timeout, run_batch(batch, ctx)).await {
                        Ok(batch_outcome) => batch_outcome,
                        Err(_) => {
                            tracing::warn!(
                                "Batch of {} URLs timed out after {:?}, dropping its links",
                                size,
                                batch_timeout
                            );
                            BatchOutcome::abandoned()
                        }
                    }
                });
            }

            while let Some(joined) = tasks.join_next().await {
                let batch = match joined {
                    Ok(batch) => batch,
                    Err(e) => {
                        tracing::warn!("Batch task failed: {}", e);
                        continue;
                    }
                };

                outcome.pages_fetched += batch.fetched;
                outcome.pages_failed += batch.failed;
                if batch.timed_out {
                    outcome.batches_timed_out += 1;
                }

                self.admit_links(batch.links, depth + 1, domains, &ledger, &mut outcome, &mut level);
            }

            outcome.levels_completed += 1;
            self.report(CrawlProgress {
                pages_crawled: outcome.pages_fetched + outcome.pages_failed,
                frontier_size: level.len(),
                discovered: outcome.records.len(),
                depth,
            });
        }

        outcome.budget_exhausted = ledger.is_exhausted();
        self.set_phase(CrawlPhase::Done);

        tracing::info!(
            "Crawl complete: {} URLs discovered, {} pages fetched, {} failed, deepest level {}",
            outcome.records.len(),
            outcome.pages_fetched,
            outcome.pages_failed,
            outcome
                .max_depth_reached()
                .map_or_else(|| "-".to_string(), |depth| depth.to_string())
        );

        outcome
    }

    /// Admits links returned by one batch, recording them at `depth`
    fn admit_links(
        &self,
        links: Vec<String>,
        depth: u32,
        domains: &DomainMap,
        ledger: &VisitLedger,
        outcome: &mut CrawlOutcome,
        next_level: &mut Vec<String>,
    ) {
        for link in links {
            let Some(domain) = domain_of(&link) else {
                continue;
            };
            let Some(seed) = domains.get(&domain) else {
                tracing::debug!("No seed for {}, dropping {}", domain, link);
                continue;
            };

            match ledger.admit(&link) {
                Admission::Admitted => {
                    tracing::trace!("Discovered {} at depth {}", link, depth);
                    outcome
                        .records
                        .push(CrawlRecord::new(link.clone(), seed.root.clone(), domain, depth));
                    next_level.push(link);
                }
                Admission::AlreadyVisited => {}
                Admission::BudgetExhausted => return,
            }
        }
    }

    fn report(&self, progress: CrawlProgress) {
        if let Some(reporter) = &self.progress {
            if let Err(e) = reporter.report(&progress) {
                tracing::warn!("Progress reporter failed: {}", e);
            }
        }
    }
}
