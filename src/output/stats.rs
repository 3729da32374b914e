//! Statistics derived from an audit report
//!
//! This module provides the breakdowns shown in reports and the console
//! summary printed after a run.

use crate::audit::{AuditCounters, AuditReport, MissingUrlRecord};
use crate::classify::{DocType, SourceModule};
use std::collections::BTreeMap;

/// Breakdowns of the missing URLs of one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStatistics {
    pub counters: AuditCounters,

    /// Missing URLs per domain
    pub by_domain: BTreeMap<String, usize>,

    /// Missing URLs per classification
    pub by_type: BTreeMap<DocType, usize>,

    /// Missing URLs per crawl depth
    pub by_depth: BTreeMap<u32, usize>,

    /// Missing URLs per reference module that should have listed them
    pub by_module: BTreeMap<SourceModule, usize>,
}

impl ReportStatistics {
    pub fn from_report(report: &AuditReport) -> Self {
        let mut stats = Self::from_records(&report.records);
        stats.counters = report.counters;
        stats
    }

    pub fn from_records(records: &[MissingUrlRecord]) -> Self {
        let mut stats = Self::default();

        for record in records {
            *stats.by_domain.entry(record.domain.clone()).or_insert(0) += 1;
            *stats.by_type.entry(record.doc_type).or_insert(0) += 1;
            *stats.by_depth.entry(record.depth).or_insert(0) += 1;
            for module in &record.source_modules {
                *stats.by_module.entry(*module).or_insert(0) += 1;
            }
        }

        stats
    }

    /// Share of discovered URLs already covered by the reference list, in percent
    pub fn coverage_rate(&self) -> f64 {
        if self.counters.total_discovered == 0 {
            return 0.0;
        }
        (self.counters.covered as f64 / self.counters.total_discovered as f64) * 100.0
    }
}

/// Prints the run counters and breakdowns to stdout
pub fn print_statistics(report: &AuditReport) {
    let stats = ReportStatistics::from_report(report);
    let c = &stats.counters;

    println!("=== Coverage Gap Statistics ({} mode) ===\n", report.mode);

    println!("Overview:");
    println!("  Total discovered: {}", c.total_discovered);
    println!("  Covered by reference list: {}", c.covered);
    println!("  Missing: {}", c.missing);
    println!("  Out of scope: {}", c.out_of_scope);
    println!("  Filtered by mode: {}", c.filtered_by_mode);
    if c.excluded_by_keyword > 0 {
        println!("  Excluded by keyword: {}", c.excluded_by_keyword);
    }
    println!();

    println!("Crawl:");
    println!("  Pages fetched: {}", report.crawl.pages_fetched);
    println!("  Pages failed: {}", report.crawl.pages_failed);
    println!("  Levels completed: {}", report.crawl.levels_completed);
    if report.crawl.budget_exhausted {
        println!("  Page budget exhausted");
    }
    if report.crawl.batches_timed_out > 0 {
        println!("  Batches timed out: {}", report.crawl.batches_timed_out);
    }
    println!();

    if !stats.by_type.is_empty() {
        println!("Missing by Type:");
        for (doc_type, count) in &stats.by_type {
            println!("  {}: {}", doc_type, count);
        }
        println!();
    }

    if !stats.by_domain.is_empty() {
        println!("Missing by Domain:");
        // Largest gaps first
        let mut domains: Vec<_> = stats.by_domain.iter().collect();
        domains.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (domain, count) in domains {
            println!("  {}: {}", domain, count);
        }
        println!();
    }

    println!(
        "Coverage Rate: {:.1}% ({} / {} discovered URLs covered)",
        stats.coverage_rate(),
        c.covered,
        c.total_discovered
    );
}
