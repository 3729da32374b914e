//! Output module for audit reports
//!
//! This module handles:
//! - Rendering reports as Markdown, JSON and a plain URL list
//! - Writing the reports named in the output configuration
//! - Printing run statistics to the console

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{JsonWriter, UrlListWriter};
pub use markdown::{format_markdown_report, MarkdownWriter};
pub use stats::{print_statistics, ReportStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::audit::AuditReport;
use crate::config::OutputConfig;
use std::path::PathBuf;

/// Builds the writers enabled by the output configuration
///
/// The Markdown summary is always written; JSON and the URL list only when
/// their paths are set.
pub fn configured_writers(
    config: &OutputConfig,
    config_hash: Option<&str>,
) -> Vec<Box<dyn ReportWriter>> {
    let mut markdown = MarkdownWriter::new(&config.summary_path);
    if let Some(hash) = config_hash {
        markdown = markdown.with_config_hash(hash);
    }

    let mut writers: Vec<Box<dyn ReportWriter>> = vec![Box::new(markdown)];
    if let Some(path) = &config.json_path {
        writers.push(Box::new(JsonWriter::new(path)));
    }
    if let Some(path) = &config.urls_path {
        writers.push(Box::new(UrlListWriter::new(path)));
    }
    writers
}

/// Writes every configured report
///
/// # Returns
///
/// * `Ok(paths)` - Files written, in writer order
/// * `Err(OutputError)` - The first write that failed
pub fn write_reports(
    report: &AuditReport,
    config: &OutputConfig,
    config_hash: Option<&str>,
) -> OutputResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for writer in configured_writers(config, config_hash) {
        writer.write(report)?;
        written.push(writer.path().to_path_buf());
    }
    Ok(written)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::audit::{AuditCounters, AuditReport, CrawlSummary, MissingUrlRecord};
    use crate::classify::{Confidence, DocType, ScopeMode, SourceModule};
    use crate::reference::DomainSummary;
    use chrono::{TimeZone, Utc};

    fn missing(
        url: &str,
        depth: u32,
        doc_type: DocType,
        confidence: Confidence,
        pattern: &str,
    ) -> MissingUrlRecord {
        MissingUrlRecord {
            domain: "acme.com".to_string(),
            seed_url: "https://acme.com".to_string(),
            url: url.to_string(),
            depth,
            doc_type,
            confidence,
            matched_pattern: pattern.to_string(),
            source_modules: doc_type.source_modules(),
        }
    }

    /// A small finished report over one domain
    pub fn sample_report() -> AuditReport {
        AuditReport {
            mode: ScopeMode::Both,
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 2, 0).unwrap(),
            counters: AuditCounters {
                total_discovered: 6,
                covered: 2,
                missing: 2,
                out_of_scope: 1,
                filtered_by_mode: 0,
                excluded_by_keyword: 1,
            },
            crawl: CrawlSummary {
                pages_fetched: 5,
                pages_failed: 1,
                levels_completed: 3,
                budget_exhausted: false,
                batches_timed_out: 0,
            },
            reference_urls: 3,
            directives: 1,
            blocked_references: 0,
            domains: vec![DomainSummary {
                domain: "acme.com".to_string(),
                seed_url: "https://acme.com".to_string(),
                reference_urls: 3,
                modules: vec![SourceModule::Pdf, SourceModule::Html],
            }],
            exclude_keywords: vec!["email alerts".to_string()],
            records: vec![
                missing(
                    "https://acme.com/investors/annual-report-2023.pdf",
                    2,
                    DocType::Pdf,
                    Confidence::High,
                    ".pdf",
                ),
                missing(
                    "https://acme.com/news-room",
                    1,
                    DocType::Both,
                    Confidence::Medium,
                    "/news",
                ),
            ],
            excluded: vec![missing(
                "https://acme.com/investors/email-alerts",
                1,
                DocType::Both,
                Confidence::Medium,
                "email[\\s\\-_]*alert",
            )],
        }
    }
}
