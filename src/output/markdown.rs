//! Markdown report generation
//!
//! This module renders a human-readable audit report: run information,
//! counters, the crawled domains, breakdowns of the missing URLs and the
//! missing-URL table itself.

use crate::audit::{AuditReport, MissingUrlRecord};
use crate::output::stats::ReportStatistics;
use crate::output::traits::{OutputResult, ReportWriter};
use std::path::{Path, PathBuf};

/// Writes the Markdown summary report
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    path: PathBuf,
    config_hash: Option<String>,
}

impl MarkdownWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config_hash: None,
        }
    }

    /// Records the configuration hash in the run information section
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

impl ReportWriter for MarkdownWriter {
    fn format_name(&self) -> &'static str {
        "markdown"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &AuditReport) -> OutputResult<String> {
        Ok(format_markdown_report(report, self.config_hash.as_deref()))
    }
}

/// Formats an audit report as markdown
pub fn format_markdown_report(report: &AuditReport, config_hash: Option<&str>) -> String {
    let stats = ReportStatistics::from_report(report);
    let counters = &report.counters;
    let mut md = String::new();

    // Title
    md.push_str("# Coverage Gap Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Mode**: {}\n", report.mode));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    let duration = report.duration().num_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!(
        "- **Reference List**: {} URLs, {} directives, {} blocked URLs dropped\n",
        report.reference_urls, report.directives, report.blocked_references
    ));
    if !report.exclude_keywords.is_empty() {
        md.push_str(&format!(
            "- **Excluded Keywords**: {}\n",
            report.exclude_keywords.join(", ")
        ));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Discovered**: {}\n", counters.total_discovered));
    md.push_str(&format!("- **Covered**: {}\n", counters.covered));
    md.push_str(&format!("- **Missing**: {}\n", counters.missing));
    md.push_str(&format!("- **Out of Scope**: {}\n", counters.out_of_scope));
    md.push_str(&format!("- **Filtered by Mode**: {}\n", counters.filtered_by_mode));
    md.push_str(&format!(
        "- **Excluded by Keyword**: {}\n",
        counters.excluded_by_keyword
    ));
    md.push_str(&format!("- **Coverage Rate**: {:.2}%\n\n", stats.coverage_rate()));

    // Crawl
    md.push_str("## Crawl\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", report.crawl.pages_fetched));
    md.push_str(&format!("- **Pages Failed**: {}\n", report.crawl.pages_failed));
    md.push_str(&format!(
        "- **Levels Completed**: {}\n",
        report.crawl.levels_completed
    ));
    md.push_str(&format!(
        "- **Page Budget Exhausted**: {}\n",
        if report.crawl.budget_exhausted { "yes" } else { "no" }
    ));
    if report.crawl.batches_timed_out > 0 {
        md.push_str(&format!(
            "- **Batches Timed Out**: {}\n",
            report.crawl.batches_timed_out
        ));
    }
    md.push('\n');

    // Domains
    if !report.domains.is_empty() {
        md.push_str("## Domains Crawled\n\n");
        md.push_str("| Domain | Seed URL | URLs in List | Module(s) |\n");
        md.push_str("|--------|----------|--------------|-----------|\n");
        for domain in &report.domains {
            let modules = if domain.modules.is_empty() {
                "-".to_string()
            } else {
                domain
                    .modules
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(" + ")
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                domain.domain, domain.seed_url, domain.reference_urls, modules
            ));
        }
        md.push('\n');
    }

    // Breakdowns
    if !report.records.is_empty() {
        push_breakdown(&mut md, "Missing by Domain", "Domain", &stats.by_domain);
        push_breakdown(&mut md, "Missing by Type", "Type", &stats.by_type);
        push_breakdown(&mut md, "Missing by Depth", "Depth", &stats.by_depth);
        push_breakdown(&mut md, "Missing by Module", "Module", &stats.by_module);
    }

    // Missing URLs
    md.push_str("## Missing URLs\n\n");
    if report.records.is_empty() {
        md.push_str("No missing URLs found.\n\n");
    } else {
        push_record_table(&mut md, &report.records);
    }

    // Excluded by keyword
    if !report.excluded.is_empty() {
        md.push_str("## Excluded by Keyword\n\n");
        md.push_str(&format!("Total: {}\n\n", report.excluded.len()));
        for record in &report.excluded {
            md.push_str(&format!("- {}\n", escape_cell(&record.url)));
        }
        md.push('\n');
    }

    md
}

fn push_breakdown<K: std::fmt::Display>(
    md: &mut String,
    title: &str,
    label: &str,
    counts: &std::collections::BTreeMap<K, usize>,
) {
    md.push_str(&format!("## {}\n\n", title));
    md.push_str(&format!("| {} | Missing |\n", label));
    md.push_str("|---|---|\n");
    for (key, count) in counts {
        md.push_str(&format!("| {} | {} |\n", key, count));
    }
    md.push('\n');
}

fn push_record_table(md: &mut String, records: &[MissingUrlRecord]) {
    md.push_str("| Domain | URL | Depth | Type | Confidence | Pattern | Module(s) |\n");
    md.push_str("|--------|-----|-------|------|------------|---------|-----------|\n");
    for record in records {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            record.domain,
            escape_cell(&record.url),
            record.depth,
            record.doc_type,
            record.confidence,
            escape_cell(&record.matched_pattern),
            record.modules_label()
        ));
    }
    md.push('\n');
}

/// Escapes table-breaking characters
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
