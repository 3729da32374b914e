//! JSON and plain-list report writers

use crate::audit::AuditReport;
use crate::output::traits::{OutputResult, ReportWriter};
use std::path::{Path, PathBuf};

/// Writes the full report as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for JsonWriter {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &AuditReport) -> OutputResult<String> {
        let mut json = serde_json::to_string_pretty(report)?;
        json.push('\n');
        Ok(json)
    }
}

/// Writes one missing URL per line
#[derive(Debug, Clone)]
pub struct UrlListWriter {
    path: PathBuf,
}

impl UrlListWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for UrlListWriter {
    fn format_name(&self) -> &'static str {
        "URL list"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &AuditReport) -> OutputResult<String> {
        let mut list = String::new();
        for record in &report.records {
            list.push_str(&record.url);
            list.push('\n');
        }
        Ok(list)
    }
}
