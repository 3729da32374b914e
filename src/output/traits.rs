//! Report writer trait and output errors

use crate::audit::AuditReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for a finished audit report
///
/// Each writer renders the report in its own format and writes it to the
/// file it was created for.
pub trait ReportWriter {
    /// Short name of the format, used in log messages
    fn format_name(&self) -> &'static str;

    /// File the report is written to
    fn path(&self) -> &Path;

    /// Renders the report without touching the filesystem
    fn render(&self, report: &AuditReport) -> OutputResult<String>;

    /// Renders the report and writes it to [`ReportWriter::path`]
    fn write(&self, report: &AuditReport) -> OutputResult<()> {
        let rendered = self.render(report)?;
        std::fs::write(self.path(), rendered)?;
        tracing::info!("Wrote {} report to {}", self.format_name(), self.path().display());
        Ok(())
    }
}
