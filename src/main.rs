//! Coverage-Gap main entry point
//!
//! This is the command-line interface for the Coverage-Gap auditor.

use anyhow::{bail, Context};
use clap::Parser;
use coverage_gap::audit::{run_planned_audit, split_keywords, AuditPlan, AuditRequest};
use coverage_gap::classify::ScopeMode;
use coverage_gap::config::{load_config_with_hash, Config};
use coverage_gap::crawler::{LogProgress, ProgressReporter};
use coverage_gap::output::{print_statistics, write_reports};
use coverage_gap::reference::{parse_reference_list, ReferenceModules};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Coverage-Gap: find the pages a reference URL list missed
///
/// Coverage-Gap crawls every domain named in a reference URL list, checks
/// which discovered URLs the list already covers, and classifies the rest
/// into PDF, HTML or shared scope buckets.
#[derive(Parser, Debug)]
#[command(name = "coverage-gap")]
#[command(version = "1.0.0")]
#[command(about = "Find URLs missing from a reference list", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Combined reference list (overrides [audit] reference-path)
    #[arg(long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// PDF module reference list (overrides [audit] pdf-reference-path)
    #[arg(long, value_name = "FILE")]
    pdf_reference: Option<PathBuf>,

    /// HTML module reference list (overrides [audit] html-reference-path)
    #[arg(long, value_name = "FILE")]
    html_reference: Option<PathBuf>,

    /// Scope mode: pdf, html or both (overrides [audit] mode)
    #[arg(long)]
    mode: Option<ScopeMode>,

    /// Keywords to exclude, separated by '|' (overrides [audit] exclude-keywords)
    #[arg(long, value_name = "KEYWORDS")]
    exclude: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Parse the reference lists and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    let references = load_references(&config, &cli)?;
    let request = AuditRequest::from_config(&config, references);

    let plan = request.plan();

    if cli.dry_run {
        handle_dry_run(&request, plan, &config);
        return Ok(());
    }

    handle_audit(&request, plan, &config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("coverage_gap=info,warn"),
            1 => EnvFilter::new("coverage_gap=debug,info"),
            2 => EnvFilter::new("coverage_gap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.audit.mode = mode;
    }
    if let Some(exclude) = &cli.exclude {
        config.audit.exclude_keywords = split_keywords(exclude);
    }

    // Paths from the config file are relative to the file itself
    let base = cli.config.parent().unwrap_or_else(|| Path::new("."));
    let resolve = |path: &Option<PathBuf>| path.as_ref().map(|p| base.join(p));

    config.audit.reference_path = cli
        .reference
        .clone()
        .or_else(|| resolve(&config.audit.reference_path));
    config.audit.pdf_reference_path = cli
        .pdf_reference
        .clone()
        .or_else(|| resolve(&config.audit.pdf_reference_path));
    config.audit.html_reference_path = cli
        .html_reference
        .clone()
        .or_else(|| resolve(&config.audit.html_reference_path));
}

/// Reads every configured reference list
fn load_references(config: &Config, cli: &Cli) -> anyhow::Result<ReferenceModules> {
    let audit = &config.audit;
    if audit.reference_path.is_none()
        && audit.pdf_reference_path.is_none()
        && audit.html_reference_path.is_none()
    {
        bail!(
            "No reference list given in {}; set [audit] reference-path or pass --reference",
            cli.config.display()
        );
    }

    let mut modules = ReferenceModules::default();
    if let Some(path) = &audit.reference_path {
        modules.shared = read_reference_list(path)?;
    }
    if let Some(path) = &audit.pdf_reference_path {
        modules.pdf = read_reference_list(path)?;
    }
    if let Some(path) = &audit.html_reference_path {
        modules.html = read_reference_list(path)?;
    }

    tracing::info!(
        "Reference entries: {} shared, {} PDF, {} HTML",
        modules.shared.len(),
        modules.pdf.len(),
        modules.html.len()
    );
    Ok(modules)
}

fn read_reference_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference list {}", path.display()))?;
    let entries = parse_reference_list(&text)
        .with_context(|| format!("Failed to parse reference list {}", path.display()))?;
    Ok(entries)
}

/// Handles the --dry-run mode: shows what would be crawled and matched
fn handle_dry_run(request: &AuditRequest, plan: AuditPlan, config: &Config) {
    let AuditPlan {
        references,
        domains,
        summaries,
    } = plan;

    println!("=== Coverage-Gap Dry Run ({} mode) ===\n", request.mode);

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max workers: {}", config.crawler.max_workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!("\nReference URLs ({}):", references.urls.len());
    for (i, url) in references.urls.iter().enumerate() {
        println!("  {:3}. {}", i + 1, url);
    }

    println!("\nCoverage Directives ({}):", references.directives.len());
    for directive in &references.directives {
        println!("  - {}", directive);
    }

    if references.blocked > 0 {
        println!(
            "\n{} URL(s) on permanently blocked domains excluded from crawling",
            references.blocked
        );
    }

    println!("\nDomains to Crawl ({}):", domains.len());
    for summary in &summaries {
        let modules = summary
            .modules
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        println!(
            "  - {} (seed {}, {} URLs in list{}{})",
            summary.domain,
            summary.seed_url,
            summary.reference_urls,
            if modules.is_empty() { "" } else { ", " },
            modules
        );
    }

    if !request.exclude_keywords.is_empty() {
        println!("\nExcluded Keywords: {}", request.exclude_keywords.join(" | "));
    }

    println!("\nOutput:");
    println!("  Summary: {}", config.output.summary_path);
    if let Some(path) = &config.output.json_path {
        println!("  JSON: {}", path);
    }
    if let Some(path) = &config.output.urls_path {
        println!("  URL list: {}", path);
    }

    if domains.is_empty() {
        println!("\n✗ No crawlable HTTP URLs found");
    } else {
        println!("\n✓ Would crawl {} domains", domains.len());
    }
}

/// Handles the main audit operation
async fn handle_audit(
    request: &AuditRequest,
    plan: AuditPlan,
    config: &Config,
    config_hash: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    if plan.domains.is_empty() {
        bail!("No crawlable HTTP URLs found in the reference list");
    }

    let progress: Option<Arc<dyn ProgressReporter>> = if quiet {
        None
    } else {
        Some(Arc::new(LogProgress))
    };

    let report = run_planned_audit(request, plan, progress)
        .await
        .context("Audit failed; discard this run and start again")?;

    let written = write_reports(&report, &config.output, Some(config_hash))
        .context("Failed to write reports")?;

    if !quiet {
        print_statistics(&report);
        println!();
        for path in written {
            println!("✓ Report written to: {}", path.display());
        }
    }

    Ok(())
}
