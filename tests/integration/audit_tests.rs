//! End-to-end audit tests: reference list in, classified missing URLs out

use coverage_gap::audit::{run_audit, AuditRequest};
use coverage_gap::classify::{Confidence, DocType, ScopeMode, SourceModule};
use coverage_gap::config::{load_config, CrawlerConfig};
use coverage_gap::output::write_reports;
use coverage_gap::reference::ReferenceModules;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page: &str, hrefs: &[&str]) {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">link</a></li>"#, href))
        .collect();
    let body = format!("<html><body><ul>{}</ul></body></html>", links);

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

/// An investor site: the home page links to the IR section, careers and an
/// about page; the IR section links to an annual report
async fn investor_site() -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/investors", "/careers", "/about-us"]).await;
    mount_page(&server, "/investors", &["/investors/annual-report-2023"]).await;
    server
}

fn request(server: &MockServer, mode: ScopeMode, exclude: &[&str]) -> AuditRequest {
    AuditRequest {
        references: ReferenceModules::shared(vec![format!("{}/investors", server.uri())]),
        mode,
        exclude_keywords: exclude.iter().map(|k| k.to_string()).collect(),
        crawler: CrawlerConfig {
            max_depth: 2,
            max_pages: 100,
            max_workers: 4,
            request_timeout_secs: 5,
            request_delay_ms: 0,
            batch_timeout_secs: 30,
        },
    }
}

#[tokio::test]
async fn test_audit_both_mode() {
    let server = investor_site().await;
    let base = server.uri();

    let report = run_audit(&request(&server, ScopeMode::Both, &[]), None)
        .await
        .unwrap();

    let counters = &report.counters;
    assert_eq!(counters.total_discovered, 5);
    assert_eq!(counters.covered, 1);
    assert_eq!(counters.out_of_scope, 1);
    assert_eq!(counters.filtered_by_mode, 0);
    assert_eq!(counters.excluded_by_keyword, 0);
    assert_eq!(counters.missing, 3);

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/about-us", base),
            format!("{}/investors/annual-report-2023", base),
        ]
    );

    let report_page = &report.records[2];
    assert_eq!(report_page.doc_type, DocType::Pdf);
    assert_eq!(report_page.confidence, Confidence::Medium);
    assert_eq!(report_page.depth, 2);
    assert_eq!(report_page.seed_url, base);
    assert_eq!(report_page.source_modules, vec![SourceModule::Pdf]);

    assert_eq!(report.records[0].doc_type, DocType::Unclassified);
    assert_eq!(report.records[1].doc_type, DocType::Html);

    assert_eq!(report.reference_urls, 1);
    assert_eq!(report.domains.len(), 1);
    assert_eq!(report.crawl.pages_fetched, 2);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_audit_pdf_mode_filters_html() {
    let server = investor_site().await;

    let report = run_audit(&request(&server, ScopeMode::Pdf, &[]), None)
        .await
        .unwrap();

    let counters = &report.counters;
    assert_eq!(counters.total_discovered, 5);
    assert_eq!(counters.filtered_by_mode, 1);
    assert_eq!(counters.missing, 2);
    assert!(report
        .records
        .iter()
        .all(|r| r.doc_type != DocType::Html));
}

#[tokio::test]
async fn test_audit_keyword_exclusion() {
    let server = investor_site().await;

    let report = run_audit(&request(&server, ScopeMode::Both, &["About Us"]), None)
        .await
        .unwrap();

    let counters = &report.counters;
    assert_eq!(counters.excluded_by_keyword, 1);
    assert_eq!(counters.missing, 2);
    assert_eq!(
        counters.covered
            + counters.missing
            + counters.out_of_scope
            + counters.filtered_by_mode
            + counters.excluded_by_keyword,
        counters.total_discovered
    );
    assert_eq!(report.excluded.len(), 1);
    assert!(report.excluded[0].url.ends_with("/about-us"));
    assert_eq!(report.exclude_keywords, vec!["About Us"]);
}

#[tokio::test]
async fn test_audit_directive_covers_section() {
    let server = investor_site().await;
    let mut audit = request(&server, ScopeMode::Both, &[]);
    audit.references.shared.push("cp:(/investors/.*)".to_string());

    let report = run_audit(&audit, None).await.unwrap();

    assert_eq!(report.directives, 1);
    assert_eq!(report.counters.covered, 2);
    assert_eq!(report.counters.missing, 2);
    assert!(report
        .records
        .iter()
        .all(|r| !r.url.contains("annual-report")));
}

#[tokio::test]
async fn test_audit_from_config_file_writes_reports() {
    let server = investor_site().await;
    let dir = tempfile::tempdir().unwrap();

    let summary = dir.path().join("missing.md");
    let json = dir.path().join("missing.json");
    let urls = dir.path().join("missing.txt");
    let config_path = dir.path().join("audit.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
max-depth = 2
max-workers = 2
request-delay-ms = 0

[audit]
mode = "pdf"

[output]
summary-path = "{}"
json-path = "{}"
urls-path = "{}"
"#,
            summary.display(),
            json.display(),
            urls.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let references = ReferenceModules::shared(vec![format!("{}/investors", server.uri())]);
    let report = run_audit(&AuditRequest::from_config(&config, references), None)
        .await
        .unwrap();

    let written = write_reports(&report, &config.output, Some("cafe")).unwrap();
    assert_eq!(written.len(), 3);

    let markdown = std::fs::read_to_string(&summary).unwrap();
    assert!(markdown.contains("- **Mode**: PDF"));
    assert!(markdown.contains("annual-report-2023"));

    let list = std::fs::read_to_string(&urls).unwrap();
    assert_eq!(list.lines().count(), report.records.len());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["mode"], "pdf");
    assert_eq!(value["counters"]["filtered_by_mode"], 1);
}
