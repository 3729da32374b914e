//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive complete
//! leveled crawls end-to-end.

use coverage_gap::config::CrawlerConfig;
use coverage_gap::crawler::{CrawlProgress, Crawler};
use coverage_gap::reference::DomainMap;
use coverage_gap::state::CrawlPhase;
use std::collections::HashSet;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings with no politeness delay so tests stay fast
fn test_config(max_depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        max_pages: 100,
        max_workers: 4,
        request_timeout_secs: 5,
        request_delay_ms: 0,
        batch_timeout_secs: 30,
    }
}

/// Mounts an HTML page whose body links to the given hrefs
async fn mount_page(server: &MockServer, page: &str, hrefs: &[&str]) {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    let body = format!("<html><body>{}</body></html>", links);

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

fn domains_for(servers: &[&MockServer]) -> DomainMap {
    let urls: Vec<String> = servers.iter().map(|s| format!("{}/", s.uri())).collect();
    DomainMap::resolve(&urls)
}

#[tokio::test]
async fn test_leveled_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[
            "/a",
            "/a/",
            "/b#section",
            "/style.css",
            "/login",
            "mailto:ir@example.com",
            "https://elsewhere.example/page",
        ],
    )
    .await;
    mount_page(&server, "/a", &["/c", "/"]).await;
    mount_page(&server, "/b", &["/c?utm_source=newsletter"]).await;
    mount_page(&server, "/c", &["/d"]).await;

    let crawler = Crawler::new(test_config(2));
    let outcome = crawler.crawl(&domains_for(&[&server])).await;

    let depths: Vec<(String, u32)> = outcome
        .records
        .iter()
        .map(|r| (r.url.trim_start_matches(base.as_str()).to_string(), r.depth))
        .collect();

    assert_eq!(outcome.records.len(), 4, "records: {:?}", depths);
    assert!(depths.contains(&("/".to_string(), 0)));
    assert!(depths.contains(&("/a".to_string(), 1)));
    assert!(depths.contains(&("/b".to_string(), 1)));
    assert!(depths.contains(&("/c".to_string(), 2)));

    // Level 2 is recorded but not fetched, so /d is never seen
    assert!(outcome.records.iter().all(|r| !r.url.ends_with("/d")));
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.levels_completed, 2);
    assert_eq!(outcome.max_depth_reached(), Some(2));
    assert!(!outcome.budget_exhausted);
    assert_eq!(crawler.phase(), CrawlPhase::Done);

    assert!(outcome.records.iter().all(|r| r.seed_url == base));
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let server = MockServer::start().await;
    let hrefs: Vec<String> = (0..20).map(|i| format!("/page-{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&server, "/", &href_refs).await;

    let config = CrawlerConfig {
        max_pages: 5,
        ..test_config(3)
    };
    let outcome = Crawler::new(config).crawl(&domains_for(&[&server])).await;

    assert_eq!(outcome.records.len(), 5);
    assert!(outcome.budget_exhausted);
    assert_eq!(outcome.levels_completed, 1);
}

#[tokio::test]
async fn test_failures_are_absorbed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/broken", "/missing", "/ok"]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", &["/deeper"]).await;

    let outcome = Crawler::new(test_config(2))
        .crawl(&domains_for(&[&server]))
        .await;

    // /broken and /missing are still recorded, they just yield no links
    assert_eq!(outcome.records.len(), 5);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.pages_failed, 2);
    assert!(outcome.records.iter().any(|r| r.url.ends_with("/deeper") && r.depth == 2));
}

#[tokio::test]
async fn test_batch_timeout_drops_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/slow"]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<html><a href="/after">after</a></html>"#, "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        batch_timeout_secs: 1,
        ..test_config(3)
    };
    let outcome = Crawler::new(config).crawl(&domains_for(&[&server])).await;

    assert_eq!(outcome.batches_timed_out, 1);
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| !r.url.ends_with("/after")));
}

#[tokio::test]
async fn test_multiple_domains_keep_their_seeds() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    let cross_link = format!("{}/team", second.uri());
    mount_page(&first, "/", &["/news", cross_link.as_str()]).await;
    mount_page(&second, "/", &["/products"]).await;

    let domains = domains_for(&[&first, &second]);
    let outcome = Crawler::new(test_config(1)).crawl(&domains).await;

    assert_eq!(outcome.records.len(), 5);
    let team = outcome
        .records
        .iter()
        .find(|r| r.url.ends_with("/team"))
        .expect("cross-domain link recorded");
    assert_eq!(team.seed_url, second.uri());
    assert_eq!(team.depth, 1);

    let news = outcome
        .records
        .iter()
        .find(|r| r.url.ends_with("/news"))
        .expect("same-domain link recorded");
    assert_eq!(news.seed_url, first.uri());
}

#[tokio::test]
async fn test_no_duplicate_records_under_concurrency() {
    let server = MockServer::start().await;
    let hrefs: Vec<String> = (0..12).map(|i| format!("/p{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    mount_page(&server, "/", &href_refs).await;
    for href in &hrefs {
        // Every page links to every other page and to a shared target
        let mut links = href_refs.clone();
        links.push("/shared");
        mount_page(&server, href, &links).await;
    }

    let config = CrawlerConfig {
        max_workers: 8,
        ..test_config(3)
    };
    let outcome = Crawler::new(config).crawl(&domains_for(&[&server])).await;

    let unique: HashSet<&str> = outcome.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(unique.len(), outcome.records.len());
    assert_eq!(outcome.records.len(), 14);

    let shared = outcome
        .records
        .iter()
        .find(|r| r.url.ends_with("/shared"))
        .expect("shared page recorded");
    assert_eq!(shared.depth, 2);
}

#[tokio::test]
async fn test_progress_reported_per_level() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a"]).await;
    mount_page(&server, "/a", &["/b"]).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reporter = move |p: &CrawlProgress| -> Result<(), Box<dyn Error + Send + Sync>> {
        sink.lock().unwrap().push(*p);
        Err("reporter failures are ignored".into())
    };

    let outcome = Crawler::new(test_config(3))
        .with_progress(Arc::new(reporter))
        .crawl(&domains_for(&[&server]))
        .await;

    let seen = seen.lock().unwrap();
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].depth, 0);
    assert_eq!(seen[0].frontier_size, 1);
    assert_eq!(seen[1].discovered, 3);
    assert_eq!(seen[2].frontier_size, 0);
}
