//! Anchor extraction from fetched pages
//!
//! Only anchor `href`s are collected; page bodies are not otherwise
//! inspected.

use scraper::{Html, Selector};
use url::Url;

/// Extracts every anchor link from an HTML document as an absolute URL
///
/// Fragment-only (`#...`), blank and `javascript:` hrefs are dropped. Other
/// hrefs are joined onto `page_url`; hrefs that do not join are dropped.
/// Scheme, domain and path filtering happen later, in the link filter.
///
/// # Example
///
/// ```
/// use coverage_gap::crawler::extract_links;
/// use url::Url;
///
/// let html = r##"<ul><li><a href="/investors">IR</a></li><li><a href="#top">Top</a></li></ul>"##;
/// let page = Url::parse("https://acme.com/").unwrap();
/// assert_eq!(extract_links(html, &page), vec!["https://acme.com/investors"]);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    Html::parse_document(html)
        .select(&anchors)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| absolute_link(href, page_url))
        .collect()
}

fn absolute_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let is_script = href
        .get(..11)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("javascript:"));
    if is_script {
        return None;
    }

    page_url.join(href).ok().map(String::from)
}
