//! Turning a crawl outcome into missing-URL records and run counters

use super::exclusion::KeywordExclusion;
use crate::classify::{classify, Classification, Confidence, DocType, ScopeMode, SourceModule};
use crate::coverage::CoverageMatcher;
use crate::crawler::CrawlOutcome;
use crate::reference::DomainMap;
use crate::state::CrawlRecord;
use crate::url::is_blocked_url;
use crate::{GapError, Result};
use serde::Serialize;

/// Longest matched-pattern text kept on a record
pub const MATCHED_PATTERN_MAX_CHARS: usize = 60;

/// A discovered URL the reference list does not cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingUrlRecord {
    pub domain: String,
    pub seed_url: String,
    pub url: String,
    pub depth: u32,
    pub doc_type: DocType,
    pub confidence: Confidence,

    /// Rule that decided the classification, truncated for display
    pub matched_pattern: String,

    /// Reference modules that should have listed this URL
    pub source_modules: Vec<SourceModule>,
}

impl MissingUrlRecord {
    pub fn new(record: &CrawlRecord, classification: Classification) -> Self {
        Self {
            domain: record.domain.clone(),
            seed_url: record.seed_url.clone(),
            url: record.url.clone(),
            depth: record.depth,
            doc_type: classification.doc_type,
            confidence: classification.confidence,
            matched_pattern: truncate_chars(
                &classification.matched_pattern,
                MATCHED_PATTERN_MAX_CHARS,
            ),
            source_modules: classification.doc_type.source_modules(),
        }
    }

    /// Source modules joined for display, e.g. `PDF + HTML`
    pub fn modules_label(&self) -> String {
        if self.source_modules.is_empty() {
            return "-".to_string();
        }
        self.source_modules
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Run counters
///
/// Every discovered URL lands in exactly one of covered, missing,
/// out-of-scope, filtered-by-mode or excluded-by-keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditCounters {
    pub total_discovered: usize,
    pub covered: usize,
    pub missing: usize,
    pub out_of_scope: usize,
    pub filtered_by_mode: usize,
    pub excluded_by_keyword: usize,
}

/// Result of evaluating one crawl outcome
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub counters: AuditCounters,

    /// Missing URLs, sorted by URL
    pub records: Vec<MissingUrlRecord>,

    /// Missing URLs hidden by the keyword exclusion, sorted by URL
    pub excluded: Vec<MissingUrlRecord>,
}

/// Matches, classifies and filters every crawl record
///
/// Records are processed in URL order. A record whose domain has no seed,
/// or whose seed differs from the domain map, means the outcome does not
/// belong to these inputs and fails the whole evaluation with
/// [`GapError::CorruptedState`].
pub fn evaluate(
    outcome: &CrawlOutcome,
    domains: &DomainMap,
    matcher: &CoverageMatcher,
    mode: ScopeMode,
    exclusion: Option<&KeywordExclusion>,
) -> Result<Evaluation> {
    let mut sorted: Vec<&CrawlRecord> = outcome.records.iter().collect();
    sorted.sort_by(|a, b| a.url.cmp(&b.url));

    let mut evaluation = Evaluation::default();
    let counters = &mut evaluation.counters;
    counters.total_discovered = sorted.len();

    for record in sorted {
        check_provenance(record, domains)?;

        if is_blocked_url(&record.url) {
            counters.out_of_scope += 1;
            continue;
        }

        if let Some(found) = matcher.find(&record.url) {
            tracing::trace!("{} covered ({:?})", record.url, found);
            counters.covered += 1;
            continue;
        }

        let classification = classify(&record.url);
        if !mode.accepts(classification.doc_type) {
            if classification.doc_type == DocType::OutOfScope {
                counters.out_of_scope += 1;
            } else {
                counters.filtered_by_mode += 1;
            }
            continue;
        }

        let missing = MissingUrlRecord::new(record, classification);
        if exclusion.map_or(false, |e| e.is_match(&missing.url)) {
            counters.excluded_by_keyword += 1;
            evaluation.excluded.push(missing);
        } else {
            counters.missing += 1;
            evaluation.records.push(missing);
        }
    }

    Ok(evaluation)
}

fn check_provenance(record: &CrawlRecord, domains: &DomainMap) -> Result<()> {
    let seed = domains.get(&record.domain).ok_or_else(|| {
        GapError::CorruptedState(format!(
            "{} belongs to domain {} which has no seed",
            record.url, record.domain
        ))
    })?;

    if seed.root != record.seed_url {
        return Err(GapError::CorruptedState(format!(
            "{} was recorded with seed {} but domain {} is seeded from {}",
            record.url, record.seed_url, record.domain, seed.root
        )));
    }

    Ok(())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
