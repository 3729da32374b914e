//! Reference list handling
//!
//! Turns the analyst's raw reference list into plain URLs, coverage
//! directives and a domain → seed map. Two reference modules (the PDF
//! extraction list and the HTML page list) can be supplied side by side.

mod extractor;
mod input;
mod resolver;

pub use extractor::{extract_directives, extract_http, ReferenceSet};
pub use input::parse_reference_list;
pub use resolver::{resolve_domains, DomainMap, DomainSeed};

use crate::classify::{ScopeMode, SourceModule};
use crate::url::domain_of;
use serde::Serialize;

/// Raw entries of the reference modules
#[derive(Debug, Clone, Default)]
pub struct ReferenceModules {
    /// PDF extraction module
    pub pdf: Vec<String>,

    /// HTML page module
    pub html: Vec<String>,

    /// Combined list not tied to a module; active in every mode
    pub shared: Vec<String>,
}

impl ReferenceModules {
    pub fn new(pdf: Vec<String>, html: Vec<String>) -> Self {
        Self {
            pdf,
            html,
            shared: Vec::new(),
        }
    }

    /// A single combined reference list
    pub fn shared(entries: Vec<String>) -> Self {
        Self {
            shared: entries,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pdf.is_empty() && self.html.is_empty() && self.shared.is_empty()
    }

    /// Entries of the modules enabled by `mode`: PDF, then HTML, then shared
    ///
    /// PDF mode ignores the HTML module and HTML mode ignores the PDF module.
    pub fn active_entries(&self, mode: ScopeMode) -> Vec<String> {
        let mut entries = Vec::new();
        if mode.includes(SourceModule::Pdf) {
            entries.extend(self.pdf.iter().cloned());
        }
        if mode.includes(SourceModule::Html) {
            entries.extend(self.html.iter().cloned());
        }
        entries.extend(self.shared.iter().cloned());
        entries
    }

    /// Builds one row per seeded domain: reference URL count and the
    /// modules whose lists mention the domain
    pub fn domain_summaries(&self, mode: ScopeMode, domains: &DomainMap) -> Vec<DomainSummary> {
        let all = ReferenceSet::extract(&self.active_entries(mode));
        let pdf_urls = if mode.includes(SourceModule::Pdf) {
            ReferenceSet::extract(&self.pdf).urls
        } else {
            Vec::new()
        };
        let html_urls = if mode.includes(SourceModule::Html) {
            ReferenceSet::extract(&self.html).urls
        } else {
            Vec::new()
        };

        let mentions = |urls: &[String], domain: &str| {
            urls.iter().any(|u| domain_of(u).as_deref() == Some(domain))
        };

        domains
            .iter()
            .map(|seed| {
                let mut modules = Vec::new();
                if mentions(&pdf_urls, &seed.domain) {
                    modules.push(SourceModule::Pdf);
                }
                if mentions(&html_urls, &seed.domain) {
                    modules.push(SourceModule::Html);
                }

                DomainSummary {
                    domain: seed.domain.clone(),
                    seed_url: seed.root.clone(),
                    reference_urls: all
                        .urls
                        .iter()
                        .filter(|u| domain_of(u).as_deref() == Some(seed.domain.as_str()))
                        .count(),
                    modules,
                }
            })
            .collect()
    }
}

/// One row of the domain table shown before crawling and in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub domain: String,
    pub seed_url: String,
    pub reference_urls: usize,
    pub modules: Vec<SourceModule>,
}
