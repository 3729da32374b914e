//! Shared visit ledger for one crawl run
//!
//! Holds the visited-URL set and the page counter. Both are only touched
//! under a single mutex so that admission and the budget check form one
//! critical section.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Result of asking the ledger to admit a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First time this URL is seen; it now counts against the budget
    Admitted,

    /// The URL was admitted earlier in this run
    AlreadyVisited,

    /// The page budget is spent; nothing more will be admitted
    BudgetExhausted,
}

#[derive(Debug, Default)]
struct LedgerInner {
    visited: HashSet<String>,
    pages: usize,
}

#[derive(Debug)]
pub struct VisitLedger {
    inner: Mutex<LedgerInner>,
    max_pages: usize,
}

impl VisitLedger {
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(LedgerInner::default()),
            max_pages,
        }
    }

    /// Admits a normalized URL if it is new and the budget allows it
    pub fn admit(&self, url: &str) -> Admission {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if inner.visited.contains(url) {
            return Admission::AlreadyVisited;
        }
        if inner.pages >= self.max_pages {
            return Admission::BudgetExhausted;
        }

        inner.visited.insert(url.to_string());
        inner.pages += 1;
        Admission::Admitted
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .visited
            .contains(url)
    }

    /// Number of URLs admitted so far
    pub fn pages(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).pages
    }

    pub fn is_exhausted(&self) -> bool {
        self.pages() >= self.max_pages
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_admit_once() {
        let ledger = VisitLedger::new(10);
        assert_eq!(ledger.admit("https://acme.com/"), Admission::Admitted);
        assert_eq!(ledger.admit("https://acme.com/"), Admission::AlreadyVisited);
        assert!(ledger.is_visited("https://acme.com/"));
        assert_eq!(ledger.pages(), 1);
    }

    #[test]
    fn test_budget() {
        let ledger = VisitLedger::new(2);
        assert_eq!(ledger.admit("https://acme.com/a"), Admission::Admitted);
        assert_eq!(ledger.admit("https://acme.com/b"), Admission::Admitted);
        assert!(ledger.is_exhausted());
        assert_eq!(ledger.admit("https://acme.com/c"), Admission::BudgetExhausted);
        // Already-visited wins over the budget check
        assert_eq!(ledger.admit("https://acme.com/a"), Admission::AlreadyVisited);
        assert!(!ledger.is_visited("https://acme.com/c"));
    }

    #[test]
    fn test_concurrent_admission_exactly_once() {
        let ledger = Arc::new(VisitLedger::new(50));
        let urls: Vec<String> = (0..100).map(|i| format!("https://acme.com/{}", i)).collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let urls = urls.clone();
                thread::spawn(move || {
                    urls.iter()
                        .filter(|u| ledger.admit(u) == Admission::Admitted)
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
        assert_eq!(ledger.pages(), 50);
    }
}
