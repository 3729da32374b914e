//! Crawl record and crawl phase definitions
//!
//! A crawl record is written once, when a URL is first admitted, and never
//! changes afterwards.

use serde::Serialize;
use std::fmt;

/// A URL discovered during a crawl, with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CrawlRecord {
    /// Normalized URL
    pub url: String,

    /// Seed (root) URL of the domain this URL belongs to
    pub seed_url: String,

    /// Normalized domain key
    pub domain: String,

    /// BFS level at which the URL was first discovered; seeds are 0
    pub depth: u32,
}

impl CrawlRecord {
    pub fn new(
        url: impl Into<String>,
        seed_url: impl Into<String>,
        domain: impl Into<String>,
        depth: u32,
    ) -> Self {
        Self {
            url: url.into(),
            seed_url: seed_url.into(),
            domain: domain.into(),
            depth,
        }
    }

    /// Returns true if this record is a domain seed
    pub fn is_seed(&self) -> bool {
        self.depth == 0
    }
}

/// Lifecycle of one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Not started yet
    #[default]
    Idle,

    /// Fetching the frontier level at this depth
    Leveled { depth: u32 },

    /// Frontier empty, depth limit reached or page budget spent
    Done,
}

impl CrawlPhase {
    /// Returns true once the run has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the depth being crawled, if a level is in progress
    pub fn depth(&self) -> Option<u32> {
        match self {
            Self::Leveled { depth } => Some(*depth),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Leveled { depth } => write!(f, "level {}", depth),
            Self::Done => write!(f, "done"),
        }
    }
}
