//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlRecord`: A discovered URL with its seed, domain and depth
//! - `CrawlPhase`: Where a crawl run is in its lifecycle
//! - `VisitLedger`: The visited set and page counter shared by concurrent batches

mod crawl_record;
mod visit_state;

// Re-export main types
pub use crawl_record::{CrawlPhase, CrawlRecord};
pub use visit_state::{Admission, VisitLedger};
