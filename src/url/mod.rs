//! URL handling module for Coverage-Gap
//!
//! This module provides URL normalization, normalized-domain and root
//! derivation, and the permanently-blocked domain policy.

mod blocked;
mod domain;
mod normalize;

pub use blocked::{blocked_host, is_blocked_host, is_blocked_url, matches_wildcard, BLOCKED_DOMAINS};
pub use domain::{domain_of, normalized_domain, root_url};
pub use normalize::normalize_url;
