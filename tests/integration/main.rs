//! Integration test suite
//!
//! Every test here runs against local wiremock servers; nothing touches the
//! network.

mod audit_tests;
mod crawl_tests;
