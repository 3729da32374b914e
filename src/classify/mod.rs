//! Document-type classification
//!
//! Assigns every discovered URL to a scope bucket (PDF, HTML, Both, Out of
//! Scope or Unclassified) by ordered pattern matching, and decides whether a
//! bucket counts for the requested scope mode.

mod classifier;
pub mod patterns;

pub use classifier::{
    classify, in_scope, Classification, Confidence, DocType, ScopeMode, SourceModule,
};
