//! Spam scoring pipeline
//!
//! Heuristic analysis of contact-form submissions: content vocabulary,
//! email shape, structural patterns, and honeypot/timing signals are
//! scored independently and folded into a single [`SpamAnalysis`]
//! verdict with severity banding.

pub mod analyzer;
pub mod keywords;
pub mod types;

pub use analyzer::SpamAnalyzer;
pub use types::*;
