//! Sensitive span detectors
//!
//! Three independent detectors feed the line aggregator:
//! - [`address::AddressHeuristic`]: fixed-string `address:` trigger
//! - [`model::ModelEntityFilter`]: filtered output of the external entity tagger
//! - [`regex::PatternDetector`]: context-gated regex rules from [`patterns::RuleSet`]

pub mod address;
pub mod model;
pub mod patterns;
pub mod regex;

use crate::domain::CategorySet;
use crate::redaction::models::Finding;

/// Trait for synchronous, stateless line detectors
pub trait LineDetector: Send + Sync {
    /// Detect findings in one line; `lower_text` is `text.to_lowercase()`
    fn detect_line(&self, text: &str, lower_text: &str, categories: &CategorySet) -> Vec<Finding>;

    /// Short detector name for logging
    fn name(&self) -> &'static str;
}

/// Convert a byte index into `text` to a character offset
pub(crate) fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}
