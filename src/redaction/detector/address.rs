//! Fixed-string address heuristic

use super::LineDetector;
use crate::domain::{Category, CategorySet};
use crate::redaction::models::{DetectionSource, Finding};

const ADDRESS_TRIGGER: &str = "address:";

/// Emits one ADDRESS finding covering everything after the first `:` on lines
/// that contain `address:`. Independent of the entity tagger.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddressHeuristic;

impl AddressHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl LineDetector for AddressHeuristic {
    fn detect_line(&self, text: &str, lower_text: &str, categories: &CategorySet) -> Vec<Finding> {
        if !categories.contains_category(Category::Address) || !lower_text.contains(ADDRESS_TRIGGER)
        {
            return Vec::new();
        }

        let Some(colon) = text.chars().position(|c| c == ':') else {
            return Vec::new();
        };

        let start_char = colon + 1;
        let end_char = text.chars().count();
        if start_char >= end_char {
            return Vec::new();
        }

        vec![Finding::for_category(
            start_char,
            end_char,
            Category::Address,
            DetectionSource::Heuristic,
        )]
    }

    fn name(&self) -> &'static str {
        "address_heuristic"
    }
}
