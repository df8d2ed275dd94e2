//! Block-list and address-context vocabulary for model-sourced entities

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Form labels and field names the tagger tends to mislabel as names or places
pub const DEFAULT_BLOCK_LIST: &[&str] = &[
    "patient",
    "patient's",
    "doctor",
    "doctor's",
    "medical",
    "report",
    "particulars",
    "name",
    "age",
    "mcr",
    "nric",
    "fin",
    "passport",
    "hospital",
    "clinic",
    "visit",
    "date",
    "birth",
];

/// Words that mark a line as address-like
pub const DEFAULT_ADDRESS_CONTEXT_WORDS: &[&str] = &[
    "address:",
    "hospital",
    "clinic",
    "road",
    "street",
    "avenue",
    "blvd",
    "singapore",
    "block",
    "unit",
    "sunnyville",
    "harmony",
];

/// Read-only vocabulary consulted by the model entity filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    block_list: HashSet<String>,
    address_context_words: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon; all entries are lowercased
    pub fn new<B, C, S, T>(block_list: B, address_context_words: C) -> Self
    where
        B: IntoIterator<Item = S>,
        C: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            block_list: block_list
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            address_context_words: address_context_words
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// The shipped vocabulary
    pub fn builtin() -> Self {
        Self::new(DEFAULT_BLOCK_LIST, DEFAULT_ADDRESS_CONTEXT_WORDS)
    }

    /// Whether a lowercased entity text is vetoed
    pub fn is_blocked(&self, lower_entity_text: &str) -> bool {
        self.block_list.contains(lower_entity_text)
    }

    /// Whether a lowercased line contains any address-context word
    pub fn has_address_context(&self, lower_text: &str) -> bool {
        self.address_context_words
            .iter()
            .any(|word| lower_text.contains(word.as_str()))
    }

    pub fn block_list_len(&self) -> usize {
        self.block_list.len()
    }

    pub fn address_context_words(&self) -> &[String] {
        &self.address_context_words
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_block_list() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.is_blocked("patient"));
        assert!(lexicon.is_blocked("doctor's"));
        assert!(!lexicon.is_blocked("jane tan"));
        assert_eq!(lexicon.block_list_len(), DEFAULT_BLOCK_LIST.len());
    }

    #[test]
    fn test_address_context_is_substring_match() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.has_address_context("12 harmony road"));
        assert!(lexicon.has_address_context("blk 5 ang mo kio, singapore 560005"));
        assert!(!lexicon.has_address_context("seen by dr lim"));
    }

    #[test]
    fn test_entries_are_lowercased() {
        let lexicon = Lexicon::new(["Ward"], ["LANE"]);
        assert!(lexicon.is_blocked("ward"));
        assert!(lexicon.has_address_context("memory lane"));
    }
}
