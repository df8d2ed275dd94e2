//! Entity-labeling service boundary
//!
//! The tagger is a black box: given a line of text it returns character spans tagged
//! with a semantic category. Implementations must report character offsets, not bytes.

pub mod http;

use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpEntityTagger;

/// Semantic category reported by the tagger, normalised from its raw label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// People
    Person,
    /// Companies, agencies, institutions
    Org,
    /// Countries, cities, states
    Gpe,
    /// Non-GPE locations
    Location,
    /// Any other label, kept verbatim
    Other(String),
}

impl EntityKind {
    /// Normalise a raw tagger label (`PERSON`, `PER`, `ORG`, `GPE`, `LOC`, `LOCATION`, ...)
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "ORG" => Self::Org,
            "GPE" => Self::Gpe,
            "LOC" | "LOCATION" => Self::Location,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self, Self::Person)
    }

    /// ORG, GPE and LOCATION all map onto ADDRESS
    pub fn is_place(&self) -> bool {
        matches!(self, Self::Org | Self::Gpe | Self::Location)
    }
}

/// One tagged span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEntity {
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    pub kind: EntityKind,
}

impl TaggedEntity {
    pub fn new(start: usize, end: usize, kind: EntityKind) -> Self {
        Self { start, end, kind }
    }
}

/// Entity-labeling service
#[async_trait]
pub trait EntityTagger: Send + Sync {
    /// Tag entities in a single line of text
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RedactorError::Tagger`] when the service call fails.
    async fn tag_entities(&self, text: &str) -> Result<Vec<TaggedEntity>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("PERSON", EntityKind::Person)]
    #[test_case("per", EntityKind::Person)]
    #[test_case("ORG", EntityKind::Org)]
    #[test_case("GPE", EntityKind::Gpe)]
    #[test_case("LOC", EntityKind::Location)]
    #[test_case("LOCATION", EntityKind::Location)]
    #[test_case("DATE", EntityKind::Other("DATE".to_string()))]
    fn test_from_label(label: &str, expected: EntityKind) {
        assert_eq!(EntityKind::from_label(label), expected);
    }

    #[test]
    fn test_place_kinds() {
        assert!(EntityKind::Org.is_place());
        assert!(EntityKind::Gpe.is_place());
        assert!(EntityKind::Location.is_place());
        assert!(!EntityKind::Person.is_place());
        assert!(!EntityKind::Other("NORP".into()).is_place());
    }
}
