//! Model entity filter
//!
//! Restricts the external tagger's output to PERSON and ADDRESS findings using the
//! requested categories, the block-list, and a per-line address-context gate.

use crate::adapters::ner::EntityTagger;
use crate::domain::{Category, CategorySet, Result};
use crate::redaction::lexicon::Lexicon;
use crate::redaction::models::{DetectionSource, Finding};
use std::sync::Arc;

/// Filters tagged entities into findings
pub struct ModelEntityFilter {
    tagger: Arc<dyn EntityTagger>,
    lexicon: Arc<Lexicon>,
}

impl ModelEntityFilter {
    pub fn new(tagger: Arc<dyn EntityTagger>, lexicon: Arc<Lexicon>) -> Self {
        Self { tagger, lexicon }
    }

    pub fn tagger_name(&self) -> &str {
        self.tagger.name()
    }

    /// Tag one line and keep the entities that survive filtering
    ///
    /// Lines containing `@` are skipped without calling the tagger so that email
    /// addresses are never tagged as names or places.
    pub async fn detect_line(
        &self,
        text: &str,
        lower_text: &str,
        categories: &CategorySet,
    ) -> Result<Vec<Finding>> {
        if text.contains('@') {
            return Ok(Vec::new());
        }

        let want_person = categories.contains_category(Category::Person);
        let want_address = categories.contains_category(Category::Address);
        if !want_person && !want_address {
            return Ok(Vec::new());
        }

        let entities = self.tagger.tag_entities(text).await?;

        // Computed once per line, before any span is inspected
        let address_context = self.lexicon.has_address_context(lower_text);
        let char_len = text.chars().count();

        let mut findings = Vec::new();
        for entity in entities {
            if entity.start >= entity.end || entity.end > char_len {
                tracing::debug!(
                    start = entity.start,
                    end = entity.end,
                    char_len,
                    "Discarding out-of-range tagged span"
                );
                continue;
            }

            let entity_text: String = text
                .chars()
                .skip(entity.start)
                .take(entity.end - entity.start)
                .collect();
            if self.lexicon.is_blocked(&entity_text.to_lowercase()) {
                continue;
            }

            if entity.kind.is_person() && want_person {
                findings.push(Finding::for_category(
                    entity.start,
                    entity.end,
                    Category::Person,
                    DetectionSource::Model,
                ));
            } else if entity.kind.is_place() && want_address && address_context {
                findings.push(Finding::for_category(
                    entity.start,
                    entity.end,
                    Category::Address,
                    DetectionSource::Model,
                ));
            }
        }

        Ok(findings)
    }
}
