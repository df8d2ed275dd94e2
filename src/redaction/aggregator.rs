//! Per-line finding aggregation
//!
//! [`SensitiveEntityFinder`] runs the three detectors over each OCR line in a fixed
//! order (address heuristic, model entity filter, pattern rules) and concatenates
//! their findings. Overlapping or duplicate findings are passed through untouched.

use super::detector::address::AddressHeuristic;
use super::detector::model::ModelEntityFilter;
use super::detector::patterns::RuleSet;
use super::detector::regex::PatternDetector;
use super::detector::LineDetector;
use super::lexicon::Lexicon;
use super::models::{Finding, LineDetection, RedactionTarget};
use super::projector::project;
use crate::adapters::ner::EntityTagger;
use crate::domain::{CategorySet, Result, TextLine};
use std::sync::Arc;

/// Combines every detector into one finding list per line
///
/// The entity tagger is a prerequisite for detection: a finder built without one
/// reports nothing for any line, pattern rules included.
pub struct SensitiveEntityFinder {
    address: AddressHeuristic,
    model: Option<ModelEntityFilter>,
    patterns: PatternDetector,
}

impl SensitiveEntityFinder {
    pub fn new(
        rule_set: Arc<RuleSet>,
        lexicon: Arc<Lexicon>,
        tagger: Option<Arc<dyn EntityTagger>>,
    ) -> Self {
        Self {
            address: AddressHeuristic::new(),
            model: tagger.map(|t| ModelEntityFilter::new(t, lexicon)),
            patterns: PatternDetector::with_rules(rule_set),
        }
    }

    /// Whether detection can run at all
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Name of the entity tagger, when one is configured
    pub fn tagger_name(&self) -> Option<&str> {
        self.model.as_ref().map(ModelEntityFilter::tagger_name)
    }

    /// Requested names that no detector can ever report
    pub fn unrecognised_categories<'a>(&self, categories: &'a CategorySet) -> Vec<&'a str> {
        categories.unrecognised(&self.rule_set().labels())
    }

    pub fn rule_set(&self) -> &RuleSet {
        self.patterns.rule_set()
    }

    /// All findings for one line of text, in detector order
    ///
    /// # Errors
    ///
    /// Propagates entity tagger failures.
    pub async fn find_in_line(&self, text: &str, categories: &CategorySet) -> Result<Vec<Finding>> {
        let Some(model) = self.model.as_ref() else {
            return Ok(Vec::new());
        };

        let lower_text = text.to_lowercase();

        let mut findings = self.address.detect_line(text, &lower_text, categories);
        findings.extend(model.detect_line(text, &lower_text, categories).await?);
        findings.extend(self.patterns.detect_line(text, &lower_text, categories));

        Ok(findings)
    }

    /// Findings for every line that produced any, keyed by line index
    ///
    /// Malformed lines are skipped before any detector runs.
    pub async fn detect_lines(
        &self,
        lines: &[TextLine],
        categories: &CategorySet,
    ) -> Result<Vec<LineDetection>> {
        if !self.is_available() {
            tracing::warn!("Entity tagger unavailable, skipping sensitive entity detection");
            return Ok(Vec::new());
        }

        let mut detections = Vec::new();
        for (line_index, line) in lines.iter().enumerate() {
            if line.is_malformed() {
                tracing::debug!(line_index, "Skipping malformed OCR line");
                continue;
            }

            let findings = self.find_in_line(&line.text, categories).await?;
            if findings.is_empty() {
                continue;
            }

            tracing::trace!(line_index, count = findings.len(), "Line findings");
            detections.push(LineDetection {
                line_index,
                findings,
            });
        }

        Ok(detections)
    }

    /// Detect and project: OCR lines in, redaction targets out
    ///
    /// Targets are ordered by line, then by finding order within the line.
    pub async fn find_sensitive_entities(
        &self,
        lines: &[TextLine],
        categories: &CategorySet,
    ) -> Result<Vec<RedactionTarget>> {
        let detections = self.detect_lines(lines, categories).await?;

        let targets: Vec<RedactionTarget> = detections
            .iter()
            .flat_map(|d| project(&lines[d.line_index], &d.findings))
            .collect();

        tracing::debug!(
            line_count = lines.len(),
            lines_with_findings = detections.len(),
            target_count = targets.len(),
            "Sensitive entity detection complete"
        );

        Ok(targets)
    }
}
