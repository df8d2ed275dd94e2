//! Integration tests for sensitive entity detection and projection
//!
//! The entity tagger is replaced by in-process fakes.

use async_trait::async_trait;
use redactor::adapters::ner::{EntityKind, EntityTagger, TaggedEntity};
use redactor::domain::{CategorySet, Point, Quad, Result, TextLine};
use redactor::redaction::detector::patterns::RuleSet;
use redactor::redaction::models::DetectionSource;
use redactor::redaction::projector::project;
use redactor::redaction::{Finding, Lexicon, SensitiveEntityFinder};
use std::sync::Arc;
use test_case::test_case;

/// Tagger that reports nothing
struct QuietTagger;

#[async_trait]
impl EntityTagger for QuietTagger {
    async fn tag_entities(&self, _text: &str) -> Result<Vec<TaggedEntity>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "quiet"
    }
}

/// Tagger that labels the whole line as one entity of a fixed kind
struct WholeLineTagger(EntityKind);

#[async_trait]
impl EntityTagger for WholeLineTagger {
    async fn tag_entities(&self, text: &str) -> Result<Vec<TaggedEntity>> {
        Ok(vec![TaggedEntity::new(
            0,
            text.chars().count(),
            self.0.clone(),
        )])
    }

    fn name(&self) -> &str {
        "whole-line"
    }
}

fn finder_with(tagger: Arc<dyn EntityTagger>) -> SensitiveEntityFinder {
    SensitiveEntityFinder::new(
        Arc::new(RuleSet::builtin().unwrap()),
        Arc::new(Lexicon::builtin()),
        Some(tagger),
    )
}

fn finder() -> SensitiveEntityFinder {
    finder_with(Arc::new(QuietTagger))
}

fn categories(names: &[&str]) -> CategorySet {
    names.iter().copied().collect()
}

fn fragment(text: &str, finding: &Finding) -> String {
    finding.fragment(text)
}

#[tokio::test]
async fn test_nric_scenario() {
    let text = "NRIC: S1234567A";
    let findings = finder()
        .find_in_line(text, &categories(&["NRIC/FIN"]))
        .await
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].label, "<NRIC/FIN>");
    assert_eq!(fragment(text, &findings[0]), "S1234567A");
}

#[tokio::test]
async fn test_phone_scenario() {
    let text = "Call 91234567 now";
    let findings = finder()
        .find_in_line(text, &categories(&["PHONE"]))
        .await
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].label, "<PHONE>");
    assert_eq!((findings[0].start_char, findings[0].end_char), (5, 13));
}

#[tokio::test]
async fn test_address_scenario_without_model_output() {
    let text = "Address: 12 Harmony Road";
    let findings = finder()
        .find_in_line(text, &categories(&["ADDRESS"]))
        .await
        .unwrap();

    assert!(!findings.is_empty());
    let heuristic = findings
        .iter()
        .find(|f| f.source == DetectionSource::Heuristic)
        .unwrap();
    assert_eq!(heuristic.label, "<ADDRESS>");
    assert_eq!(heuristic.start_char, 8);
    assert_eq!(heuristic.end_char, text.chars().count());
}

#[test_case("Tel: 91234567"; "labelled")]
#[test_case("91234567"; "bare")]
#[test_case("random words 6123-4567 more words"; "hyphenated")]
#[test_case("overseas +65 6123 4567"; "international")]
#[tokio::test]
async fn test_phone_has_no_context_gate(text: &str) {
    let findings = finder()
        .find_in_line(text, &categories(&["PHONE"]))
        .await
        .unwrap();
    assert!(findings.iter().any(|f| f.label == "<PHONE>"), "{text}");
}

#[test_case("Ref 123456"; "plain reference")]
#[test_case("Order number 654321 shipped"; "order number")]
#[tokio::test]
async fn test_mcr_requires_context(text: &str) {
    let findings = finder()
        .find_in_line(text, &categories(&["MCR no."]))
        .await
        .unwrap();
    assert!(findings.is_empty());
}

#[tokio::test]
async fn test_mcr_with_context() {
    let text = "Doctor MCR: 123456";
    let findings = finder()
        .find_in_line(text, &categories(&["MCR no."]))
        .await
        .unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(fragment(text, &findings[0]), "123456");
}

#[tokio::test]
async fn test_email_line_gets_no_model_findings() {
    let finder = finder_with(Arc::new(WholeLineTagger(EntityKind::Person)));
    let text = "Jane Tan jane.tan@example.com";
    let findings = finder
        .find_in_line(text, &CategorySet::all())
        .await
        .unwrap();

    assert!(findings.iter().all(|f| f.source != DetectionSource::Model));
    assert!(findings.iter().any(|f| f.label == "<EMAIL>"));
}

#[tokio::test]
async fn test_person_entity_is_reported() {
    let finder = finder_with(Arc::new(WholeLineTagger(EntityKind::Person)));
    let findings = finder
        .find_in_line("Jane Tan", &categories(&["PERSON"]))
        .await
        .unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].label, "<PERSON>");
    assert_eq!(findings[0].source, DetectionSource::Model);
}

#[tokio::test]
async fn test_blocked_entity_is_dropped() {
    let finder = finder_with(Arc::new(WholeLineTagger(EntityKind::Person)));
    let findings = finder
        .find_in_line("Patient", &categories(&["PERSON"]))
        .await
        .unwrap();
    assert!(findings.is_empty());
}

#[tokio::test]
async fn test_place_needs_address_context() {
    let finder = finder_with(Arc::new(WholeLineTagger(EntityKind::Gpe)));
    let cats = categories(&["ADDRESS"]);

    let without = finder.find_in_line("Tampines", &cats).await.unwrap();
    assert!(without.is_empty());

    let with = finder
        .find_in_line("Tampines Avenue Singapore", &cats)
        .await
        .unwrap();
    assert_eq!(with.len(), 1);
    assert_eq!(with[0].label, "<ADDRESS>");
}

#[tokio::test]
async fn test_detection_is_idempotent() {
    let finder = finder_with(Arc::new(WholeLineTagger(EntityKind::Person)));
    let text = "DOB 01/02/1985, NRIC S1234567A, Tel 91234567";
    let cats = CategorySet::all();

    let first = finder.find_in_line(text, &cats).await.unwrap();
    let second = finder.find_in_line(text, &cats).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_ocr_result_yields_nothing() {
    let targets = finder()
        .find_sensitive_entities(&[], &CategorySet::all())
        .await
        .unwrap();
    assert!(targets.is_empty());
}

#[test_case(10.0, 17; "short line")]
#[test_case(333.5, 40; "fractional width")]
fn test_projection_of_whole_line_keeps_width(width: f64, chars: usize) {
    let text = "x".repeat(chars);
    let line = TextLine::new(
        Quad::from_corners(Point::new(12.0, 40.0), Point::new(12.0 + width, 64.0)),
        text,
        0.9,
    );
    let finding = Finding::new(0, chars, "PERSON", DetectionSource::Model);

    let targets = project(&line, &[finding]);
    assert_eq!(targets.len(), 1);
    assert!((targets[0].quad.width() - width).abs() < 1e-9);
    assert_eq!(targets[0].quad.height(), 24.0);
    assert_eq!(targets[0].label, "<PERSON>");
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let lines = vec![
        TextLine::new(
            Quad::from_corners(Point::new(0.0, 0.0), Point::new(0.0, 20.0)),
            "Call 91234567 now",
            0.9,
        ),
        TextLine::new(
            Quad::from_corners(Point::new(0.0, 30.0), Point::new(170.0, 50.0)),
            "Call 91234567 now",
            0.9,
        ),
    ];
    let detections = finder()
        .detect_lines(&lines, &categories(&["PHONE"]))
        .await
        .unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].line_index, 1);
}
