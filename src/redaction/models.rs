//! Finding and redaction target data models

use crate::domain::{format_label, Category, Quad};
use serde::{Deserialize, Serialize};

/// Which detector produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Fixed-string address heuristic
    Heuristic,
    /// External entity-labeling model
    Model,
    /// Regular-expression rule
    Pattern,
}

/// A sensitive span inside one text line, before projection
///
/// Offsets are character offsets into the line text with
/// `start_char < end_char <= text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub start_char: usize,
    pub end_char: usize,
    /// Rendered label, e.g. `<PHONE>`
    pub label: String,
    pub source: DetectionSource,
}

impl Finding {
    /// Create a finding for a named category
    pub fn new(start_char: usize, end_char: usize, category: &str, source: DetectionSource) -> Self {
        Self {
            start_char,
            end_char,
            label: format_label(category),
            source,
        }
    }

    /// Create a finding for a built-in category
    pub fn for_category(
        start_char: usize,
        end_char: usize,
        category: Category,
        source: DetectionSource,
    ) -> Self {
        Self::new(start_char, end_char, category.as_str(), source)
    }

    /// Number of characters covered
    pub fn char_len(&self) -> usize {
        self.end_char - self.start_char
    }

    /// The covered fragment of `text`
    pub fn fragment(&self, text: &str) -> String {
        text.chars()
            .skip(self.start_char)
            .take(self.char_len())
            .collect()
    }
}

/// A finding projected into pixel space, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionTarget {
    pub quad: Quad,
    pub label: String,
}

impl RedactionTarget {
    pub fn new(quad: Quad, label: impl Into<String>) -> Self {
        Self {
            quad,
            label: label.into(),
        }
    }
}

/// All findings for a single OCR line
#[derive(Debug, Clone, PartialEq)]
pub struct LineDetection {
    /// Position of the line in the OCR output
    pub line_index: usize,
    pub findings: Vec<Finding>,
}

impl LineDetection {
    /// Resolve each finding against the line text it came from
    pub fn spans(&self, text: &str) -> Vec<DetectedSpan> {
        self.findings
            .iter()
            .map(|f| DetectedSpan {
                line_index: self.line_index,
                label: f.label.clone(),
                source: f.source,
                text: f.fragment(text),
            })
            .collect()
    }
}

/// A finding together with the text it covers
///
/// Holds plaintext; only hashes or truncated samples of `text` leave the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSpan {
    pub line_index: usize,
    pub label: String,
    pub source: DetectionSource,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_label_format() {
        let finding = Finding::for_category(5, 13, Category::Phone, DetectionSource::Pattern);
        assert_eq!(finding.label, "<PHONE>");
        assert_eq!(finding.char_len(), 8);
    }

    #[test]
    fn test_fragment_uses_character_offsets() {
        let text = "Née Zoë 91234567";
        let finding = Finding::for_category(8, 16, Category::Phone, DetectionSource::Pattern);
        assert_eq!(finding.fragment(text), "91234567");
    }

    #[test]
    fn test_line_detection_spans() {
        let detection = LineDetection {
            line_index: 3,
            findings: vec![Finding::for_category(
                6,
                15,
                Category::NricFin,
                DetectionSource::Pattern,
            )],
        };
        let spans = detection.spans("NRIC: S1234567A");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].line_index, 3);
        assert_eq!(spans[0].label, "<NRIC/FIN>");
        assert_eq!(spans[0].text, "S1234567A");
    }

    #[test]
    fn test_custom_category_label() {
        let finding = Finding::new(0, 3, "PASSPORT_NO", DetectionSource::Pattern);
        assert_eq!(finding.label, "<PASSPORT_NO>");
    }
}
