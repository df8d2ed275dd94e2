//! OCR text line model

use super::geometry::Quad;
use serde::{Deserialize, Serialize};

/// One line of text detected by the OCR service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Bounding quadrilateral (top-left, top-right, bottom-right, bottom-left)
    pub quad: Quad,
    /// Recognized text
    pub text: String,
    /// Recognition confidence (0.0 - 1.0)
    #[serde(default)]
    pub confidence: f64,
}

impl TextLine {
    pub fn new(quad: Quad, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// Text length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Lines with no text or an unusable quad carry nothing to redact
    pub fn is_malformed(&self) -> bool {
        self.text.is_empty() || self.quad.is_degenerate()
    }
}
