//! Character span to pixel box projection
//!
//! OCR reports one quadrilateral per line and nothing per character, so every
//! character is assumed to have the same width: `line width / character count`.
//! Boxes are axis-aligned, spanning the line's top and bottom edges.

use super::models::{Finding, RedactionTarget};
use crate::domain::{Point, Quad, TextLine};

/// Project findings for one line onto pixel-space redaction targets
///
/// Returns an empty list for malformed lines. Findings whose span does not fit
/// the line text are dropped.
pub fn project(line: &TextLine, findings: &[Finding]) -> Vec<RedactionTarget> {
    if line.is_malformed() {
        return Vec::new();
    }

    let char_len = line.char_len();
    let top_left = line.quad.top_left();
    let bottom_right = line.quad.bottom_right();
    let char_width = line.quad.width() / char_len as f64;

    findings
        .iter()
        .filter(|f| f.start_char < f.end_char && f.end_char <= char_len)
        .map(|finding| {
            let x0 = top_left.x + finding.start_char as f64 * char_width;
            let x1 = top_left.x + finding.end_char as f64 * char_width;
            RedactionTarget::new(
                Quad::from_corners(Point::new(x0, top_left.y), Point::new(x1, bottom_right.y)),
                finding.label.clone(),
            )
        })
        .collect()
}
