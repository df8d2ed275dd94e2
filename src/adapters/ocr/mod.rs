//! Text detection (OCR) boundary
//!
//! Given image bytes, a [`TextDetector`] returns one [`TextLine`] per detected line
//! of text. Two payload shapes are understood wherever OCR output is parsed:
//!
//! ```json
//! { "lines": [ { "quad": [[0,0],[90,0],[90,20],[0,20]], "text": "NRIC: S1234567A", "confidence": 0.97 } ] }
//! ```
//!
//! or the EasyOCR `readtext` shape:
//!
//! ```json
//! [ [ [[0,0],[90,0],[90,20],[0,20]], "NRIC: S1234567A", 0.97 ] ]
//! ```

pub mod http;
pub mod sidecar;

use crate::config::{OcrConfig, OcrProvider};
use crate::domain::{Quad, RedactorError, Result, ServiceError, TextLine};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

pub use http::HttpTextDetector;
pub use sidecar::SidecarTextDetector;

/// Text detection service
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Detect text lines in an encoded image
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Ocr`] when the service call fails or its output
    /// cannot be parsed.
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextLine>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OcrPayload {
    Lines { lines: Vec<TextLine> },
    Tuples(Vec<(Quad, String, f64)>),
}

/// Parse OCR JSON in either accepted shape
///
/// # Errors
///
/// Returns [`RedactorError::Ocr`] with [`ServiceError::InvalidResponse`] when the
/// document matches neither shape.
pub fn parse_ocr_json(json: &str) -> Result<Vec<TextLine>> {
    let payload: OcrPayload = serde_json::from_str(json).map_err(|e| {
        RedactorError::Ocr(ServiceError::InvalidResponse(format!(
            "Unrecognised OCR payload: {e}"
        )))
    })?;

    Ok(match payload {
        OcrPayload::Lines { lines } => lines,
        OcrPayload::Tuples(tuples) => tuples
            .into_iter()
            .map(|(quad, text, confidence)| TextLine::new(quad, text, confidence))
            .collect(),
    })
}

/// Build the configured text detector for one input document
///
/// The sidecar provider reads `explicit_sidecar`, then `ocr.sidecar_path`, then
/// `<input>.ocr.json`, in that order of preference.
///
/// # Errors
///
/// Returns an error if the HTTP detector cannot be constructed.
pub fn build_text_detector(
    config: &OcrConfig,
    input: &Path,
    explicit_sidecar: Option<&Path>,
) -> Result<Arc<dyn TextDetector>> {
    if let Some(path) = explicit_sidecar {
        return Ok(Arc::new(SidecarTextDetector::new(path)));
    }

    match config.provider {
        OcrProvider::Http => Ok(Arc::new(HttpTextDetector::new(config)?)),
        OcrProvider::Sidecar => Ok(Arc::new(match config.sidecar_path.as_deref() {
            Some(path) => SidecarTextDetector::new(path),
            None => SidecarTextDetector::for_input(input),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_shape() {
        let json = r#"{"lines":[{"quad":[[0,0],[90,0],[90,20],[0,20]],"text":"NRIC: S1234567A","confidence":0.97}]}"#;
        let lines = parse_ocr_json(json).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "NRIC: S1234567A");
        assert_eq!(lines[0].quad.width(), 90.0);
    }

    #[test]
    fn test_parse_easyocr_shape() {
        let json = r#"[[[[10,5],[110,5],[110,25],[10,25]],"Call 91234567 now",0.88],
                       [[[10,30],[60,30],[60,50],[10,50]],"Hello",0.5]]"#;
        let lines = parse_ocr_json(json).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quad.top_left().x, 10.0);
        assert_eq!(lines[1].confidence, 0.5);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_ocr_json("[]").unwrap().is_empty());
        assert!(parse_ocr_json(r#"{"lines":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        let err = parse_ocr_json(r#"{"text":"x"}"#).unwrap_err();
        assert!(matches!(
            err,
            RedactorError::Ocr(ServiceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_build_text_detector_sidecar_defaults_next_to_input() {
        let detector =
            build_text_detector(&OcrConfig::default(), Path::new("scans/a.png"), None).unwrap();
        assert_eq!(detector.name(), "sidecar");
    }

    #[test]
    fn test_build_text_detector_http_requires_endpoint() {
        let config = OcrConfig {
            provider: OcrProvider::Http,
            ..OcrConfig::default()
        };
        assert!(build_text_detector(&config, Path::new("a.png"), None).is_err());

        let explicit = build_text_detector(
            &config,
            Path::new("a.png"),
            Some(Path::new("a.json")),
        )
        .unwrap();
        assert_eq!(explicit.name(), "sidecar");
    }
}
