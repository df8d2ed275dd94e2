//! Precomputed OCR output read from disk
//!
//! Useful when text detection runs as a separate batch step: the OCR tool writes
//! `<document>.ocr.json` next to each document and redaction picks it up.

use super::{parse_ocr_json, TextDetector};
use crate::domain::{RedactorError, Result, ServiceError, TextLine};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Text detector that ignores the image and returns the lines stored in a JSON file
#[derive(Debug, Clone)]
pub struct SidecarTextDetector {
    path: PathBuf,
}

impl SidecarTextDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sidecar conventionally stored next to `input` as `<input>.ocr.json`
    pub fn for_input(input: &Path) -> Self {
        let mut name = input.as_os_str().to_os_string();
        name.push(".ocr.json");
        Self::new(PathBuf::from(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TextDetector for SidecarTextDetector {
    async fn detect_text(&self, _image: &[u8]) -> Result<Vec<TextLine>> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RedactorError::Ocr(ServiceError::Unavailable(format!(
                "Failed to read OCR sidecar {}: {e}",
                self.path.display()
            )))
        })?;

        parse_ocr_json(&json)
    }

    fn name(&self) -> &str {
        "sidecar"
    }
}
