//! Document to image conversion boundary
//!
//! The redaction core works on a single page image. A [`Rasterizer`] turns an input
//! document into that image; [`ImageRasterizer`] handles PDF, PNG, JPEG, TXT and
//! DOCX input.

pub mod builtin;
pub mod docx;
pub mod pdf;

use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use builtin::ImageRasterizer;

/// Input document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Txt,
    Docx,
}

impl DocumentType {
    /// Map a file extension (case-insensitive, without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Txt => "txt",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rasterized first page
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedPage {
    /// PNG-encoded page image
    pub png_bytes: Vec<u8>,
    /// Resolution the page was rendered at, when known
    pub dpi: Option<f32>,
}

/// Converts a document into a PNG page image
pub trait Rasterizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::domain::RedactorError::Raster`] when the document cannot be
    /// decoded or its type is not supported by this rasterizer.
    fn rasterize(&self, bytes: &[u8], doc_type: DocumentType) -> Result<RasterizedPage>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("scan.PDF", Some(DocumentType::Pdf))]
    #[test_case("photo.jpg", Some(DocumentType::Jpeg))]
    #[test_case("photo.jpeg", Some(DocumentType::Jpeg))]
    #[test_case("page.png", Some(DocumentType::Png))]
    #[test_case("notes.txt", Some(DocumentType::Txt))]
    #[test_case("letter.docx", Some(DocumentType::Docx))]
    #[test_case("archive.zip", None)]
    #[test_case("README", None)]
    fn test_from_path(path: &str, expected: Option<DocumentType>) {
        assert_eq!(DocumentType::from_path(Path::new(path)), expected);
    }
}
