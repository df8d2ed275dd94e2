//! Single-page PDF packaging of a redacted image

use crate::domain::{RedactorError, Result};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};

const MM_PER_INCH: f32 = 25.4;
const DOCUMENT_TITLE: &str = "Redacted document";

/// Wraps a page image into a one-page PDF sized to the image at a given DPI
#[derive(Debug, Clone)]
pub struct PdfExporter {
    default_dpi: f32,
}

impl PdfExporter {
    pub fn new(default_dpi: f32) -> Self {
        Self { default_dpi }
    }

    /// Build the PDF; `dpi` falls back to the exporter default when absent or invalid
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Export`] if the image cannot be decoded or the PDF
    /// cannot be serialized.
    pub fn export(&self, image_bytes: &[u8], dpi: Option<f32>) -> Result<Vec<u8>> {
        let dpi = dpi
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(self.default_dpi);

        let rgb = image::load_from_memory(image_bytes)
            .map_err(|e| RedactorError::Export(format!("Failed to decode page image: {e}")))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();

        let (doc, page, layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(width as f32 * MM_PER_INCH / dpi),
            Mm(height as f32 * MM_PER_INCH / dpi),
            "Page 1",
        );
        let layer = doc.get_page(page).get_layer(layer);

        let xobject = ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };

        Image::from(xobject).add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(dpi),
                ..Default::default()
            },
        );

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RedactorError::Export(format!("Failed to write PDF: {e}")))?;

        tracing::debug!(width, height, dpi, size = bytes.len(), "Exported PDF");
        Ok(bytes)
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::imaging::encode_png;
    use image::DynamicImage;

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&DynamicImage::new_rgb8(width, height)).unwrap()
    }

    fn page_size(pdf: &[u8]) -> String {
        let text = String::from_utf8_lossy(pdf);
        let start = text.find("/MediaBox").unwrap();
        let end = start + text[start..].find(']').unwrap();
        text[start..=end].to_string()
    }

    #[test]
    fn test_export_produces_pdf() {
        let pdf = PdfExporter::default().export(&png(200, 100), None).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_page_size_follows_dpi() {
        let exporter = PdfExporter::default();
        let at_default = exporter.export(&png(200, 200), None).unwrap();
        let at_100 = exporter.export(&png(200, 200), Some(100.0)).unwrap();
        assert_ne!(page_size(&at_default), page_size(&at_100));
    }

    #[test]
    fn test_invalid_dpi_falls_back_to_default() {
        let exporter = PdfExporter::default();
        let a = exporter.export(&png(50, 50), Some(0.0)).unwrap();
        let b = exporter.export(&png(50, 50), None).unwrap();
        assert_eq!(page_size(&a), page_size(&b));
    }

    #[test]
    fn test_undecodable_image_is_export_error() {
        let err = PdfExporter::default().export(b"garbage", None).unwrap_err();
        assert!(matches!(err, RedactorError::Export(_)));
    }
}
