//! Built-in rasterizer for every supported input format

use super::pdf::{self, FirstPage};
use super::{docx, DocumentType, RasterizedPage, Rasterizer};
use crate::config::RasterConfig;
use crate::domain::{RedactorError, Result};
use crate::redaction::imaging::{encode_png, load_font};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::sync::Arc;

/// Rasterizes every supported input format to a PNG page
///
/// PNG and JPEG are normalised to PNG. A PDF yields its first page scan, or its text
/// layer when the page has no image. TXT and DOCX text is drawn onto a white canvas.
pub struct ImageRasterizer {
    config: RasterConfig,
    font: Option<Arc<FontVec>>,
}

impl ImageRasterizer {
    pub fn new(config: RasterConfig, font: Option<Arc<FontVec>>) -> Self {
        Self { config, font }
    }

    /// Use the first system font found
    pub fn with_system_font(config: RasterConfig) -> Self {
        Self::new(config, load_font(None).map(Arc::new))
    }

    fn normalise_image(&self, bytes: &[u8]) -> Result<RasterizedPage> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| RedactorError::Raster(format!("Failed to decode image: {e}")))?;
        Ok(RasterizedPage {
            png_bytes: encode_png(&image)?,
            dpi: None,
        })
    }

    fn rasterize_pdf(&self, bytes: &[u8]) -> Result<RasterizedPage> {
        match pdf::first_page(bytes)? {
            FirstPage::Image { png_bytes, dpi } => Ok(RasterizedPage {
                png_bytes,
                dpi: Some(dpi),
            }),
            FirstPage::Text(text) => self.rasterize_text(&text),
        }
    }

    fn rasterize_text(&self, text: &str) -> Result<RasterizedPage> {
        let font = self.font.as_deref().ok_or_else(|| {
            RedactorError::Raster("No font available for text rasterization".to_string())
        })?;

        let scale = PxScale::from(self.config.font_size);
        let scaled = font.as_scaled(scale);
        let line_height = (scaled.height() + scaled.line_gap()).ceil().max(1.0) as u32;

        let lines: Vec<&str> = text.lines().collect();
        let padding = self.config.padding;
        let height = padding * 2 + line_height * lines.len() as u32;

        let mut canvas = RgbImage::from_pixel(
            self.config.canvas_width,
            height.max(1),
            Rgb([255, 255, 255]),
        );
        for (i, line) in lines.iter().enumerate() {
            let y = padding + line_height * i as u32;
            draw_text_mut(
                &mut canvas,
                Rgb([0, 0, 0]),
                padding as i32,
                y as i32,
                scale,
                font,
                line,
            );
        }

        tracing::debug!(
            line_count = lines.len(),
            width = self.config.canvas_width,
            height,
            "Rasterized text document"
        );

        Ok(RasterizedPage {
            png_bytes: encode_png(&DynamicImage::ImageRgb8(canvas))?,
            dpi: None,
        })
    }
}

impl Rasterizer for ImageRasterizer {
    fn rasterize(&self, bytes: &[u8], doc_type: DocumentType) -> Result<RasterizedPage> {
        match doc_type {
            DocumentType::Png | DocumentType::Jpeg => self.normalise_image(bytes),
            DocumentType::Pdf => self.rasterize_pdf(bytes),
            DocumentType::Txt => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    RedactorError::Raster(format!("Text document is not UTF-8: {e}"))
                })?;
                self.rasterize_text(text)
            }
            DocumentType::Docx => self.rasterize_text(&docx::paragraph_text(bytes)?),
        }
    }
}
