//! Redaction renderer
//!
//! Paints an opaque white box over each target and writes the target's label in its
//! top-left corner. Targets are painted in input order, so where two overlap the
//! later label is the one left visible.

use super::imaging::{encode_png, load_font, parse_hex_color};
use super::models::RedactionTarget;
use crate::config::RenderConfig;
use crate::domain::{RedactorError, Result};
use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::sync::Arc;

const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Label appearance
#[derive(Clone)]
pub struct RenderStyle {
    /// Labels are skipped when no font is available; boxes are still drawn
    pub font: Option<Arc<FontVec>>,
    pub font_size: f32,
    pub label_color: Rgba<u8>,
    pub label_offset: i32,
}

impl RenderStyle {
    /// Resolve the `[render]` section, loading the font from disk
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let font = load_font(config.font_path.as_deref()).map(Arc::new);
        if font.is_none() {
            tracing::warn!("No font available, redaction labels will not be drawn");
        }

        Ok(Self {
            font,
            font_size: config.font_size,
            label_color: parse_hex_color(&config.label_color)?,
            label_offset: config.label_offset,
        })
    }

    /// Default sizes and color with an explicit font
    pub fn with_font(font: Option<Arc<FontVec>>) -> Self {
        Self {
            font,
            font_size: 18.0,
            label_color: Rgba([255, 0, 0, 255]),
            label_offset: 2,
        }
    }
}

impl std::fmt::Debug for RenderStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderStyle")
            .field("font", &self.font.as_ref().map(|_| "<font>"))
            .field("font_size", &self.font_size)
            .field("label_color", &self.label_color)
            .field("label_offset", &self.label_offset)
            .finish()
    }
}

/// Draws redaction boxes and labels onto page images
#[derive(Debug, Clone)]
pub struct RedactionRenderer {
    style: RenderStyle,
}

impl RedactionRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Redact `image_bytes` and return the result as PNG
    ///
    /// With no targets the input bytes are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Image`] if the input cannot be decoded or the output
    /// cannot be encoded.
    pub fn render(&self, image_bytes: &[u8], targets: &[RedactionTarget]) -> Result<Vec<u8>> {
        if targets.is_empty() {
            return Ok(image_bytes.to_vec());
        }

        let mut canvas = image::load_from_memory(image_bytes)
            .map_err(|e| RedactorError::Image(format!("Failed to decode page image: {e}")))?
            .to_rgba8();

        for target in targets {
            self.paint(&mut canvas, target);
        }

        encode_png(&image::DynamicImage::ImageRgba8(canvas))
    }

    fn paint(&self, canvas: &mut RgbaImage, target: &RedactionTarget) {
        let Some((x0, y0, x1, y1)) = pixel_bounds(canvas, target) else {
            tracing::debug!(label = %target.label, "Redaction box falls outside the image");
            return;
        };

        let rect = Rect::at(x0, y0).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_filled_rect_mut(canvas, rect, FILL);

        if let Some(font) = self.style.font.as_deref() {
            draw_text_mut(
                canvas,
                self.style.label_color,
                x0 + self.style.label_offset,
                y0 + self.style.label_offset,
                PxScale::from(self.style.font_size),
                font,
                &target.label,
            );
        }
    }
}

/// Inclusive pixel bounds of a target clipped to the canvas
fn pixel_bounds(canvas: &RgbaImage, target: &RedactionTarget) -> Option<(i32, i32, i32, i32)> {
    let tl = target.quad.top_left();
    let br = target.quad.bottom_right();
    if ![tl.x, tl.y, br.x, br.y].iter().all(|v| v.is_finite()) {
        return None;
    }

    let max_x = canvas.width() as i32 - 1;
    let max_y = canvas.height() as i32 - 1;
    let x0 = (tl.x.round() as i32).max(0);
    let y0 = (tl.y.round() as i32).max(0);
    let x1 = (br.x.round() as i32).min(max_x);
    let y1 = (br.y.round() as i32).min(max_y);

    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}
