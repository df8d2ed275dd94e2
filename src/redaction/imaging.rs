//! Shared image helpers: font discovery, color parsing and PNG encoding

use crate::domain::{RedactorError, Result};
use ab_glyph::FontVec;
use image::{DynamicImage, ImageFormat, Rgba};
use std::io::Cursor;
use std::path::Path;

/// Common font locations searched when no font is configured
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font from `path`, or the first readable system font when `path` is `None`
///
/// A configured path that cannot be loaded is logged and falls back to the search.
pub fn load_font(path: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = path {
        match read_font(path) {
            Some(font) => return Some(font),
            None => tracing::warn!(
                path = %path.display(),
                "Configured font could not be loaded, searching system fonts"
            ),
        }
    }

    for candidate in SYSTEM_FONT_PATHS {
        if let Some(font) = read_font(Path::new(candidate)) {
            tracing::debug!(path = candidate, "Loaded system font");
            return Some(font);
        }
    }

    tracing::debug!("No system font found, label text will be skipped");
    None
}

fn read_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec(data).ok()
}

/// Parse `#RRGGBB` (leading `#` optional) into an opaque color
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(RedactorError::Validation(format!(
            "Invalid color '{value}'. Expected #RRGGBB"
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| {
            RedactorError::Validation(format!("Invalid color '{value}'. Expected #RRGGBB"))
        })
    };

    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// Encode an image as PNG
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| RedactorError::Image(format!("PNG encoding failed: {e}")))?;
    Ok(buffer)
}

/// DejaVu Sans, shipped with the test fixtures
#[cfg(test)]
pub(crate) fn fixture_font() -> FontVec {
    FontVec::try_from_vec(include_bytes!("../../tests/fixtures/DejaVuSans.ttf").to_vec())
        .expect("fixture font should parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font;
    use test_case::test_case;

    #[test_case("#FF0000", [255, 0, 0, 255])]
    #[test_case("00ff7f", [0, 255, 127, 255])]
    #[test_case(" #000000 ", [0, 0, 0, 255])]
    fn test_parse_hex_color(value: &str, expected: [u8; 4]) {
        assert_eq!(parse_hex_color(value).unwrap(), Rgba(expected));
    }

    #[test_case("red")]
    #[test_case("#FFF")]
    #[test_case("#GG0000")]
    fn test_parse_hex_color_rejects(value: &str) {
        assert!(parse_hex_color(value).is_err());
    }

    #[test]
    fn test_encode_png_roundtrips_dimensions() {
        let image = DynamicImage::new_rgba8(7, 3);
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[test]
    fn test_missing_font_path_falls_back() {
        // Either a system font is found or nothing is; the bad path must not panic
        let _ = load_font(Some(Path::new("/nonexistent/font.ttf")));
    }

    #[test]
    fn test_configured_font_path_is_loaded() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf");
        assert!(load_font(Some(&path)).is_some());
        assert!(fixture_font().glyph_count() > 0);
    }
}
