//! First-page extraction for PDF documents
//!
//! Scanned PDFs carry each page as an image XObject, so the largest image on the
//! first page is taken as the page scan. A page without images falls back to its
//! text layer, which the caller draws onto the text canvas.

use crate::domain::{RedactorError, Result};
use crate::redaction::imaging::encode_png;
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Resolution assumed when the page size is unknown
pub const DEFAULT_PDF_DPI: f32 = 200.0;

const POINTS_PER_INCH: f32 = 72.0;
const MAX_FORM_DEPTH: usize = 4;
const MAX_PARENT_DEPTH: usize = 32;

/// What the first page of a PDF yielded
#[derive(Debug, Clone, PartialEq)]
pub enum FirstPage {
    /// The page scan as PNG, with the resolution implied by the page size
    Image { png_bytes: Vec<u8>, dpi: f32 },
    /// The page's text layer
    Text(String),
}

/// Extract the first page of a PDF
///
/// # Errors
///
/// Returns [`RedactorError::Raster`] when the PDF cannot be parsed, has no pages,
/// its page image uses an unsupported encoding, or the page carries neither an
/// image nor any text.
pub fn first_page(bytes: &[u8]) -> Result<FirstPage> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| RedactorError::Raster(format!("Failed to parse PDF: {e}")))?;

    let pages = doc.get_pages();
    let Some((&page_number, &page_id)) = pages.iter().next() else {
        return Err(RedactorError::Raster("PDF has no pages".to_string()));
    };

    if let Some(image) = largest_page_image(&doc, page_id)? {
        let dpi = page_width_points(&doc, page_id)
            .map(|points| image.width() as f32 * POINTS_PER_INCH / points)
            .filter(|dpi| dpi.is_finite() && *dpi > 0.0)
            .unwrap_or(DEFAULT_PDF_DPI);

        tracing::debug!(
            page_count = pages.len(),
            width = image.width(),
            height = image.height(),
            dpi,
            "Extracted first page image from PDF"
        );

        return Ok(FirstPage::Image {
            png_bytes: encode_png(&image)?,
            dpi,
        });
    }

    let text = doc
        .extract_text(&[page_number])
        .map_err(|e| RedactorError::Raster(format!("Failed to extract PDF text: {e}")))?;
    if text.trim().is_empty() {
        return Err(RedactorError::Raster(
            "First PDF page has neither an image nor a text layer".to_string(),
        ));
    }

    tracing::debug!(chars = text.chars().count(), "Using PDF text layer");
    Ok(FirstPage::Text(text))
}

/// Page attribute lookup following the `/Parent` chain for inherited keys
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(value) = node.get_deref(key, doc) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn page_width_points(doc: &Document, page_id: ObjectId) -> Option<f32> {
    let media_box = inherited(doc, page_id, b"MediaBox")?.as_array().ok()?;
    if media_box.len() != 4 {
        return None;
    }
    let x0 = doc.dereference(&media_box[0]).ok()?.1.as_float().ok()?;
    let x1 = doc.dereference(&media_box[2]).ok()?.1.as_float().ok()?;
    let width = (x1 - x0).abs();
    (width > 0.0).then_some(width)
}

/// Decode the largest image XObject on the page, trying smaller ones if it fails
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Option<DynamicImage>> {
    let Some(resources) = inherited(doc, page_id, b"Resources").and_then(|r| r.as_dict().ok())
    else {
        return Ok(None);
    };

    let mut candidates = Vec::new();
    collect_images(doc, resources, 0, &mut candidates);
    if candidates.is_empty() {
        return Ok(None);
    }

    candidates.sort_by_key(|stream| std::cmp::Reverse(pixel_area(stream)));

    let mut last_error = None;
    for stream in candidates {
        match decode_image(doc, stream) {
            Ok(image) => return Ok(Some(image)),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undecodable PDF image");
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| RedactorError::Raster("No decodable PDF page image".to_string())))
}

fn collect_images<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    depth: usize,
    out: &mut Vec<&'a Stream>,
) {
    let Ok(xobjects) = resources.get_deref(b"XObject", doc).and_then(Object::as_dict) else {
        return;
    };

    for (_, object) in xobjects.iter() {
        let Ok((_, Object::Stream(stream))) = doc.dereference(object) else {
            continue;
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name_str) {
            Ok("Image") if !is_stencil_mask(&stream.dict) => out.push(stream),
            Ok("Form") if depth < MAX_FORM_DEPTH => {
                if let Ok(inner) = stream
                    .dict
                    .get_deref(b"Resources", doc)
                    .and_then(Object::as_dict)
                {
                    collect_images(doc, inner, depth + 1, out);
                }
            }
            _ => {}
        }
    }
}

fn is_stencil_mask(dict: &Dictionary) -> bool {
    dict.get(b"ImageMask")
        .and_then(Object::as_bool)
        .unwrap_or(false)
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .and_then(Object::as_i64)
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
}

fn pixel_area(stream: &Stream) -> u64 {
    let width = dimension(&stream.dict, b"Width").unwrap_or(0);
    let height = dimension(&stream.dict, b"Height").unwrap_or(0);
    u64::from(width) * u64::from(height)
}

fn decode_image(doc: &Document, stream: &Stream) -> Result<DynamicImage> {
    // A stream without /Filter holds raw samples
    let filters = stream.filters().unwrap_or_default();

    match filters.as_slice() {
        [] => samples_to_image(doc, &stream.dict, &stream.content),
        [only] if only == "DCTDecode" => {
            image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                .map_err(|e| RedactorError::Raster(format!("Failed to decode PDF JPEG: {e}")))
        }
        _ if filters
            .iter()
            .all(|f| f == "FlateDecode" || f == "LZWDecode") =>
        {
            // lopdf declines to decompress streams marked as images
            let mut plain = stream.clone();
            plain.dict.remove(b"Subtype");
            let samples = plain.decompressed_content().map_err(|e| {
                RedactorError::Raster(format!("Failed to decompress PDF image: {e}"))
            })?;
            samples_to_image(doc, &stream.dict, &samples)
        }
        _ => Err(RedactorError::Raster(format!(
            "Unsupported PDF image encoding: {}",
            filters.join(", ")
        ))),
    }
}

/// Number of color components for the image's color space
fn components(doc: &Document, dict: &Dictionary) -> Result<usize> {
    let Ok(space) = dict.get_deref(b"ColorSpace", doc) else {
        return Ok(3);
    };

    let name: &[u8] = match space {
        Object::Name(name) => name.as_slice(),
        Object::Array(items) => match items.first() {
            Some(Object::Name(name)) if name == b"ICCBased" => {
                let n = items
                    .get(1)
                    .and_then(|o| doc.dereference(o).ok())
                    .and_then(|(_, o)| o.as_stream().ok())
                    .and_then(|s| s.dict.get(b"N").and_then(Object::as_i64).ok());
                return match n {
                    Some(n @ (1 | 3 | 4)) => Ok(n as usize),
                    _ => Ok(3),
                };
            }
            Some(Object::Name(name)) => name.as_slice(),
            _ => b"",
        },
        _ => b"",
    };

    match name {
        b"DeviceGray" | b"CalGray" => Ok(1),
        b"DeviceRGB" | b"CalRGB" => Ok(3),
        b"DeviceCMYK" => Ok(4),
        other => Err(RedactorError::Raster(format!(
            "Unsupported PDF color space: {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn samples_to_image(doc: &Document, dict: &Dictionary, samples: &[u8]) -> Result<DynamicImage> {
    let (Some(width), Some(height)) = (dimension(dict, b"Width"), dimension(dict, b"Height"))
    else {
        return Err(RedactorError::Raster(
            "PDF image is missing its dimensions".to_string(),
        ));
    };
    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(Object::as_i64)
        .unwrap_or(8);
    let channels = components(doc, dict)?;

    let (w, h) = (width as usize, height as usize);
    let row_bytes = match bits {
        8 => w * channels,
        1 if channels == 1 => w.div_ceil(8),
        _ => {
            return Err(RedactorError::Raster(format!(
                "Unsupported PDF image depth: {bits} bits x {channels} components"
            )))
        }
    };

    let expected = row_bytes * h;
    if samples.len() < expected {
        return Err(RedactorError::Raster(format!(
            "PDF image data too short: {} bytes, expected {expected}",
            samples.len()
        )));
    }
    let samples = &samples[..expected];

    let short = || RedactorError::Raster("PDF image buffer mismatch".to_string());

    let image = match (bits, channels) {
        (1, _) => {
            let pixels = samples
                .chunks(row_bytes)
                .flat_map(|row| {
                    (0..w).map(move |x| {
                        if row[x / 8] & (0x80 >> (x % 8)) != 0 {
                            255
                        } else {
                            0
                        }
                    })
                })
                .collect();
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).ok_or_else(short)?)
        }
        (_, 1) => DynamicImage::ImageLuma8(
            GrayImage::from_raw(width, height, samples.to_vec()).ok_or_else(short)?,
        ),
        (_, 3) => DynamicImage::ImageRgb8(
            RgbImage::from_raw(width, height, samples.to_vec()).ok_or_else(short)?,
        ),
        _ => {
            let mut rgb = RgbImage::new(width, height);
            for (pixel, cmyk) in rgb.pixels_mut().zip(samples.chunks_exact(4)) {
                let k = 255 - u16::from(cmyk[3]);
                let channel = |c: u8| ((255 - u16::from(c)) * k / 255) as u8;
                *pixel = Rgb([channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]);
            }
            DynamicImage::ImageRgb8(rgb)
        }
    };

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::export::PdfExporter;
    use lopdf::dictionary;

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 2) as u8, (y * 3) as u8, ((x + y) % 256) as u8])
        });
        encode_png(&DynamicImage::ImageRgb8(image)).unwrap()
    }

    /// One-page PDF with a Helvetica text layer and no images
    fn text_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_scanned_page_is_extracted_with_its_resolution() {
        let png = gradient_png(120, 60);
        let pdf = PdfExporter::new(200.0).export(&png, Some(150.0)).unwrap();

        let FirstPage::Image { png_bytes, dpi } = first_page(&pdf).unwrap() else {
            panic!("expected an image page");
        };
        assert!((dpi - 150.0).abs() < 0.5, "dpi was {dpi}");

        let original = image::load_from_memory(&png).unwrap().to_rgb8();
        let extracted = image::load_from_memory(&png_bytes).unwrap().to_rgb8();
        assert_eq!(extracted.dimensions(), (120, 60));
        assert_eq!(extracted.get_pixel(10, 5), original.get_pixel(10, 5));
        assert_eq!(extracted.get_pixel(119, 59), original.get_pixel(119, 59));
    }

    #[test]
    fn test_text_only_page_yields_text_layer() {
        let pdf = text_pdf("Patient Jane Tan");
        match first_page(&pdf).unwrap() {
            FirstPage::Text(text) => assert!(text.contains("Jane Tan"), "{text}"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pdf_is_raster_error() {
        assert!(matches!(
            first_page(b"not a pdf"),
            Err(RedactorError::Raster(_))
        ));
    }

    #[test]
    fn test_one_bit_samples_expand_to_gray() {
        let doc = Document::with_version("1.4");
        let dict = dictionary! {
            "Width" => 10,
            "Height" => 2,
            "BitsPerComponent" => 1,
            "ColorSpace" => "DeviceGray",
        };
        // Rows are padded to whole bytes
        let samples = [0b1000_0000, 0b0100_0000, 0b0000_0000, 0b0000_0001];

        let image = samples_to_image(&doc, &dict, &samples).unwrap().to_luma8();
        assert_eq!(image.get_pixel(0, 0).0, [255]);
        assert_eq!(image.get_pixel(1, 0).0, [0]);
        assert_eq!(image.get_pixel(9, 0).0, [255]);
        assert_eq!(image.get_pixel(7, 1).0, [0]);
    }

    #[test]
    fn test_cmyk_samples_are_converted() {
        let doc = Document::with_version("1.4");
        let dict = dictionary! {
            "Width" => 2,
            "Height" => 1,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceCMYK",
        };
        let samples = [0, 0, 0, 0, 0, 0, 0, 255];

        let image = samples_to_image(&doc, &dict, &samples).unwrap().to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_short_sample_buffer_is_rejected() {
        let doc = Document::with_version("1.4");
        let dict = dictionary! {
            "Width" => 4,
            "Height" => 4,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
        };
        assert!(samples_to_image(&doc, &dict, &[0; 10]).is_err());
    }
}
