//! Paragraph text from Word (DOCX) documents

use crate::domain::{RedactorError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text of every paragraph in the main document part, one paragraph per line
///
/// Tabs and line breaks inside a paragraph are kept as `\t` and `\n`.
///
/// # Errors
///
/// Returns [`RedactorError::Raster`] when the archive or its document XML is invalid.
pub fn paragraph_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| RedactorError::Raster(format!("DOCX is not a valid archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| RedactorError::Raster(format!("DOCX has no {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| RedactorError::Raster(format!("Failed to read {DOCUMENT_PART}: {e}")))?;

    let paragraphs = paragraphs(&xml)?;
    tracing::debug!(paragraphs = paragraphs.len(), "Extracted DOCX text");
    Ok(paragraphs.join("\n"))
}

fn paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Paragraphs nest inside text boxes
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| RedactorError::Raster(format!("Malformed DOCX XML: {e}")))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_char(&mut open, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| RedactorError::Raster(format!("Malformed DOCX text: {e}")))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(open: &mut [String], c: char) {
    if let Some(current) = open.last_mut() {
        current.push(c);
    }
}
