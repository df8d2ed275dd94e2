//! Redact command implementation
//!
//! Rasterizes one input document, runs the redaction pipeline and writes the
//! redacted page (and optionally a PDF) next to the input.

use super::{document_id, load_checked_config, rasterize_input, resolve_categories, sibling_path};
use crate::adapters::ocr::build_text_detector;
use crate::redaction::{ProcessOptions, RedactionEngine};
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Input document (pdf, png, jpg, jpeg, txt, docx)
    pub input: PathBuf,

    /// Output image path (default: <input stem>.redacted.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Categories to redact (comma-separated, e.g. "PERSON,PHONE")
    #[arg(long)]
    pub categories: Option<String>,

    /// Precomputed OCR JSON for this document
    #[arg(long, value_name = "PATH")]
    pub ocr_json: Option<PathBuf>,

    /// Also write a single-page PDF of the redacted image
    #[arg(long)]
    pub pdf: bool,

    /// Write the rasterized page even when a later stage fails
    #[arg(long)]
    pub save_page: bool,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting redact command");

        let Some(config) = load_checked_config(config_path) else {
            return Ok(2);
        };
        let Some(categories) = resolve_categories(self.categories.as_deref(), &config) else {
            return Ok(2);
        };

        let text_detector =
            match build_text_detector(&config.ocr, &self.input, self.ocr_json.as_deref()) {
                Ok(d) => d,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create text detector");
                    eprintln!("❌ Failed to initialize text detection: {e}");
                    return Ok(2);
                }
            };

        let engine = match RedactionEngine::from_config(&config, Some(text_detector)) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create redaction engine");
                eprintln!("❌ Failed to initialize redaction: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = engine.check_categories(&categories) {
            eprintln!("❌ {e}");
            return Ok(2);
        }

        if !engine.is_detection_available() {
            println!("⚠️  Entity tagger unavailable: nothing will be detected or redacted");
        }

        let page = match rasterize_input(&self.input, &config) {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Rasterization failed");
                eprintln!("❌ No output produced: {e:#}");
                return Ok(5);
            }
        };

        let id = document_id(&self.input);
        println!("🚀 Redacting {id} ({categories})");

        let options = ProcessOptions {
            render: true,
            export_pdf: self.pdf,
        };
        let outcome = engine
            .process_document(&id, page, Some(&categories), options)
            .await;

        let mut written = 0;

        if let Some(png) = outcome.redacted_png.as_deref() {
            let path = self
                .output
                .clone()
                .unwrap_or_else(|| sibling_path(&self.input, "redacted.png"));
            write_artifact(&path, png)?;
            written += 1;
        }

        if let Some(pdf) = outcome.pdf.as_deref() {
            let path = match self.output.as_deref() {
                Some(output) => output.with_extension("pdf"),
                None => sibling_path(&self.input, "redacted.pdf"),
            };
            write_artifact(&path, pdf)?;
            written += 1;
        }

        if self.save_page && outcome.has_failures() {
            write_artifact(&sibling_path(&self.input, "page.png"), &outcome.page.png_bytes)?;
            written += 1;
        }

        println!();
        println!("  OCR lines:          {}", outcome.line_count());
        println!("  Redaction targets:  {}", outcome.targets.len());
        println!("  Processing time:    {} ms", outcome.processing_time_ms);

        if outcome.has_failures() {
            println!();
            for warning in &outcome.warnings {
                println!("⚠️  {warning}");
            }
            if written == 0 {
                println!("❌ No output produced");
            }
            return Ok(1);
        }

        println!();
        println!("✅ Redaction complete");
        Ok(0)
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), size = bytes.len(), "Wrote output");
    println!("📄 Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_artifact(&path, b"data").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_tagger_outage_writes_no_redacted_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("scan.png");
        let page = image::RgbaImage::from_pixel(200, 40, image::Rgba([0, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(page).save(&input).unwrap();
        std::fs::write(
            dir.path().join("scan.png.ocr.json"),
            r#"[[[[0,10],[170,10],[170,30],[0,30]], "Call 91234567 now", 0.93]]"#,
        )
        .unwrap();

        let config_path = dir.path().join("redactor.toml");
        std::fs::write(
            &config_path,
            "[ner]\nenabled = true\nendpoint = \"http://127.0.0.1:9/entities\"\ntimeout_seconds = 5\n",
        )
        .unwrap();

        let args = RedactArgs {
            input: input.clone(),
            output: None,
            categories: None,
            ocr_json: None,
            pdf: true,
            save_page: true,
        };
        let code = args.execute(&config_path.to_string_lossy()).await.unwrap();

        assert_eq!(code, 1);
        assert!(!dir.path().join("scan.redacted.png").exists());
        assert!(!dir.path().join("scan.redacted.pdf").exists());
        assert!(dir.path().join("scan.page.png").exists());
    }

    #[test]
    fn test_write_artifact_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(write_artifact(&path, b"data").is_err());
    }
}
