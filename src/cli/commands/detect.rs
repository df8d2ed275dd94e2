//! Detect command implementation
//!
//! Dry run: reports what would be redacted in a document without writing any image.

use super::{document_id, load_checked_config, rasterize_input, resolve_categories};
use crate::adapters::ocr::build_text_detector;
use crate::redaction::{DetectionReport, ProcessOptions, RedactionEngine};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input document (png, jpg, jpeg, txt)
    pub input: PathBuf,

    /// Categories to detect (comma-separated)
    #[arg(long)]
    pub categories: Option<String>,

    /// Precomputed OCR JSON for this document
    #[arg(long, value_name = "PATH")]
    pub ocr_json: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "console")]
    pub format: ReportFormat,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting detect command");

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
                    eprintln!("❌ Failed to initialize text detection: {e}");
                    return Ok(2);
                }
            };

        let engine = match RedactionEngine::from_config(&config, Some(text_detector)) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Failed to initialize detection: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = engine.check_categories(&categories) {
            eprintln!("❌ {e}");
            return Ok(2);
        }

        let id = document_id(&self.input);
        let mut report = DetectionReport::new();

        if !engine.is_detection_available() {
            report.add_warning("Entity tagger unavailable: detection reports nothing".to_string());
        }

        let page = match rasterize_input(&self.input, &config) {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Rasterization failed");
                eprintln!("❌ No output produced: {e:#}");
                return Ok(5);
            }
        };

        let outcome = engine
            .process_document(&id, page, Some(&categories), ProcessOptions::dry_run())
            .await;

        report.add_document(
            &id,
            outcome.line_count(),
            &outcome.spans,
            outcome.processing_time_ms,
        );
        for warning in &outcome.warnings {
            report.add_warning(warning.clone());
        }

        match self.format {
            ReportFormat::Console => print!("{}", report.format_console()),
            ReportFormat::Json => println!("{}", report.format_json()?),
        }

        Ok(if outcome.has_failures() { 1 } else { 0 })
    }
}
