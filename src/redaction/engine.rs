//! Redaction engine
//!
//! [`RedactionEngine`] wires the external text detector, the [`SensitiveEntityFinder`],
//! the [`RedactionRenderer`], the [`PdfExporter`] and the optional audit logger into
//! one per-document pipeline:
//!
//! ```text
//! page image -> OCR -> per-line detection -> projection -> rendering -> PDF
//! ```
//!
//! Every stage boundary is soft-fail. A failing stage is logged, recorded as a
//! warning on the [`DocumentOutcome`], and the stages after it are skipped; whatever
//! was produced before the failure stays available to the caller. A detection
//! failure ends the document: no redacted image or PDF is produced from a page
//! whose entities are unknown.
//!
//! # Examples
//!
//! ```no_run
//! use redactor::adapters::ocr::SidecarTextDetector;
//! use redactor::adapters::raster::RasterizedPage;
//! use redactor::config::RedactorConfig;
//! use redactor::redaction::engine::{ProcessOptions, RedactionEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> redactor::domain::Result<()> {
//! let config = RedactorConfig::default();
//! let detector = Arc::new(SidecarTextDetector::new("scan.png.ocr.json"));
//! let engine = RedactionEngine::from_config(&config, Some(detector))?;
//!
//! let page = RasterizedPage { png_bytes: std::fs::read("scan.png")?, dpi: None };
//! let outcome = engine
//!     .process_document("scan.png", page, None, ProcessOptions::default())
//!     .await;
//! println!("{} targets", outcome.targets.len());
//! # Ok(())
//! # }
//! ```

use super::aggregator::SensitiveEntityFinder;
use super::audit::logger::DocumentAudit;
use super::audit::AuditLogger;
use super::detector::patterns::RuleSet;
use super::export::PdfExporter;
use super::lexicon::Lexicon;
use super::models::{DetectedSpan, RedactionTarget};
use super::projector::project;
use super::renderer::{RedactionRenderer, RenderStyle};
use crate::adapters::ner::{EntityTagger, HttpEntityTagger};
use crate::adapters::ocr::TextDetector;
use crate::adapters::raster::RasterizedPage;
use crate::config::RedactorConfig;
use crate::domain::{CategorySet, RedactorError, Result, TextLine};
use crate::{log_document_complete, log_document_start, log_error_with_context};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;

/// Which optional stages `process_document` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Draw redaction boxes onto the page
    pub render: bool,
    /// Wrap the redacted page into a PDF (requires `render`)
    pub export_pdf: bool,
}

impl ProcessOptions {
    /// Detection only, no image output
    pub fn dry_run() -> Self {
        Self {
            render: false,
            export_pdf: false,
        }
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            render: true,
            export_pdf: false,
        }
    }
}

/// Everything produced for one document, including intermediate artifacts
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub document_id: String,

    /// The rasterized page the pipeline started from
    pub page: RasterizedPage,

    /// OCR output; `None` when text detection failed
    pub lines: Option<Vec<TextLine>>,

    /// Detected fragments with their line index, in target order
    pub spans: Vec<DetectedSpan>,

    pub targets: Vec<RedactionTarget>,

    /// Redacted page as PNG; `None` when rendering was skipped or an earlier stage failed
    pub redacted_png: Option<Vec<u8>>,

    pub pdf: Option<Vec<u8>>,

    /// One message per failed stage
    pub warnings: Vec<String>,

    pub processing_time_ms: u64,
}

impl DocumentOutcome {
    fn new(document_id: &str, page: RasterizedPage) -> Self {
        Self {
            document_id: document_id.to_string(),
            page,
            lines: None,
            spans: Vec::new(),
            targets: Vec::new(),
            redacted_png: None,
            pdf: None,
            warnings: Vec::new(),
            processing_time_ms: 0,
        }
    }

    /// True when any stage failed
    pub fn has_failures(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.as_ref().map_or(0, Vec::len)
    }
}

/// Per-document redaction pipeline
pub struct RedactionEngine {
    text_detector: Option<Arc<dyn TextDetector>>,
    finder: SensitiveEntityFinder,
    renderer: RedactionRenderer,
    exporter: PdfExporter,
    audit_logger: Option<AuditLogger>,
    default_categories: CategorySet,
}

impl RedactionEngine {
    /// Assemble an engine from ready-made parts
    pub fn new(
        text_detector: Option<Arc<dyn TextDetector>>,
        finder: SensitiveEntityFinder,
        renderer: RedactionRenderer,
        exporter: PdfExporter,
    ) -> Self {
        Self {
            text_detector,
            finder,
            renderer,
            exporter,
            audit_logger: None,
            default_categories: CategorySet::all(),
        }
    }

    /// Build an engine from configuration
    ///
    /// The entity tagger is created only when `ner.enabled` is set. A tagger that
    /// fails to initialise leaves the engine in the "no detection possible" state
    /// rather than failing construction.
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Configuration`] if the rule library, the label color
    /// or the audit log cannot be set up.
    pub fn from_config(
        config: &RedactorConfig,
        text_detector: Option<Arc<dyn TextDetector>>,
    ) -> Result<Self> {
        let rule_set = match config.detection.pattern_library.as_deref() {
            Some(path) => RuleSet::from_file(path),
            None => RuleSet::builtin(),
        }
        .map_err(|e| RedactorError::Configuration(format!("{e:#}")))?;

        let lexicon = Lexicon::new(
            &config.detection.block_list,
            &config.detection.address_context_words,
        );

        let tagger: Option<Arc<dyn EntityTagger>> = if config.ner.enabled {
            match HttpEntityTagger::new(&config.ner) {
                Ok(tagger) => {
                    tracing::info!(endpoint = tagger.endpoint(), "Entity tagger configured");
                    Some(Arc::new(tagger))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Entity tagger failed to initialise, detection disabled");
                    None
                }
            }
        } else {
            tracing::info!("Entity tagger disabled, detection will report nothing");
            None
        };

        let rules = rule_set.len();
        let block_list = lexicon.block_list_len();
        let finder = SensitiveEntityFinder::new(Arc::new(rule_set), Arc::new(lexicon), tagger);

        tracing::debug!(
            rules,
            block_list,
            tagger = finder.tagger_name().unwrap_or("none"),
            "Detection initialised"
        );

        let renderer = RedactionRenderer::new(RenderStyle::from_config(&config.render)?);
        let exporter = PdfExporter::new(config.export.default_dpi);

        let engine = Self::new(text_detector, finder, renderer, exporter);
        engine
            .check_categories(&config.detection.categories)
            .map_err(|e| RedactorError::Configuration(format!("detection.categories: {e}")))?;
        let mut engine = engine.with_default_categories(config.detection.categories.clone());

        if config.audit.enabled {
            let key = config
                .audit
                .hash_key
                .as_ref()
                .map(|k| k.expose_secret().as_ref().as_bytes())
                .unwrap_or_default();
            let logger =
                AuditLogger::new(config.audit.log_path.clone(), config.audit.json_format, key)
                    .map_err(|e| RedactorError::Configuration(format!("{e:#}")))?;
            tracing::info!(path = %logger.log_path().display(), "Audit logging enabled");
            engine = engine.with_audit_logger(logger);
        }

        Ok(engine)
    }

    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Categories used when a call passes none
    pub fn with_default_categories(mut self, categories: CategorySet) -> Self {
        self.default_categories = categories;
        self
    }

    pub fn default_categories(&self) -> &CategorySet {
        &self.default_categories
    }

    /// Reject category names that match no built-in category and no rule label
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Validation`] listing the unrecognised names.
    pub fn check_categories(&self, categories: &CategorySet) -> Result<()> {
        let unknown = self.finder.unrecognised_categories(categories);
        if unknown.is_empty() {
            return Ok(());
        }

        let mut known: Vec<&str> = crate::domain::Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect();
        for label in self.finder.rule_set().labels() {
            if !known.contains(&label) {
                known.push(label);
            }
        }

        Err(RedactorError::Validation(format!(
            "Unknown categories: {} (known: {})",
            unknown.join(", "),
            known.join(", ")
        )))
    }

    /// Whether the entity tagger is available, and so whether detection can run
    pub fn is_detection_available(&self) -> bool {
        self.finder.is_available()
    }

    pub fn finder(&self) -> &SensitiveEntityFinder {
        &self.finder
    }

    /// Text detection; `None` when no detector is configured or the call failed
    pub async fn run_ocr(&self, image: &[u8]) -> Option<Vec<TextLine>> {
        let Some(detector) = self.text_detector.as_ref() else {
            tracing::warn!("No text detector configured");
            return None;
        };

        match detector.detect_text(image).await {
            Ok(lines) => {
                tracing::debug!(detector = detector.name(), lines = lines.len(), "OCR complete");
                Some(lines)
            }
            Err(e) => {
                log_error_with_context!(&e, "Text detection failed");
                None
            }
        }
    }

    /// Detection and projection; a tagger failure yields no targets
    pub async fn find_sensitive_entities(
        &self,
        lines: &[TextLine],
        categories: &CategorySet,
    ) -> Vec<RedactionTarget> {
        match self.finder.find_sensitive_entities(lines, categories).await {
            Ok(targets) => targets,
            Err(e) => {
                log_error_with_context!(&e, "Sensitive entity detection failed");
                Vec::new()
            }
        }
    }

    /// Draw `targets` onto the image; `None` when the image is absent or rendering fails
    pub fn redact_image(
        &self,
        image: Option<&[u8]>,
        targets: &[RedactionTarget],
    ) -> Option<Vec<u8>> {
        let Some(image) = image else {
            tracing::warn!("No image to redact");
            return None;
        };

        match self.renderer.render(image, targets) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log_error_with_context!(&e, "Redaction rendering failed");
                None
            }
        }
    }

    /// Single-page PDF of the image; `None` when the image is absent or export fails
    pub fn export_to_pdf(&self, image: Option<&[u8]>, dpi: Option<f32>) -> Option<Vec<u8>> {
        let Some(image) = image else {
            tracing::warn!("No image to export");
            return None;
        };

        match self.exporter.export(image, dpi) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log_error_with_context!(&e, "PDF export failed");
                None
            }
        }
    }

    /// Run the whole pipeline for one rasterized page
    ///
    /// `categories` falls back to the engine's default categories.
    pub async fn process_document(
        &self,
        document_id: &str,
        page: RasterizedPage,
        categories: Option<&CategorySet>,
        options: ProcessOptions,
    ) -> DocumentOutcome {
        let start = Instant::now();
        let categories = categories.unwrap_or(&self.default_categories);
        log_document_start!(document_id, categories.len());

        let mut outcome = DocumentOutcome::new(document_id, page);

        outcome.lines = self.run_ocr(&outcome.page.png_bytes).await;
        let Some(lines) = outcome.lines.as_deref() else {
            outcome
                .warnings
                .push(format!("Text detection produced no output for {document_id}"));
            return self.finish(outcome, categories, start);
        };

        match self.finder.detect_lines(lines, categories).await {
            Ok(detections) => {
                for detection in &detections {
                    let line = &lines[detection.line_index];
                    outcome.spans.extend(detection.spans(&line.text));
                    outcome.targets.extend(project(line, &detection.findings));
                }
            }
            Err(e) => {
                log_error_with_context!(&e, "Sensitive entity detection failed");
                outcome
                    .warnings
                    .push(format!("Detection failed for {document_id}: {e}"));
                return self.finish(outcome, categories, start);
            }
        }

        if options.render {
            outcome.redacted_png =
                self.redact_image(Some(&outcome.page.png_bytes), &outcome.targets);
            if outcome.redacted_png.is_none() {
                outcome
                    .warnings
                    .push(format!("Rendering failed for {document_id}"));
            }
        }

        if options.render && options.export_pdf {
            if let Some(redacted) = outcome.redacted_png.as_deref() {
                outcome.pdf = self.export_to_pdf(Some(redacted), outcome.page.dpi);
                if outcome.pdf.is_none() {
                    outcome
                        .warnings
                        .push(format!("PDF export failed for {document_id}"));
                }
            }
        }

        self.finish(outcome, categories, start)
    }

    fn finish(
        &self,
        mut outcome: DocumentOutcome,
        categories: &CategorySet,
        start: Instant,
    ) -> DocumentOutcome {
        let elapsed = start.elapsed();
        outcome.processing_time_ms = elapsed.as_millis() as u64;

        if let Some(logger) = self.audit_logger.as_ref() {
            let audit = DocumentAudit {
                document_id: &outcome.document_id,
                categories: categories.iter().collect(),
                line_count: outcome.line_count(),
                target_count: outcome.targets.len(),
                processing_time_ms: outcome.processing_time_ms,
                spans: &outcome.spans,
            };
            if let Err(e) = logger.log_document(&audit) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        log_document_complete!(outcome.document_id, outcome.targets.len(), elapsed);
        outcome
    }
}
