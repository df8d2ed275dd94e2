//! Detection reporting for dry runs
//!
//! Summarises what would be redacted without writing any image: counts by label,
//! a few truncated samples, and warnings for documents that could not be analysed.

use crate::redaction::models::{DetectedSpan, DetectionSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 20;
const SAMPLES_PER_DOCUMENT: usize = 3;
const SAMPLE_CHARS: usize = 50;

/// Dry-run report with detection statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Total documents analysed
    pub total_documents: usize,

    /// Total redaction targets found
    pub total_targets: usize,

    /// Targets by label
    pub targets_by_label: BTreeMap<String, usize>,

    /// Targets by detector
    pub targets_by_source: BTreeMap<String, usize>,

    /// Sample detections (fragment truncated)
    pub samples: Vec<DetectionSample>,

    pub warnings: Vec<String>,

    pub stats: ProcessingStats,
}

/// One sample detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSample {
    pub document_id: String,
    pub line_index: usize,
    pub label: String,
    pub source: DetectionSource,
    /// Detected fragment, at most 50 characters
    pub fragment: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    pub documents_with_findings: usize,

    pub documents_without_findings: usize,

    /// Total OCR lines seen
    pub total_lines: usize,
}

impl DetectionReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            total_documents: 0,
            total_targets: 0,
            targets_by_label: BTreeMap::new(),
            targets_by_source: BTreeMap::new(),
            samples: Vec::new(),
            warnings: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Add the results for one document
    pub fn add_document(
        &mut self,
        document_id: &str,
        line_count: usize,
        spans: &[DetectedSpan],
        processing_time_ms: u64,
    ) {
        self.total_documents += 1;
        self.stats.total_lines += line_count;
        self.stats.total_processing_time_ms += processing_time_ms;

        if spans.is_empty() {
            self.stats.documents_without_findings += 1;
        } else {
            self.stats.documents_with_findings += 1;
            self.total_targets += spans.len();

            for span in spans {
                *self.targets_by_label.entry(span.label.clone()).or_insert(0) += 1;
                *self
                    .targets_by_source
                    .entry(source_name(span.source).to_string())
                    .or_insert(0) += 1;
            }

            for span in spans.iter().take(SAMPLES_PER_DOCUMENT) {
                self.add_sample(document_id, span);
            }
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    fn add_sample(&mut self, document_id: &str, span: &DetectedSpan) {
        if self.samples.len() >= MAX_SAMPLES {
            return;
        }

        self.samples.push(DetectionSample {
            document_id: document_id.to_string(),
            line_index: span.line_index,
            label: span.label.clone(),
            source: span.source,
            fragment: truncate(&span.text),
        });
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                   REDACTION DRY-RUN REPORT                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Documents Analysed:          {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with Findings:     {}\n",
            self.stats.documents_with_findings
        ));
        output.push_str(&format!(
            "  OCR Lines Scanned:           {}\n",
            self.stats.total_lines
        ));
        output.push_str(&format!(
            "  Redaction Targets Found:     {}\n",
            self.total_targets
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.targets_by_label.is_empty() {
            output.push_str("🔍 TARGETS BY LABEL\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut labels: Vec<_> = self.targets_by_label.iter().collect();
            labels.sort_by(|a, b| b.1.cmp(a.1));

            for (label, count) in labels {
                output.push_str(&format!("  {label:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE DETECTIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for (i, sample) in self.samples.iter().take(10).enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Document:  {}\n", sample.document_id));
                output.push_str(&format!("    Line:      {}\n", sample.line_index));
                output.push_str(&format!("    Label:     {}\n", sample.label));
                output.push_str(&format!("    Source:    {}\n", source_name(sample.source)));
                output.push_str(&format!("    Fragment:  \"{}\"\n", sample.fragment));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for DetectionReport {
    fn default() -> Self {
        Self::new()
    }
}

fn source_name(source: DetectionSource) -> &'static str {
    match source {
        DetectionSource::Heuristic => "heuristic",
        DetectionSource::Model => "model",
        DetectionSource::Pattern => "pattern",
    }
}

/// Truncate to 50 characters, marking the cut with `...`
fn truncate(text: &str) -> String {
    if text.chars().count() > SAMPLE_CHARS {
        let head: String = text.chars().take(SAMPLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
