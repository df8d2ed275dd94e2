//! Sensitive entity detection and redaction
//!
//! This module is the core of Redactor. Given OCR lines for a page image it finds
//! sensitive spans, projects them to pixel boxes, and paints them out.
//!
//! # Components
//!
//! - [`detector`] - the three line detectors (address heuristic, model entity filter,
//!   pattern rules) and the rule library
//! - [`aggregator`] - per-line concatenation of findings in detector order
//! - [`projector`] - character spans to pixel quadrilaterals
//! - [`renderer`] - white boxes and labels on the page image
//! - [`export`] - single-page PDF packaging
//! - [`engine`] - the per-document pipeline with soft-fail stage boundaries
//! - [`audit`] and [`report`] - hashed audit trail and dry-run reports
//!
//! # Example
//!
//! ```no_run
//! use redactor::domain::{CategorySet, Point, Quad, TextLine};
//! use redactor::redaction::projector::project;
//! use redactor::redaction::detector::patterns::RuleSet;
//! use redactor::redaction::detector::regex::PatternDetector;
//! use redactor::redaction::detector::LineDetector;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let line = TextLine::new(
//!     Quad::from_corners(Point::new(0.0, 0.0), Point::new(170.0, 20.0)),
//!     "Call 91234567 now",
//!     0.95,
//! );
//! let detector = PatternDetector::with_rules(Arc::new(RuleSet::builtin()?));
//! let categories: CategorySet = ["PHONE"].into_iter().collect();
//! let findings = detector.detect_line(&line.text, &line.text.to_lowercase(), &categories);
//! let targets = project(&line, &findings);
//! assert_eq!(targets[0].label, "<PHONE>");
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod audit;
pub mod detector;
pub mod engine;
pub mod export;
pub mod imaging;
pub mod lexicon;
pub mod models;
pub mod projector;
pub mod renderer;
pub mod report;

pub use aggregator::SensitiveEntityFinder;
pub use audit::AuditLogger;
pub use engine::{DocumentOutcome, ProcessOptions, RedactionEngine};
pub use export::PdfExporter;
pub use lexicon::Lexicon;
pub use models::{DetectedSpan, DetectionSource, Finding, LineDetection, RedactionTarget};
pub use renderer::{RedactionRenderer, RenderStyle};
pub use report::DetectionReport;
